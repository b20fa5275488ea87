//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent caller-recoverable rule violations.
/// These are independent of storage concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("location not found with {field}: {value}")]
    NotFound { field: &'static str, value: String },

    #[error("location already exists with {field}: {value}")]
    AlreadyExists { field: &'static str, value: String },

    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown location type: {0} (expected province, district, sector, cell or village)")]
    ParseLocationType(String),
}

impl DomainError {
    pub fn not_found_code(code: impl Into<String>) -> Self {
        Self::NotFound {
            field: "code",
            value: code.into(),
        }
    }

    pub fn not_found_id(id: impl ToString) -> Self {
        Self::NotFound {
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn has_children(count: usize) -> Self {
        Self::InvalidHierarchy(format!(
            "Cannot delete location with {count} child location(s). Delete children first."
        ))
    }

    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::AlreadyExists {
            field: "code",
            value: code.into(),
        }
    }
}
