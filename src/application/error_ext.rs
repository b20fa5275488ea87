//! Error conversion helpers for directory store operations
//!
//! Integrity guards raised by the store become domain errors; anything else
//! is an internal fault and keeps the store error as its source.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;
use crate::infrastructure::traits::{StoreError, StoreResult};

/// Extension trait for converting `StoreResult` to `ApplicationResult` with context.
pub trait StoreResultExt<T> {
    /// Classify a store error and add the action as context.
    ///
    /// # Example
    /// ```ignore
    /// self.store.save(node).with_store_context("save location")?;
    /// ```
    fn with_store_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn with_store_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| match e {
            StoreError::DuplicateCode(code) => DomainError::duplicate_code(code).into(),
            StoreError::UnknownId(id) | StoreError::MissingParent(id) => {
                DomainError::not_found_id(id).into()
            }
            StoreError::HasDependents { count, .. } => DomainError::has_children(count).into(),
            other => ApplicationError::OperationFailed {
                context: action.to_string(),
                source: Box::new(other),
            },
        })
    }
}
