//! I/O boundary traits for testability
//!
//! These traits abstract the directory store and the filesystem, allowing
//! services to be tested with mock implementations.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::domain::{LocationId, LocationNode, LocationType};

/// Failures raised by a directory store.
///
/// The first four variants are integrity guards enforced at write time;
/// the remaining ones are backend faults.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate location code: {0}")]
    DuplicateCode(String),

    #[error("unknown location id: {0}")]
    UnknownId(LocationId),

    #[error("parent location does not exist: {0}")]
    MissingParent(LocationId),

    #[error("location {id} still has {count} child location(s)")]
    HasDependents { id: LocationId, count: usize },

    #[error("store backend failure: {context}")]
    Backend {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn backend(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            context: context.into(),
            source: source.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable keyed storage of location records.
///
/// Implementations must enforce code uniqueness, parent existence and the
/// no-delete-with-children rule atomically with the write itself.
pub trait DirectoryStore: Send + Sync {
    fn find_by_code(&self, code: &str) -> StoreResult<Option<LocationNode>>;

    fn find_by_id(&self, id: &LocationId) -> StoreResult<Option<LocationNode>>;

    fn exists_by_code(&self, code: &str) -> StoreResult<bool>;

    fn find_by_type(&self, location_type: LocationType) -> StoreResult<Vec<LocationNode>>;

    /// Direct children of `parent`, in insertion order.
    fn find_by_parent(&self, parent: &LocationId) -> StoreResult<Vec<LocationNode>>;

    /// Every record, in insertion order.
    fn find_all(&self) -> StoreResult<Vec<LocationNode>>;

    /// Insert a new record, or replace the record with the same id.
    fn save(&self, node: LocationNode) -> StoreResult<LocationNode>;

    /// Replace the record with the same id. Fails with `UnknownId` if that
    /// record no longer exists; never re-creates it.
    fn update(&self, node: LocationNode) -> StoreResult<LocationNode>;

    fn delete(&self, id: &LocationId) -> StoreResult<()>;

    fn count(&self) -> StoreResult<u64>;

    fn count_by_type(&self, location_type: LocationType) -> StoreResult<u64> {
        Ok(self.find_by_type(location_type)?.len() as u64)
    }
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Rename/move a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
