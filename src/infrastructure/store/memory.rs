//! Volatile directory store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::domain::{LocationId, LocationNode, LocationType};
use crate::infrastructure::store::index::DirectoryIndex;
use crate::infrastructure::traits::{DirectoryStore, StoreError, StoreResult};

/// Directory store kept entirely in memory.
///
/// Every write runs under the write lock, so integrity checks and the write
/// itself are atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    index: RwLock<DirectoryIndex>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: DirectoryIndex) -> Self {
        Self {
            index: RwLock::new(index),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, DirectoryIndex>> {
        self.index.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, DirectoryIndex>> {
        self.index.write().map_err(|_| StoreError::Poisoned)
    }
}

impl DirectoryStore for InMemoryStore {
    fn find_by_code(&self, code: &str) -> StoreResult<Option<LocationNode>> {
        Ok(self.read()?.get_by_code(code).cloned())
    }

    fn find_by_id(&self, id: &LocationId) -> StoreResult<Option<LocationNode>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn exists_by_code(&self, code: &str) -> StoreResult<bool> {
        Ok(self.read()?.contains_code(code))
    }

    fn find_by_type(&self, location_type: LocationType) -> StoreResult<Vec<LocationNode>> {
        Ok(self.read()?.of_type(location_type))
    }

    fn find_by_parent(&self, parent: &LocationId) -> StoreResult<Vec<LocationNode>> {
        Ok(self.read()?.children_of(parent))
    }

    fn find_all(&self) -> StoreResult<Vec<LocationNode>> {
        Ok(self.read()?.iter().cloned().collect())
    }

    fn save(&self, node: LocationNode) -> StoreResult<LocationNode> {
        trace!("save: id={} code={}", node.id, node.code);
        self.write()?.upsert(node)
    }

    fn update(&self, node: LocationNode) -> StoreResult<LocationNode> {
        trace!("update: id={} code={}", node.id, node.code);
        self.write()?.replace(node)
    }

    fn delete(&self, id: &LocationId) -> StoreResult<()> {
        trace!("delete: id={}", id);
        self.write()?.remove(id).map(|_| ())
    }

    fn count(&self) -> StoreResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    fn count_by_type(&self, location_type: LocationType) -> StoreResult<u64> {
        Ok(self.read()?.count_of_type(location_type) as u64)
    }
}
