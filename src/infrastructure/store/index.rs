//! In-process index over location records.
//!
//! Holds no locks; the stores wrap it and decide how writes are published.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{LocationId, LocationNode, LocationType};
use crate::infrastructure::traits::{StoreError, StoreResult};

/// Records keyed by insertion sequence, with unique-code, id and
/// parent-to-children indexes.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    records: BTreeMap<u64, LocationNode>,
    by_id: HashMap<LocationId, u64>,
    by_code: HashMap<String, u64>,
    children: HashMap<LocationId, BTreeSet<u64>>,
    next_seq: u64,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from records in insertion order, enforcing the same
    /// rules as individual writes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = LocationNode>) -> StoreResult<Self> {
        let mut index = Self::new();
        for node in nodes {
            if index.by_id.contains_key(&node.id) {
                return Err(StoreError::backend(
                    "rebuild index",
                    format!("duplicate location id: {}", node.id),
                ));
            }
            index.upsert(node)?;
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &LocationId) -> Option<&LocationNode> {
        self.by_id.get(id).and_then(|seq| self.records.get(seq))
    }

    pub fn get_by_code(&self, code: &str) -> Option<&LocationNode> {
        self.by_code.get(code).and_then(|seq| self.records.get(seq))
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationNode> {
        self.records.values()
    }

    pub fn of_type(&self, location_type: LocationType) -> Vec<LocationNode> {
        self.iter()
            .filter(|n| n.location_type == location_type)
            .cloned()
            .collect()
    }

    pub fn count_of_type(&self, location_type: LocationType) -> usize {
        self.iter()
            .filter(|n| n.location_type == location_type)
            .count()
    }

    pub fn children_of(&self, id: &LocationId) -> Vec<LocationNode> {
        self.children
            .get(id)
            .map(|seqs| {
                seqs.iter()
                    .filter_map(|seq| self.records.get(seq))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn child_count(&self, id: &LocationId) -> usize {
        self.children.get(id).map_or(0, BTreeSet::len)
    }

    /// Insert a new record or replace the one with the same id.
    ///
    /// A replaced record keeps its insertion position.
    pub fn upsert(&mut self, node: LocationNode) -> StoreResult<LocationNode> {
        if let Some(parent) = node.parent_id {
            if parent == node.id || !self.by_id.contains_key(&parent) {
                return Err(StoreError::MissingParent(parent));
            }
        }
        if let Some(holder) = self.get_by_code(&node.code) {
            if holder.id != node.id {
                return Err(StoreError::DuplicateCode(node.code));
            }
        }

        let seq = match self.by_id.get(&node.id).copied() {
            Some(seq) => {
                if let Some(previous) = self.records.get(&seq).cloned() {
                    if previous.code != node.code {
                        self.by_code.remove(&previous.code);
                    }
                    if previous.parent_id != node.parent_id {
                        self.unlink_child(previous.parent_id, seq);
                    }
                }
                seq
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.by_id.insert(node.id, seq);
                seq
            }
        };

        self.by_code.insert(node.code.clone(), seq);
        if let Some(parent) = node.parent_id {
            self.children.entry(parent).or_default().insert(seq);
        }
        self.records.insert(seq, node.clone());
        Ok(node)
    }

    /// Replace an existing record; an id that is not stored is `UnknownId`.
    pub fn replace(&mut self, node: LocationNode) -> StoreResult<LocationNode> {
        if !self.by_id.contains_key(&node.id) {
            return Err(StoreError::UnknownId(node.id));
        }
        self.upsert(node)
    }

    /// Remove a childless record.
    pub fn remove(&mut self, id: &LocationId) -> StoreResult<LocationNode> {
        let seq = self
            .by_id
            .get(id)
            .copied()
            .ok_or(StoreError::UnknownId(*id))?;
        let count = self.child_count(id);
        if count > 0 {
            return Err(StoreError::HasDependents { id: *id, count });
        }

        let node = self
            .records
            .remove(&seq)
            .ok_or(StoreError::UnknownId(*id))?;
        self.by_id.remove(id);
        self.by_code.remove(&node.code);
        self.unlink_child(node.parent_id, seq);
        self.children.remove(id);
        Ok(node)
    }

    fn unlink_child(&mut self, parent: Option<LocationId>, seq: u64) {
        let Some(parent) = parent else { return };
        if let Some(seqs) = self.children.get_mut(&parent) {
            seqs.remove(&seq);
            if seqs.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}
