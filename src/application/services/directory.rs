//! Location directory service
//!
//! Validated inserts, parent-chain walks, subtree traversal and statistics
//! over a `DirectoryStore`. The service holds no state of its own; every
//! traversal step is a store lookup.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, StoreResultExt};
use crate::domain::{
    check_parent_presence, check_placement, is_valid_child, DomainError, LocationId,
    LocationNode, LocationStatistics, LocationType, LocationUpdate, NewLocation, SubtreeView,
    MAX_DEPTH,
};
use crate::infrastructure::traits::DirectoryStore;

/// Separator used when rendering an ancestor path.
pub const PATH_SEPARATOR: &str = " > ";

/// Service for the administrative location hierarchy.
pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Insert a new location below `parent_code`.
    ///
    /// Provinces take no parent; every other level needs a parent of the
    /// level directly above. The code pre-check gives a fast error, while the
    /// store's unique index decides races between concurrent inserts.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&self, request: NewLocation) -> ApplicationResult<LocationNode> {
        let request = request.normalized()?;

        if self
            .store
            .exists_by_code(&request.code)
            .with_store_context("check location code")?
        {
            return Err(DomainError::duplicate_code(request.code).into());
        }

        check_parent_presence(request.location_type, request.parent_code.is_some())?;
        let parent = match request.parent_code.as_deref() {
            Some(code) => Some(self.get_by_code(code)?),
            None => None,
        };
        check_placement(
            request.location_type,
            parent.as_ref().map(|p| p.location_type),
        )?;

        let node = LocationNode::new(
            request.name,
            request.code,
            request.location_type,
            parent.as_ref().map(|p| p.id),
        );
        let saved = self
            .store
            .save(node)
            .with_store_context("save location")?;
        info!(
            "inserted {} under {}",
            saved,
            request.parent_code.as_deref().unwrap_or("-")
        );
        Ok(saved)
    }

    pub fn get_by_code(&self, code: &str) -> ApplicationResult<LocationNode> {
        let code = code.trim();
        self.store
            .find_by_code(code)
            .with_store_context("find location by code")?
            .ok_or_else(|| DomainError::not_found_code(code).into())
    }

    pub fn get_by_id(&self, id: &LocationId) -> ApplicationResult<LocationNode> {
        self.store
            .find_by_id(id)
            .with_store_context("find location by id")?
            .ok_or_else(|| DomainError::not_found_id(id).into())
    }

    /// Resolve a location reference held by another subsystem.
    pub fn resolve(&self, code: &str) -> ApplicationResult<LocationNode> {
        debug!("resolve: code={}", code);
        self.get_by_code(code)
    }

    pub fn exists_by_code(&self, code: &str) -> ApplicationResult<bool> {
        self.store
            .exists_by_code(code.trim())
            .with_store_context("check location code")
    }

    /// Every location, in insertion order.
    pub fn all(&self) -> ApplicationResult<Vec<LocationNode>> {
        self.store.find_all().with_store_context("list locations")
    }

    pub fn by_type(&self, location_type: LocationType) -> ApplicationResult<Vec<LocationNode>> {
        self.store
            .find_by_type(location_type)
            .with_store_context("list locations by type")
    }

    pub fn provinces(&self) -> ApplicationResult<Vec<LocationNode>> {
        self.by_type(LocationType::Province)
    }

    /// Direct children of the location with `code`, in insertion order.
    pub fn children_of(&self, code: &str) -> ApplicationResult<Vec<LocationNode>> {
        let node = self.get_by_code(code)?;
        self.children(&node)
    }

    /// Locations from the province down to `code`, inclusive.
    pub fn ancestors(&self, code: &str) -> ApplicationResult<Vec<LocationNode>> {
        let node = self.get_by_code(code)?;
        self.parent_chain(node)
    }

    /// Names from the province down to `code`.
    pub fn ancestor_path(&self, code: &str) -> ApplicationResult<Vec<String>> {
        Ok(self
            .ancestors(code)?
            .into_iter()
            .map(|n| n.name)
            .collect())
    }

    /// Ancestor path rendered as `Province > District > ...`.
    pub fn location_path(&self, code: &str) -> ApplicationResult<String> {
        Ok(self
            .ancestors(code)?
            .iter()
            .map(|n| n.name.as_str())
            .join(PATH_SEPARATOR))
    }

    /// The province at the top of the chain for `code`.
    pub fn root_of(&self, code: &str) -> ApplicationResult<LocationNode> {
        self.ancestors(code)?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found_code(code).into())
    }

    pub fn province_of(&self, code: &str) -> ApplicationResult<String> {
        Ok(self.root_of(code)?.name)
    }

    /// Number of parent hops from `code` to its province.
    pub fn depth_of(&self, code: &str) -> ApplicationResult<usize> {
        Ok(self.ancestors(code)?.len() - 1)
    }

    /// All locations below `code`, breadth first. Each node appears once.
    #[instrument(level = "debug", skip(self))]
    pub fn descendants_of(&self, code: &str) -> ApplicationResult<Vec<LocationNode>> {
        let root = self.get_by_code(code)?;
        let mut visited = HashSet::from([root.id]);
        let mut queue = VecDeque::from([root]);
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            for child in self.children(&current)? {
                if visited.insert(child.id) {
                    queue.push_back(child.clone());
                    result.push(child);
                }
            }
        }

        debug!("descendants_of: {} has {} descendant(s)", code, result.len());
        Ok(result)
    }

    /// Nested view of `code` and everything below it.
    pub fn subtree_view(&self, code: &str) -> ApplicationResult<SubtreeView> {
        let node = self.get_by_code(code)?;
        let mut visited = HashSet::from([node.id]);
        self.build_view(&node, &mut visited)
    }

    /// One subtree per province.
    #[instrument(level = "debug", skip(self))]
    pub fn full_forest(&self) -> ApplicationResult<Vec<SubtreeView>> {
        self.provinces()?
            .iter()
            .map(|province| {
                let mut visited = HashSet::from([province.id]);
                self.build_view(province, &mut visited)
            })
            .collect()
    }

    pub fn count_by_type(&self, location_type: LocationType) -> ApplicationResult<u64> {
        self.store
            .count_by_type(location_type)
            .with_store_context("count locations by type")
    }

    /// Counts per level plus the total.
    pub fn statistics(&self) -> ApplicationResult<LocationStatistics> {
        let counts = LocationType::ALL
            .into_iter()
            .map(|t| self.count_by_type(t).map(|count| (t, count)))
            .collect::<ApplicationResult<BTreeMap<_, _>>>()?;
        let total = self.store.count().with_store_context("count locations")?;
        Ok(LocationStatistics { counts, total })
    }

    /// Case-insensitive substring match on names. The term is used as given.
    pub fn search_by_name(&self, term: &str) -> ApplicationResult<Vec<LocationNode>> {
        let needle = term.to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Whether a node of `child_type` could be inserted below `parent_code`.
    pub fn validate_hierarchy(
        &self,
        parent_code: &str,
        child_type: LocationType,
    ) -> ApplicationResult<bool> {
        let parent = self.get_by_code(parent_code)?;
        Ok(is_valid_child(parent.location_type, child_type))
    }

    /// Rename a location. Restated immutable fields must match the stored ones.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&self, id: &LocationId, update: LocationUpdate) -> ApplicationResult<LocationNode> {
        let node = self.get_by_id(id)?;
        let parent_code = match update.stated_parent_code() {
            Some(_) => self.parent_of(&node)?.map(|p| p.code),
            None => None,
        };
        let renamed = update.apply_to(&node, parent_code.as_deref())?;
        let saved = self
            .store
            .update(renamed)
            .with_store_context("update location")?;
        info!("renamed {} to {}", node.code, saved.name);
        Ok(saved)
    }

    /// Delete a childless location. Never cascades.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: &LocationId) -> ApplicationResult<()> {
        let node = self.get_by_id(id)?;
        let children = self.children(&node)?;
        if !children.is_empty() {
            return Err(DomainError::has_children(children.len()).into());
        }
        self.store
            .delete(&node.id)
            .with_store_context("delete location")?;
        info!("deleted {}", node);
        Ok(())
    }

    fn children(&self, node: &LocationNode) -> ApplicationResult<Vec<LocationNode>> {
        self.store
            .find_by_parent(&node.id)
            .with_store_context("list child locations")
    }

    fn parent_of(&self, node: &LocationNode) -> ApplicationResult<Option<LocationNode>> {
        node.parent_id
            .map(|parent| self.get_by_id(&parent))
            .transpose()
    }

    /// Walk parents up to the province; returns the chain root first.
    ///
    /// The walk is bounded by `MAX_DEPTH` hops and refuses to revisit a node.
    fn parent_chain(&self, node: LocationNode) -> ApplicationResult<Vec<LocationNode>> {
        let start = node.code.clone();
        let mut seen = HashSet::from([node.id]);
        let mut chain = vec![node];

        while let Some(parent_id) = chain.last().and_then(|n| n.parent_id) {
            if chain.len() > MAX_DEPTH || !seen.insert(parent_id) {
                return Err(DomainError::InvalidHierarchy(format!(
                    "parent chain of {start} does not reach a province within {MAX_DEPTH} levels"
                ))
                .into());
            }
            chain.push(self.get_by_id(&parent_id)?);
        }

        chain.reverse();
        Ok(chain)
    }

    fn build_view(
        &self,
        node: &LocationNode,
        visited: &mut HashSet<LocationId>,
    ) -> ApplicationResult<SubtreeView> {
        let mut children = Vec::new();
        for child in self.children(node)? {
            if visited.insert(child.id) {
                children.push(self.build_view(&child, visited)?);
            }
        }
        Ok(SubtreeView::with_children(node, children))
    }
}
