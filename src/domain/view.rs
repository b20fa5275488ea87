//! Read-only projections of the directory: nested subtrees and counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::entities::{LocationId, LocationNode, LocationType};

/// A node with all of its descendants expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeView {
    pub id: LocationId,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SubtreeView>,
}

impl SubtreeView {
    pub fn leaf(node: &LocationNode) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            code: node.code.clone(),
            location_type: node.location_type,
            children: Vec::new(),
        }
    }

    pub fn with_children(node: &LocationNode, children: Vec<SubtreeView>) -> Self {
        Self {
            children,
            ..Self::leaf(node)
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Level-specific name for this node's children, e.g. `districts`.
    pub fn children_label(&self) -> Option<&'static str> {
        self.location_type.child_type().map(LocationType::plural)
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SubtreeView::size).sum::<usize>()
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        let label = format!("{} [{}] ({})", self.name, self.code, self.location_type);
        Tree::new(label).with_leaves(self.children.iter().map(SubtreeView::to_tree_string))
    }
}

/// Node counts per level plus the overall total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStatistics {
    pub counts: BTreeMap<LocationType, u64>,
    pub total: u64,
}

impl LocationStatistics {
    pub fn count(&self, location_type: LocationType) -> u64 {
        self.counts.get(&location_type).copied().unwrap_or(0)
    }
}
