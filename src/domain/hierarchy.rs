//! Parent/child compatibility between administrative levels.

use crate::domain::entities::LocationType;
use crate::domain::error::DomainError;

/// Maximum number of parent hops from any node to its province.
pub const MAX_DEPTH: usize = LocationType::ALL.len() - 1;

/// Whether a node of `child` type may hang directly below a `parent` node.
///
/// Only the immediate next level is allowed; `Village` accepts no children.
pub fn is_valid_child(parent: LocationType, child: LocationType) -> bool {
    child.ordinal() == parent.ordinal() + 1
}

/// Check that a parent is given exactly when `child` is not a province.
///
/// Runs before the parent is resolved, so a province request naming a
/// parent is rejected without a lookup.
pub fn check_parent_presence(child: LocationType, has_parent: bool) -> Result<(), DomainError> {
    match (child.is_root(), has_parent) {
        (true, true) => Err(DomainError::InvalidHierarchy(
            "Province cannot have a parent location".to_string(),
        )),
        (false, false) => Err(DomainError::InvalidHierarchy(format!(
            "{child} must have a parent location"
        ))),
        _ => Ok(()),
    }
}

/// Check the placement of a new node of `child` type.
///
/// `parent` is the resolved parent type, or `None` when no parent was given.
pub fn check_placement(
    child: LocationType,
    parent: Option<LocationType>,
) -> Result<(), DomainError> {
    check_parent_presence(child, parent.is_some())?;
    match parent {
        Some(parent) if !is_valid_child(parent, child) => Err(DomainError::InvalidHierarchy(
            format!("{parent} cannot have child of type {child}"),
        )),
        _ => Ok(()),
    }
}
