//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod view;

pub use entities::*;
pub use error::DomainError;
pub use hierarchy::{check_parent_presence, check_placement, is_valid_child, MAX_DEPTH};
pub use view::{LocationStatistics, SubtreeView};
