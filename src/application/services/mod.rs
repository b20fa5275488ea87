//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (DirectoryStore, FileSystem)
//! but are themselves concrete structs, not traits.

mod directory;

pub use directory::{DirectoryService, PATH_SEPARATOR};
