//! Directory store implementations

mod file;
mod index;
mod memory;

pub use file::FileStore;
pub use index::DirectoryIndex;
pub use memory::InMemoryStore;
