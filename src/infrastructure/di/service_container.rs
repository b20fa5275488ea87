//! Service container for dependency injection
//!
//! Wires up the directory store and services from settings.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::DirectoryService;
use crate::config::{Settings, StoreBackend};
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::store::{FileStore, InMemoryStore};
use crate::infrastructure::traits::{DirectoryStore, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Directory store selected by `settings.store.backend`
    pub store: Arc<dyn DirectoryStore>,

    pub directory: DirectoryService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_fs(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container on a custom filesystem (for testing).
    pub fn with_fs(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let store: Arc<dyn DirectoryStore> = match settings.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::File => {
                Arc::new(FileStore::open(fs.clone(), settings.store.path.clone())?)
            }
        };
        debug!(
            "container: backend={} path={}",
            settings.store.backend,
            settings.store.path.display()
        );
        Ok(Self::with_store(settings, fs, store))
    }

    /// Create a service container around an existing store.
    pub fn with_store(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn DirectoryStore>,
    ) -> Self {
        let settings = Arc::new(settings);
        let directory = DirectoryService::new(store.clone());

        Self {
            settings,
            fs,
            store,
            directory,
        }
    }
}
