//! Durable directory store backed by a TOML snapshot file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{LocationId, LocationNode, LocationType};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::store::index::DirectoryIndex;
use crate::infrastructure::traits::{DirectoryStore, FileSystem, StoreError, StoreResult};

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk layout: records in insertion order, parents before children.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    locations: Vec<LocationNode>,
}

/// Directory store that rewrites its snapshot file on every mutation.
///
/// A mutation is applied to a copy of the index, written to a temporary
/// sibling file and renamed into place; only then does the copy become
/// visible to readers. A failed write leaves file and memory untouched.
///
/// The store assumes it is the only writer of its file. Each process keeps
/// its own index, so two processes writing the same snapshot concurrently
/// can lose updates: the last rename wins.
pub struct FileStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    index: RwLock<DirectoryIndex>,
}

impl FileStore {
    /// Open the store at `path`, loading the snapshot if the file exists.
    pub fn open(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> InfraResult<Self> {
        let path = path.into();
        let index = if fs.exists(&path) {
            Self::load(fs.as_ref(), &path)?
        } else {
            debug!("open: no snapshot at {}, starting empty", path.display());
            DirectoryIndex::new()
        };
        debug!("open: {} location(s) from {}", index.len(), path.display());
        Ok(Self {
            path,
            fs,
            index: RwLock::new(index),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(fs: &dyn FileSystem, path: &Path) -> InfraResult<DirectoryIndex> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read snapshot {}", path.display()), e))?;
        let snapshot: Snapshot =
            toml::from_str(&content).map_err(|e| InfraError::snapshot(path, e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(InfraError::snapshot(
                path,
                format!("unsupported snapshot version {}", snapshot.version),
            ));
        }
        DirectoryIndex::from_nodes(snapshot.locations)
            .map_err(|e| InfraError::snapshot(path, e.to_string()))
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, DirectoryIndex>> {
        self.index.read().map_err(|_| StoreError::Poisoned)
    }

    fn mutate<R>(
        &self,
        op: impl FnOnce(&mut DirectoryIndex) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut guard = self.index.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, index: &DirectoryIndex) -> StoreResult<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            locations: index.iter().cloned().collect(),
        };
        let content = toml::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::backend("serialize snapshot", e))?;

        let tmp = self.temp_path();
        self.fs
            .ensure_parent(&self.path)
            .map_err(|e| StoreError::backend(format!("create dir for {}", self.path.display()), e))?;
        self.fs
            .write(&tmp, &content)
            .map_err(|e| StoreError::backend(format!("write {}", tmp.display()), e))?;
        if let Err(e) = self.fs.rename(&tmp, &self.path) {
            if let Err(cleanup) = self.fs.remove_file(&tmp) {
                warn!("persist: cannot remove {}: {}", tmp.display(), cleanup);
            }
            return Err(StoreError::backend(
                format!("replace {}", self.path.display()),
                e,
            ));
        }
        debug!(
            "persist: {} location(s) to {}",
            snapshot.locations.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("locations.toml"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DirectoryStore for FileStore {
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
        self.mutate(|index| index.upsert(node))
    }

    fn update(&self, node: LocationNode) -> StoreResult<LocationNode> {
        self.mutate(|index| index.replace(node))
    }

    fn delete(&self, id: &LocationId) -> StoreResult<()> {
        self.mutate(|index| index.remove(id).map(|_| ()))
    }

    fn count(&self) -> StoreResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    fn count_by_type(&self, location_type: LocationType) -> StoreResult<u64> {
        Ok(self.read()?.count_of_type(location_type) as u64)
    }
}
