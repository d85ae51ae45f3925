//! Storage media for the raw snapshot blob.

use super::PersistenceError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

/// Where the serialized snapshot lives.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` if nothing has been saved yet.
    async fn load_raw(&self) -> Result<Option<String>, PersistenceError>;

    /// Replaces the stored snapshot as a whole.
    async fn save_raw(&self, data: &str) -> Result<(), PersistenceError>;
}

/// A JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load_raw(&self) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_raw(&self, data: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write next to the target, then rename over it.
        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(data.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

/// An in-process store, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    data: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<String>) -> Self {
        Self {
            data: Mutex::new(Some(data.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// The last successfully saved blob.
    pub fn contents(&self) -> Option<String> {
        self.data.lock().ok().and_then(|d| d.clone())
    }

    /// Makes subsequent saves fail, as a full or unavailable medium would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_raw(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents())
    }

    async fn save_raw(&self, data: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io(std::io::Error::other(
                "snapshot storage unavailable",
            )));
        }
        if let Ok(mut slot) = self.data.lock() {
            *slot = Some(data.to_string());
        }
        Ok(())
    }
}
