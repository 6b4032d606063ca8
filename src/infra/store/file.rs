//! JSON file snapshot store.
//!
//! Persists the full snapshot state as one JSON document, the same
//! owner → key → descriptor mapping the persistence layer works with. A
//! missing file reads as empty state so first boot needs no setup.

use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::error::StoreError;
use crate::core::persistence::{SnapshotState, SnapshotStore};

/// Snapshot store backed by a single JSON file.
pub struct FileSnapshotStore {
    path: PathBuf,
    /// Serializes all file access; a load must never observe the partial
    /// state between save's truncate and its write.
    guard: Mutex<()>,
}

impl FileSnapshotStore {
    /// Create a store at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if a parent directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<SnapshotState, StoreError> {
        let _guard = self.guard.lock();
        if !self.path.exists() {
            return Ok(SnapshotState::new());
        }
        let file = OpenOptions::new().read(true).open(&self.path)?;
        let state = serde_json::from_reader(BufReader::new(file))?;
        Ok(state)
    }

    fn save(&self, state: &SnapshotState) -> Result<(), StoreError> {
        let _guard = self.guard.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        let payload = serde_json::to_vec(state)?;
        file.write_all(&payload)?;
        Ok(())
    }
}
