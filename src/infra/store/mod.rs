//! Snapshot store backends.
//!
//! The [`crate::core::SnapshotStore`] trait is defined next to the
//! persistence manager; the adapters here implement it for development
//! (in-memory) and production (JSON file) use.

use std::sync::Arc;

use anyhow::Context;

use crate::config::StoreBackendConfig;
use crate::core::error::AppResult;
use crate::core::persistence::SnapshotStore;

pub mod file;
pub mod memory;

pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;

/// Build the snapshot store backend named by the configuration.
///
/// # Errors
///
/// Propagates the store error when the file backend's parent directory
/// cannot be created.
pub fn from_config(config: &StoreBackendConfig) -> AppResult<Arc<dyn SnapshotStore>> {
    match config {
        StoreBackendConfig::InMemory => Ok(Arc::new(InMemorySnapshotStore::default())),
        StoreBackendConfig::File { path } => {
            let store = FileSnapshotStore::new(path)
                .with_context(|| format!("snapshot store at {path}"))?;
            Ok(Arc::new(store))
        }
    }
}
