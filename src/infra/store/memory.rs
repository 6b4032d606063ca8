//! In-memory snapshot store for development and testing.

use parking_lot::Mutex;

use crate::core::error::StoreError;
use crate::core::persistence::{SnapshotState, SnapshotStore};

/// Snapshot store that keeps state in process memory.
///
/// Useful for tests and development; offers no durability across restarts.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    state: Mutex<SnapshotState>,
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<SnapshotState, StoreError> {
        Ok(self.state.lock().clone())
    }

    fn save(&self, state: &SnapshotState) -> Result<(), StoreError> {
        *self.state.lock() = state.clone();
        Ok(())
    }
}
