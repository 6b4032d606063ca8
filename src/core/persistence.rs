//! Snapshot and recovery of task descriptors.
//!
//! The persistence layer bounds data loss on crash: snapshots are written
//! both on every task-count-changing event and on a fixed timer, and
//! recovery at process start reconstructs every non-expired task with its
//! persisted baseline. Cancellation signals and worker handles are never
//! persisted; they are recreated when a task restarts.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::core::error::StoreError;
use crate::core::registry::TaskRegistry;
use crate::core::task::{Direction, Owner, TaskSpec};
use crate::util::clock::Clock;

/// One persisted task descriptor.
///
/// Field names follow the on-disk layout (`time`, `current_seats`) so the
/// snapshot file round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTask {
    /// Travel date.
    pub date: NaiveDate,
    /// Departure time string.
    #[serde(rename = "time")]
    pub departure_time: String,
    /// Route direction.
    pub direction: Direction,
    /// Last observed seat count, or null when no fetch succeeded yet.
    #[serde(rename = "current_seats")]
    pub last_observed_seats: Option<u32>,
}

/// Full snapshot layout: owner identifier → task key → descriptor.
///
/// Ordered maps keep snapshot bytes deterministic for identical state.
pub type SnapshotState = BTreeMap<String, BTreeMap<String, PersistedTask>>;

/// Durable storage for [`SnapshotState`].
///
/// Implementations live in `infra::store`; any durable key-value or
/// flat-file encoding that round-trips snapshot → recover satisfies the
/// contract.
pub trait SnapshotStore: Send + Sync {
    /// Load the last persisted state; an empty state if none was saved yet.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the backend cannot be read or decoded.
    fn load(&self) -> Result<SnapshotState, StoreError>;

    /// Replace the persisted state.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the backend cannot be written.
    fn save(&self, state: &SnapshotState) -> Result<(), StoreError>;
}

/// Serializes registry state to a [`SnapshotStore`] and restores it.
pub struct PersistenceManager {
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
}

impl PersistenceManager {
    /// Create a manager over a store backend.
    pub fn new(store: Arc<dyn SnapshotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Write the registry's current task descriptors to the store.
    ///
    /// # Errors
    ///
    /// [`StoreError`] from the backend; callers log and carry on, the next
    /// periodic cycle retries.
    pub fn snapshot(&self, registry: &TaskRegistry) -> Result<(), StoreError> {
        let state = Self::state_from(registry.snapshot_specs());
        self.store.save(&state)?;
        tracing::info!("saved active monitors");
        Ok(())
    }

    fn state_from(specs: Vec<(Owner, TaskSpec)>) -> SnapshotState {
        let mut state = SnapshotState::new();
        for (owner, spec) in specs {
            state.entry(owner.to_string()).or_default().insert(
                spec.key().to_string(),
                PersistedTask {
                    date: spec.date,
                    departure_time: spec.departure_time,
                    direction: spec.direction,
                    last_observed_seats: spec.last_observed_seats,
                },
            );
        }
        state
    }

    /// Read the persisted state and return the descriptors worth restarting.
    ///
    /// Already-expired descriptors are dropped silently: no restart, no
    /// notification. Owner keys that do not parse are skipped with a warning
    /// rather than failing the whole recovery.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the backend cannot be read or decoded.
    pub fn recover(&self) -> Result<Vec<(Owner, TaskSpec)>, StoreError> {
        let state = self.store.load()?;
        let now = self.clock.now();
        let mut restored = Vec::new();

        for (owner_raw, tasks) in state {
            let Ok(owner) = owner_raw.parse::<Owner>() else {
                tracing::warn!("skipping unparseable owner key in snapshot: {owner_raw}");
                continue;
            };
            for (key, task) in tasks {
                let spec = TaskSpec::new(task.direction, task.date, task.departure_time)
                    .with_baseline(task.last_observed_seats);
                if spec.is_expired(now) {
                    tracing::debug!("dropping expired monitor {key} during recovery");
                    continue;
                }
                restored.push((owner, spec));
            }
        }
        tracing::info!("loaded {} active monitors", restored.len());
        Ok(restored)
    }

    /// Periodic snapshot loop, independent of any poll interval.
    ///
    /// Runs until `shutdown` fires. A failed write is logged and retried on
    /// the next cycle; it never terminates the loop.
    pub async fn run_periodic(
        &self,
        registry: Arc<TaskRegistry>,
        interval: Duration,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
            if let Err(e) = self.snapshot(&registry) {
                tracing::error!("periodic snapshot failed: {e}");
            }
        }
        tracing::debug!("periodic snapshot loop stopped");
    }
}
