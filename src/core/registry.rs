//! In-memory registry of active monitor tasks.
//!
//! The registry owns the owner → key → task map and the synchronization
//! discipline guarding it; it holds no polling logic. It is the single
//! source of truth for "what is running" and the only resource shared
//! between workers and the facade.
//!
//! All mutation happens under one `parking_lot::Mutex`, and every
//! check-then-write sequence (duplicate key, owner quota) stays inside a
//! single critical section so two concurrent starts for the same owner+key
//! cannot both pass validation. The lock is never held across an await:
//! stop operations take a [`StopTicket`] out under the lock and join the
//! worker afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::error::StartError;
use crate::core::task::{Owner, TaskKey, TaskSpec, TaskSummary};

/// Shared cell holding a task's most recently observed seat count.
///
/// Written by the task's own worker only; read by status listings and the
/// persistence snapshot.
#[derive(Debug, Default)]
pub struct SeatCell {
    seats: Mutex<Option<u32>>,
}

impl SeatCell {
    /// Cell pre-loaded with a recovered baseline.
    #[must_use]
    pub const fn with_baseline(seats: Option<u32>) -> Self {
        Self {
            seats: Mutex::new(seats),
        }
    }

    /// Latest observed seat count, if any fetch has succeeded.
    #[must_use]
    pub fn get(&self) -> Option<u32> {
        *self.seats.lock()
    }

    /// Replace the observed seat count.
    pub fn set(&self, seats: u32) {
        *self.seats.lock() = Some(seats);
    }
}

/// Registry entry for one active task.
struct TaskEntry {
    spec: TaskSpec,
    seats: Arc<SeatCell>,
    cancel: CancellationToken,
    /// Fired by [`TaskRegistry::deregister`] once the entry is removed.
    drained: CancellationToken,
    /// Taken by at most one stopper; the worker cannot join itself.
    join: Option<JoinHandle<()>>,
}

/// Handle taken out of the registry by a stop operation.
///
/// The cancellation signal has already been fired by the time a ticket
/// exists; awaiting [`StopTicket::join`] outside the registry lock drains
/// the worker to completion. A stopper that lost the race for the handle
/// waits on [`StopTicket::drained`] instead.
pub struct StopTicket {
    /// Key of the task being stopped.
    pub key: TaskKey,
    /// Worker handle, if this stopper won the race to take it.
    pub join: Option<JoinHandle<()>>,
    /// Fired once the entry has left the registry.
    pub drained: CancellationToken,
}

/// Owner-scoped map of active monitor tasks with quota enforcement.
pub struct TaskRegistry {
    max_per_owner: usize,
    tasks: Mutex<HashMap<Owner, HashMap<TaskKey, TaskEntry>>>,
}

impl TaskRegistry {
    /// Create an empty registry with a per-owner concurrency ceiling.
    #[must_use]
    pub fn new(max_per_owner: usize) -> Self {
        Self {
            max_per_owner,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Configured per-owner concurrency ceiling.
    #[must_use]
    pub const fn max_per_owner(&self) -> usize {
        self.max_per_owner
    }

    /// Register a task descriptor, enforcing key uniqueness and owner quota.
    ///
    /// Uniqueness and quota are checked and the entry inserted in one
    /// critical section. Returns the task key and the shared seat cell the
    /// worker will write through.
    ///
    /// # Errors
    ///
    /// [`StartError::DuplicateKey`] if the owner already monitors this key;
    /// [`StartError::OwnerQuotaExceeded`] if the owner is at the ceiling.
    pub fn register(
        &self,
        owner: Owner,
        spec: TaskSpec,
        cancel: CancellationToken,
    ) -> Result<(TaskKey, Arc<SeatCell>), StartError> {
        let key = spec.key();
        let seats = Arc::new(SeatCell::with_baseline(spec.last_observed_seats));

        let mut tasks = self.tasks.lock();
        let owned = tasks.entry(owner).or_default();
        if owned.contains_key(&key) {
            return Err(StartError::DuplicateKey(key));
        }
        if owned.len() >= self.max_per_owner {
            return Err(StartError::OwnerQuotaExceeded(self.max_per_owner));
        }
        owned.insert(
            key.clone(),
            TaskEntry {
                spec,
                seats: Arc::clone(&seats),
                cancel,
                drained: CancellationToken::new(),
                join: None,
            },
        );
        Ok((key, seats))
    }

    /// Attach the spawned worker handle to its entry.
    ///
    /// A task that already terminated and removed itself is a no-op; its
    /// detached worker has nothing left to do.
    pub fn attach_handle(&self, owner: Owner, key: &TaskKey, join: JoinHandle<()>) {
        let mut tasks = self.tasks.lock();
        if let Some(entry) = tasks.get_mut(&owner).and_then(|owned| owned.get_mut(key)) {
            entry.join = Some(join);
        }
    }

    /// Remove a task entry. Returns whether an entry was present.
    ///
    /// This is the worker's own terminating path as well as the final step
    /// of an explicit stop; empty owner maps are dropped.
    pub fn deregister(&self, owner: Owner, key: &TaskKey) -> bool {
        let mut tasks = self.tasks.lock();
        let Some(owned) = tasks.get_mut(&owner) else {
            return false;
        };
        let removed = owned.remove(key);
        if let Some(entry) = &removed {
            entry.drained.cancel();
        }
        if owned.is_empty() {
            tasks.remove(&owner);
        }
        removed.is_some()
    }

    /// Fire the cancellation signal for one task and take its worker handle.
    ///
    /// Returns `None` if the owner holds no task under this key. Only one
    /// concurrent stopper can obtain the join handle; later stoppers get a
    /// ticket with `join: None` and wait on [`StopTicket::drained`] instead.
    pub fn begin_stop(&self, owner: Owner, key: &TaskKey) -> Option<StopTicket> {
        let mut tasks = self.tasks.lock();
        let entry = tasks.get_mut(&owner)?.get_mut(key)?;
        entry.cancel.cancel();
        Some(StopTicket {
            key: key.clone(),
            join: entry.join.take(),
            drained: entry.drained.clone(),
        })
    }

    /// Fire cancellation for every task of an owner and take all handles.
    ///
    /// All signals are set before the lock is released, so the workers tear
    /// down concurrently while the caller joins them one by one.
    pub fn begin_stop_all(&self, owner: Owner) -> Vec<StopTicket> {
        let mut tasks = self.tasks.lock();
        let Some(owned) = tasks.get_mut(&owner) else {
            return Vec::new();
        };
        owned
            .iter_mut()
            .map(|(key, entry)| {
                entry.cancel.cancel();
                StopTicket {
                    key: key.clone(),
                    join: entry.join.take(),
                    drained: entry.drained.clone(),
                }
            })
            .collect()
    }

    /// Summary of one active task, or `None` if the owner does not hold it.
    #[must_use]
    pub fn get(&self, owner: Owner, key: &TaskKey) -> Option<TaskSummary> {
        let tasks = self.tasks.lock();
        let entry = tasks.get(&owner)?.get(key)?;
        Some(TaskSummary {
            key: key.clone(),
            direction: entry.spec.direction,
            date: entry.spec.date,
            departure_time: entry.spec.departure_time.clone(),
            last_observed_seats: entry.seats.get(),
        })
    }

    /// Summaries of an owner's active tasks, sorted by key.
    #[must_use]
    pub fn list(&self, owner: Owner) -> Vec<TaskSummary> {
        let tasks = self.tasks.lock();
        let mut summaries: Vec<TaskSummary> = tasks
            .get(&owner)
            .map(|owned| {
                owned
                    .iter()
                    .map(|(key, entry)| TaskSummary {
                        key: key.clone(),
                        direction: entry.spec.direction,
                        date: entry.spec.date,
                        departure_time: entry.spec.departure_time.clone(),
                        last_observed_seats: entry.seats.get(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        summaries
    }

    /// Number of active tasks for an owner.
    #[must_use]
    pub fn active_count(&self, owner: Owner) -> usize {
        self.tasks.lock().get(&owner).map_or(0, HashMap::len)
    }

    /// Descriptors of every active task with current baselines filled in.
    ///
    /// This is the persistence view: cancellation tokens and worker handles
    /// are deliberately absent, they are recreated on recovery.
    #[must_use]
    pub fn snapshot_specs(&self) -> Vec<(Owner, TaskSpec)> {
        let tasks = self.tasks.lock();
        tasks
            .iter()
            .flat_map(|(owner, owned)| {
                owned.values().map(|entry| {
                    let spec = entry.spec.clone().with_baseline(entry.seats.get());
                    (*owner, spec)
                })
            })
            .collect()
    }
}
