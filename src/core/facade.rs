//! Lifecycle facade consumed by the UI layer.
//!
//! `MonitorService` mediates every registry mutation under one ordering
//! discipline: validate, mutate the registry, spawn or join workers, then
//! snapshot. It is the only component the conversational layer talks to.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::MonitorConfig;
use crate::core::error::{StartError, StopError};
use crate::core::fetcher::AvailabilityFetcher;
use crate::core::notifier::Notifier;
use crate::core::persistence::{PersistenceManager, SnapshotStore};
use crate::core::registry::{SeatCell, TaskRegistry};
use crate::core::task::{Owner, TaskKey, TaskSpec, TaskSummary};
use crate::core::worker::{MonitorWorker, WorkerSettings};
use crate::runtime::Spawn;
use crate::util::clock::Clock;

/// The command surface over monitor task lifecycles.
///
/// One instance serves all owners. Start requests are validated before any
/// state changes; stop requests fire the cancellation signal and wait for
/// the worker to drain before reporting success; every task-count-changing
/// event triggers a snapshot.
pub struct MonitorService<S: Spawn + Clone + Send + Sync + 'static> {
    settings: WorkerSettings,
    snapshot_interval: std::time::Duration,
    registry: Arc<TaskRegistry>,
    persistence: Arc<PersistenceManager>,
    fetcher: Arc<dyn AvailabilityFetcher>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    spawner: S,
    periodic: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl<S: Spawn + Clone + Send + Sync + 'static> MonitorService<S> {
    /// Assemble a service from its collaborators and validated configuration.
    pub fn new(
        config: &MonitorConfig,
        fetcher: Arc<dyn AvailabilityFetcher>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        spawner: S,
    ) -> Self {
        Self {
            settings: WorkerSettings {
                poll_interval: config.poll_interval(),
                fetch_timeout: config.fetch_timeout(),
                alert_mode: config.alert_mode,
            },
            snapshot_interval: config.snapshot_interval(),
            registry: Arc::new(TaskRegistry::new(config.max_tasks_per_owner)),
            persistence: Arc::new(PersistenceManager::new(store, Arc::clone(&clock))),
            fetcher,
            notifier,
            clock,
            spawner,
            periodic: Mutex::new(None),
        }
    }

    /// Start a monitor task for an owner.
    ///
    /// The departure instant must be strictly in the future; past-dated
    /// requests are rejected without any side effects. Registration enforces
    /// key uniqueness and the owner quota in one critical section.
    ///
    /// # Errors
    ///
    /// [`StartError::PastDeparture`], [`StartError::DuplicateKey`], or
    /// [`StartError::OwnerQuotaExceeded`].
    pub fn start(&self, owner: Owner, spec: TaskSpec) -> Result<TaskKey, StartError> {
        let now = self.clock.now();
        if spec.departure_instant().is_some_and(|dt| dt <= now) {
            return Err(StartError::PastDeparture);
        }

        // The registry entry and the worker share the same one-shot signal.
        let cancel = CancellationToken::new();
        let (key, seats) = self.registry.register(owner, spec.clone(), cancel.clone())?;
        self.spawn_worker(owner, key.clone(), spec, seats, cancel);

        if let Err(e) = self.persistence.snapshot(&self.registry) {
            tracing::error!("snapshot after start failed: {e}");
        }
        tracing::info!("started monitoring {} for owner {}", key, owner);
        Ok(key)
    }

    /// Stop one task by key, waiting for its worker to drain.
    ///
    /// A stopper that lost the race for the worker handle to a concurrent
    /// stop still waits until the entry has left the registry, so `status`
    /// never lists a task after its stop returned.
    ///
    /// # Errors
    ///
    /// [`StopError::NotFound`] if the owner holds no task under this key.
    pub async fn stop_one(&self, owner: Owner, key: &TaskKey) -> Result<(), StopError> {
        let Some(ticket) = self.registry.begin_stop(owner, key) else {
            return Err(StopError::NotFound(key.clone()));
        };
        match ticket.join {
            Some(join) => {
                let _ = join.await;
            }
            None => ticket.drained.cancelled().await,
        }
        if let Err(e) = self.persistence.snapshot(&self.registry) {
            tracing::error!("snapshot after stop failed: {e}");
        }
        tracing::info!("stopped monitoring {} for owner {}", key, owner);
        Ok(())
    }

    /// Stop every task of an owner; returns how many this call stopped.
    ///
    /// All cancellation signals are set before any worker is waited on, so
    /// teardown latency is bounded by the slowest single worker. A ticket
    /// whose handle was already taken belongs to a concurrent stopper and is
    /// not counted here, though its removal is still awaited.
    pub async fn stop_all(&self, owner: Owner) -> usize {
        let tickets = self.registry.begin_stop_all(owner);
        let mut stopped = 0;
        for ticket in tickets {
            match ticket.join {
                Some(join) => {
                    let _ = join.await;
                    stopped += 1;
                }
                None => ticket.drained.cancelled().await,
            }
        }
        if stopped > 0 {
            if let Err(e) = self.persistence.snapshot(&self.registry) {
                tracing::error!("snapshot after stop-all failed: {e}");
            }
        }
        tracing::info!("stopped {} monitors for owner {}", stopped, owner);
        stopped
    }

    /// Read-only summaries of an owner's active tasks.
    #[must_use]
    pub fn status(&self, owner: Owner) -> Vec<TaskSummary> {
        self.registry.list(owner)
    }

    /// Restore persisted, non-expired tasks and restart their workers.
    ///
    /// Run once at startup before the command surface accepts requests.
    /// Returns the number of restarted tasks. A descriptor that no longer
    /// fits its owner's quota is dropped with a warning instead of failing
    /// recovery.
    ///
    /// # Errors
    ///
    /// [`crate::core::error::StoreError`] if the snapshot backend cannot be
    /// read.
    pub fn recover(&self) -> Result<usize, crate::core::error::StoreError> {
        let mut restarted = 0;
        for (owner, spec) in self.persistence.recover()? {
            let key = spec.key();
            let cancel = CancellationToken::new();
            match self.registry.register(owner, spec.clone(), cancel.clone()) {
                Ok((key, seats)) => {
                    self.spawn_worker(owner, key, spec, seats, cancel);
                    restarted += 1;
                }
                Err(e) => {
                    tracing::warn!("not restoring {} for owner {}: {e}", key, owner);
                }
            }
        }
        Ok(restarted)
    }

    /// Start the periodic snapshot loop. Idempotent; at most one loop runs.
    pub fn start_periodic_snapshots(&self) {
        let mut periodic = self.periodic.lock();
        if periodic.is_some() {
            return;
        }
        let shutdown = CancellationToken::new();
        let persistence = Arc::clone(&self.persistence);
        let registry = Arc::clone(&self.registry);
        let interval = self.snapshot_interval;
        let token = shutdown.clone();
        let join = self.spawner.spawn(async move {
            persistence.run_periodic(registry, interval, token).await;
        });
        *periodic = Some((shutdown, join));
    }

    /// Stop the periodic loop and write a final snapshot.
    pub async fn shutdown(&self) {
        let periodic = self.periodic.lock().take();
        if let Some((shutdown, join)) = periodic {
            shutdown.cancel();
            let _ = join.await;
        }
        if let Err(e) = self.persistence.snapshot(&self.registry) {
            tracing::error!("final snapshot failed: {e}");
        }
    }

    /// Registry handle for read-side collaborators (tests, metrics).
    #[must_use]
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    fn spawn_worker(
        &self,
        owner: Owner,
        key: TaskKey,
        spec: TaskSpec,
        seats: Arc<SeatCell>,
        cancel: CancellationToken,
    ) {
        let worker = MonitorWorker::new(
            owner,
            key.clone(),
            spec,
            seats,
            cancel,
            self.settings.clone(),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.notifier),
            Arc::clone(&self.clock),
            Arc::clone(&self.registry),
            Arc::clone(&self.persistence),
        );
        let join = self.spawner.spawn(worker.run());
        self.registry.attach_handle(owner, &key, join);
    }
}
