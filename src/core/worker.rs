//! Per-task polling worker.
//!
//! Each active monitor task owns exactly one worker: a fetch/compare/notify
//! loop that runs until the task expires or its cancellation signal fires.
//! Ticks within one task are strictly sequential; tasks never coordinate
//! with each other beyond the registry.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::core::error::FetchError;
use crate::core::fetcher::{AvailabilityFetcher, Listing};
use crate::core::notifier::Notifier;
use crate::core::persistence::PersistenceManager;
use crate::core::registry::{SeatCell, TaskRegistry};
use crate::core::task::{Owner, TaskKey, TaskSpec};
use crate::util::clock::Clock;

/// What a worker does when it sees seats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertMode {
    /// Reference behavior: notify on every strict increase over the
    /// previously observed count and keep monitoring until expiry or stop.
    #[default]
    SeatIncrease,
    /// One-shot variant: notify the first time any seat is available, then
    /// terminate the task.
    FirstAvailability,
}

/// Tuning knobs a worker runs under.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Fixed polling period between ticks.
    pub poll_interval: Duration,
    /// Upper bound on a single fetch call; a slow provider must not defeat
    /// cancellation responsiveness.
    pub fetch_timeout: Duration,
    /// Seats-found rule.
    pub alert_mode: AlertMode,
}

/// The polling state machine for one monitor task.
///
/// Lifecycle: baseline fetch (if no persisted baseline) → polling ticks →
/// optional notifications → termination on expiry or cancellation. On
/// termination the worker deregisters itself and triggers a snapshot; that
/// and explicit stop are the only paths that remove a task.
pub struct MonitorWorker {
    owner: Owner,
    key: TaskKey,
    spec: TaskSpec,
    seats: Arc<SeatCell>,
    cancel: CancellationToken,
    settings: WorkerSettings,
    fetcher: Arc<dyn AvailabilityFetcher>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    registry: Arc<TaskRegistry>,
    persistence: Arc<PersistenceManager>,
}

impl MonitorWorker {
    /// Assemble a worker for a registered task.
    ///
    /// `seats` must be the cell handed out by the registry for this key, so
    /// status listings and snapshots observe the worker's writes.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        owner: Owner,
        key: TaskKey,
        spec: TaskSpec,
        seats: Arc<SeatCell>,
        cancel: CancellationToken,
        settings: WorkerSettings,
        fetcher: Arc<dyn AvailabilityFetcher>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        registry: Arc<TaskRegistry>,
        persistence: Arc<PersistenceManager>,
    ) -> Self {
        Self {
            owner,
            key,
            spec,
            seats,
            cancel,
            settings,
            fetcher,
            notifier,
            clock,
            registry,
            persistence,
        }
    }

    /// Run the monitor loop to completion.
    pub async fn run(self) {
        tracing::info!(
            "starting monitor for {} on {} for owner {}",
            self.spec.departure_time,
            self.spec.date,
            self.owner
        );

        if self.spec.is_expired(self.clock.now()) {
            tracing::info!("monitor expired before first tick for {}", self.key);
        } else {
            if self.seats.get().is_none() {
                self.establish_baseline().await;
            }
            self.poll_loop().await;
        }

        self.registry.deregister(self.owner, &self.key);
        if let Err(e) = self.persistence.snapshot(&self.registry) {
            tracing::error!("snapshot after monitor exit failed: {e}");
        }
        tracing::info!("monitor ended and cleaned up for {} owner {}", self.key, self.owner);
    }

    /// One fetch to set the comparison baseline before the loop starts.
    /// A failure here is transient: the baseline stays absent and the first
    /// successful tick establishes it instead.
    async fn establish_baseline(&self) {
        match self.fetch_bounded().await {
            Ok(listing) => {
                let seats = listing.seats_at(&self.spec.departure_time);
                self.seats.set(seats);
                tracing::info!(
                    "initial seats set to {} for {} on {}",
                    seats,
                    self.spec.departure_time,
                    self.spec.date
                );
            }
            Err(e) => {
                tracing::warn!("failed to fetch initial seats for {}: {e}", self.key);
            }
        }
    }

    async fn poll_loop(&self) {
        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("monitor cancelled for {}", self.key);
                break;
            }
            if self.spec.is_expired(self.clock.now()) {
                tracing::info!(
                    "monitor expired for {} on {} for {}",
                    self.spec.departure_time,
                    self.spec.date,
                    self.key
                );
                break;
            }

            if self.tick().await == TickOutcome::Terminate {
                break;
            }

            // Interruptible wait: Stop must take effect immediately, not
            // after the full interval.
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::info!("monitor cancelled for {}", self.key);
                    break;
                }
                () = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }

    /// One polling tick: fetch, compare against the baseline, maybe notify,
    /// then unconditionally replace the baseline. Fetch failures leave the
    /// baseline untouched and the task keeps polling.
    async fn tick(&self) -> TickOutcome {
        let listing = match self.fetch_bounded().await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(
                    "failed to retrieve trip data for {}: {e}; retrying in {:?}",
                    self.key,
                    self.settings.poll_interval
                );
                return TickOutcome::Continue;
            }
        };

        let seats = listing.seats_at(&self.spec.departure_time);
        let last = self.seats.get();
        tracing::debug!("current seats: {} for {}", seats, self.key);

        let outcome = match self.settings.alert_mode {
            AlertMode::SeatIncrease => {
                if last.is_some_and(|last| seats > last) {
                    tracing::info!("seat increase detected: {} seats for {}", seats, self.key);
                    self.notify(&format!(
                        "The number of available seats has increased to {} for the train at {} on {}.",
                        seats, self.spec.departure_time, self.spec.date
                    ))
                    .await;
                }
                TickOutcome::Continue
            }
            AlertMode::FirstAvailability => {
                if seats > 0 {
                    tracing::info!("seats found: {} for {}", seats, self.key);
                    self.notify(&format!(
                        "Seats are available for the train at {} on {}: {} left.",
                        self.spec.departure_time, self.spec.date, seats
                    ))
                    .await;
                    TickOutcome::Terminate
                } else {
                    TickOutcome::Continue
                }
            }
        };

        self.seats.set(seats);
        outcome
    }

    /// Deliver a notification; failures are logged and never affect the task.
    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.notify(self.owner, text).await {
            tracing::error!("failed to notify owner {}: {e}", self.owner);
        }
    }

    /// Fetch with the configured timeout; a timeout reads as a fetch failure.
    async fn fetch_bounded(&self) -> Result<Listing, FetchError> {
        match tokio::time::timeout(
            self.settings.fetch_timeout,
            self.fetcher.fetch(self.spec.date, self.spec.direction),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

/// Whether the loop continues after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Terminate,
}
