//! # Seatwatch
//!
//! A restart-safe lifecycle manager for long-running seat-availability
//! monitor tasks.
//!
//! Seatwatch watches a finite set of user-requested availability windows
//! (a travel date, departure time, and route direction) against an external
//! data source and alerts the requesting owner when the observed seat count
//! increases. The crate owns the hard part of that system: creating,
//! tracking, persisting, recovering, and safely cancelling many independent
//! polling tasks multiplexed over a small set of owners.
//!
//! ## What lives here
//!
//! - **`TaskRegistry`**: the single source of truth for "what is running",
//!   an owner → key map behind one lock, enforcing per-owner quotas and key
//!   uniqueness.
//! - **Monitor workers**: one cancellation-aware polling loop per task that
//!   fetches a trip listing, compares the tracked row's seat count against
//!   the last observed baseline, and notifies on strict increases without
//!   stopping the task.
//! - **`PersistenceManager`**: periodic and event-driven snapshots of task
//!   descriptors to a pluggable store, with recovery of non-expired tasks at
//!   process start.
//! - **`MonitorService`**: the start/stop/status facade consumed by the
//!   conversational UI layer.
//!
//! ## What stays outside
//!
//! The chat transport, the provider-specific HTTP/scraping logic, and the
//! hosting platform's liveness endpoint are external collaborators. The core
//! consumes them through the [`core::AvailabilityFetcher`] and
//! [`core::Notifier`] traits.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use seatwatch::config::MonitorConfig;
//! use seatwatch::core::{Direction, MonitorService, Owner, TaskSpec};
//! use seatwatch::infra::store::FileSnapshotStore;
//! use seatwatch::runtime::TokioSpawner;
//! use seatwatch::util::SystemClock;
//!
//! let config = MonitorConfig::from_env()?;
//! let store = Arc::new(FileSnapshotStore::new("active_monitors.json")?);
//! let service = MonitorService::new(
//!     &config,
//!     fetcher,
//!     notifier,
//!     store,
//!     Arc::new(SystemClock),
//!     TokioSpawner::current(),
//! );
//!
//! service.recover()?;
//! service.start_periodic_snapshots();
//!
//! let key = service.start(
//!     Owner::new(42),
//!     TaskSpec::new(Direction::WoodlandsToJb, date, "08:30"),
//! )?;
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core lifecycle machinery: tasks, registry, workers, persistence, facade.
pub mod core;
/// Configuration models for the monitor service.
pub mod config;
/// Infrastructure adapters for snapshot storage backends.
pub mod infra;
/// Runtime adapters (task spawning) and API surface models.
pub mod runtime;
/// Shared utilities.
pub mod util;
