//! Core lifecycle machinery: domain types, registry, workers, persistence,
//! and the service facade.

pub mod error;
pub mod facade;
pub mod fetcher;
pub mod notifier;
pub mod persistence;
pub mod registry;
pub mod task;
pub mod worker;

pub use error::{AppResult, DeliveryError, FetchError, StartError, StopError, StoreError};
pub use facade::MonitorService;
pub use fetcher::{AvailabilityFetcher, Listing, TripRow};
pub use notifier::Notifier;
pub use persistence::{PersistedTask, PersistenceManager, SnapshotState, SnapshotStore};
pub use registry::{SeatCell, StopTicket, TaskRegistry};
pub use task::{Direction, Owner, TaskKey, TaskSpec, TaskSummary};
pub use worker::{AlertMode, MonitorWorker, WorkerSettings};
