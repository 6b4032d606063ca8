//! Runtime adapters and API surface models.

pub mod api;
pub mod tokio_spawner;

use std::future::Future;

use tokio::task::JoinHandle;

pub use api::{Health, StartOutcome, StartRequest, StatusReport};
pub use tokio_spawner::TokioSpawner;

/// Abstraction for spawning monitor workers on a runtime.
///
/// Unlike a plain fire-and-forget spawner, this hands back the join handle:
/// Stop must be able to wait for a worker to drain before reporting success.
pub trait Spawn {
    /// Spawn an async task and return its join handle.
    fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static;
}
