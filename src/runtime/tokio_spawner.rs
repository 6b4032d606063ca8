//! Tokio runtime spawner implementation.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::runtime::Spawn;

/// Tokio-based spawner that executes monitor workers on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Create a spawner from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawner bound to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tokio_spawner_spawn_and_join() {
        let spawner = TokioSpawner::current();

        let (tx, rx) = tokio::sync::oneshot::channel();
        let join = spawner.spawn(async move {
            tx.send(123).unwrap();
        });

        assert_eq!(rx.await.expect("oneshot result"), 123);
        join.await.unwrap();
    }
}
