//! Error types for monitor lifecycle operations.

use thiserror::Error;

use crate::core::task::TaskKey;

/// Rejections surfaced to the owner when starting a monitor task.
///
/// All variants are reported before any registry mutation; a rejected start
/// leaves no state behind.
#[derive(Debug, Error)]
pub enum StartError {
    /// The owner already monitors this direction/date/time combination.
    #[error("already monitoring {0}")]
    DuplicateKey(TaskKey),
    /// The owner holds the maximum number of concurrent tasks.
    #[error("owner quota exceeded: at most {0} concurrent monitor tasks")]
    OwnerQuotaExceeded(usize),
    /// The requested departure instant is not strictly in the future.
    #[error("cannot monitor a past departure time")]
    PastDeparture,
}

/// Rejections surfaced to the owner when stopping a monitor task.
#[derive(Debug, Error)]
pub enum StopError {
    /// No active task under this key for the owner.
    #[error("no active monitor for {0}")]
    NotFound(TaskKey),
}

/// Transient failures from the availability data source.
///
/// These never terminate a worker and never surface to the owner; the worker
/// logs them and retries on the next tick.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream request failed (network, HTTP, or provider-side error).
    #[error("fetch failed: {0}")]
    Upstream(String),
    /// The bounded fetch timeout elapsed.
    #[error("fetch timed out")]
    Timeout,
    /// The provider responded but the listing could not be interpreted.
    #[error("malformed listing: {0}")]
    Malformed(String),
}

/// Failures delivering a notification to an owner.
///
/// Logged by the worker, never escalated; the task keeps running.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The chat transport rejected or dropped the message.
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// Failures from the snapshot storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem-level failure.
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted payload could not be encoded or decoded.
    #[error("store codec error: {0}")]
    Codec(#[from] serde_json::Error),
    /// Backend-specific failure with context.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
