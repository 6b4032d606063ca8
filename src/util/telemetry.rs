//! Logging setup for the monitor service.

use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber.
///
/// Honors `RUST_LOG`; without it the crate logs at `info` and everything else
/// stays quiet. A host application that already installed its own subscriber
/// wins and this becomes a no-op.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seatwatch=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
