//! Notification delivery abstraction.

use async_trait::async_trait;

use crate::core::error::DeliveryError;
use crate::core::task::Owner;

/// Abstraction over the chat/message transport that reaches an owner.
///
/// Delivery is fire-and-forget from the monitor's point of view: a failed
/// delivery is logged by the caller and the monitor keeps running.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver a one-line text message to the owner.
    async fn notify(&self, owner: Owner, text: &str) -> Result<(), DeliveryError>;
}
