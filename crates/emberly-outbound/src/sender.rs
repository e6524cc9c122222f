//! Channel sender trait and the transient/permanent failure split.

use async_trait::async_trait;

use emberly_entity::notification::{Channel, Notification};

/// Error from a channel send attempt.
///
/// The dispatcher retries `Transient` failures with backoff and gives up
/// immediately on `Permanent` ones.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Timeout or 5xx-equivalent; the attempt may be retried.
    #[error("Transient channel failure: {0}")]
    Transient(String),

    /// The provider rejected the message; retrying cannot help.
    #[error("Permanent channel failure: {0}")]
    Permanent(String),
}

/// An outbound delivery channel (push, email).
///
/// Implementations must be safe to call repeatedly for the same
/// notification; dispatch-level idempotency is handled by the delivery
/// ledger, not by the sender.
#[async_trait]
pub trait ChannelSender: Send + Sync + 'static {
    /// The channel this sender delivers on.
    fn channel(&self) -> Channel;

    /// Deliver one notification. Returns when the provider has accepted
    /// or rejected the message.
    async fn send(&self, notification: &Notification) -> Result<(), SendError>;
}
