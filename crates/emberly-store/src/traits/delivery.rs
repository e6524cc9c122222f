//! Delivery attempt ledger trait.

use async_trait::async_trait;

use emberly_core::result::AppResult;
use emberly_core::types::NotificationId;
use emberly_entity::delivery::DeliveryAttempt;
use emberly_entity::notification::Channel;

/// Append-only audit trail of channel delivery attempts.
///
/// The ledger is what makes retried dispatches idempotent: a successful
/// attempt for the same (notification, channel, content hash) short-
/// circuits any later attempt.
#[async_trait]
pub trait DeliveryLedger: Send + Sync + 'static {
    /// Append an attempt record.
    async fn record(&self, attempt: DeliveryAttempt) -> AppResult<()>;

    /// The next attempt number for (notification, channel), starting at 1.
    async fn next_attempt_number(
        &self,
        id: NotificationId,
        channel: Channel,
    ) -> AppResult<u32>;

    /// Whether a delivery with this content hash already succeeded on the
    /// channel.
    async fn already_delivered(
        &self,
        id: NotificationId,
        channel: Channel,
        content_hash: &str,
    ) -> AppResult<bool>;

    /// All recorded attempts for (notification, channel), in order.
    async fn attempts_for(
        &self,
        id: NotificationId,
        channel: Channel,
    ) -> AppResult<Vec<DeliveryAttempt>>;
}
