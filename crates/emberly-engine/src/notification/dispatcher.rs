//! Channel dispatcher — idempotent delivery with bounded retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use emberly_core::config::notifications::NotificationsConfig;
use emberly_core::result::AppResult;
use emberly_entity::delivery::{DeliveryAttempt, DeliveryOutcome};
use emberly_entity::notification::{Channel, ChannelStatus, Notification};
use emberly_outbound::sender::{ChannelSender, SendError};
use emberly_store::DeliveryLedger;

/// Delivers notifications through the registered channel senders.
///
/// Every attempt lands in the delivery ledger; a successful delivery for
/// the same (notification, channel, content hash) short-circuits later
/// attempts, so a retried dispatch never reaches the user twice.
pub struct ChannelDispatcher {
    ledger: Arc<dyn DeliveryLedger>,
    senders: HashMap<Channel, Arc<dyn ChannelSender>>,
    config: NotificationsConfig,
}

impl ChannelDispatcher {
    /// Create a dispatcher over the given senders.
    pub fn new(
        ledger: Arc<dyn DeliveryLedger>,
        senders: Vec<Arc<dyn ChannelSender>>,
        config: NotificationsConfig,
    ) -> Self {
        let senders = senders.into_iter().map(|s| (s.channel(), s)).collect();
        Self {
            ledger,
            senders,
            config,
        }
    }

    /// Attempt delivery on one channel, retrying transient failures with
    /// exponential backoff up to the configured cap. Returns the final
    /// channel status; failures never propagate as errors.
    pub async fn dispatch_channel(
        &self,
        notification: &Notification,
        channel: Channel,
    ) -> AppResult<ChannelStatus> {
        let Some(sender) = self.senders.get(&channel) else {
            debug!(%channel, "No sender registered; suppressing channel");
            return Ok(ChannelStatus::Suppressed);
        };

        let content_hash = notification.content_hash();
        if self
            .ledger
            .already_delivered(notification.id, channel, &content_hash)
            .await?
        {
            self.ledger
                .record(DeliveryAttempt {
                    notification_id: notification.id,
                    channel,
                    attempt_number: self
                        .ledger
                        .next_attempt_number(notification.id, channel)
                        .await?,
                    outcome: DeliveryOutcome::Skipped,
                    content_hash,
                    error: None,
                    occurred_at: Utc::now(),
                })
                .await?;
            debug!(notification_id = %notification.id, %channel, "Duplicate dispatch skipped");
            return Ok(ChannelStatus::Delivered);
        }

        let max_attempts = self.config.max_delivery_attempts.max(1);
        loop {
            let attempt_number = self
                .ledger
                .next_attempt_number(notification.id, channel)
                .await?;
            if attempt_number > max_attempts {
                return Ok(ChannelStatus::Failed);
            }

            let result = sender.send(notification).await;
            let (outcome, error) = match &result {
                Ok(()) => (DeliveryOutcome::Delivered, None),
                Err(SendError::Transient(msg)) => {
                    (DeliveryOutcome::TransientFailure, Some(msg.clone()))
                }
                Err(SendError::Permanent(msg)) => {
                    (DeliveryOutcome::PermanentFailure, Some(msg.clone()))
                }
            };

            self.ledger
                .record(DeliveryAttempt {
                    notification_id: notification.id,
                    channel,
                    attempt_number,
                    outcome,
                    content_hash: content_hash.clone(),
                    error,
                    occurred_at: Utc::now(),
                })
                .await?;

            match result {
                Ok(()) => {
                    debug!(
                        notification_id = %notification.id,
                        %channel,
                        attempt_number,
                        "Channel delivery succeeded"
                    );
                    return Ok(ChannelStatus::Delivered);
                }
                Err(SendError::Permanent(msg)) => {
                    warn!(
                        notification_id = %notification.id,
                        %channel,
                        "Permanent channel failure: {msg}"
                    );
                    return Ok(ChannelStatus::Failed);
                }
                Err(SendError::Transient(msg)) => {
                    if attempt_number >= max_attempts {
                        warn!(
                            notification_id = %notification.id,
                            %channel,
                            attempts = attempt_number,
                            "Channel retries exhausted: {msg}"
                        );
                        return Ok(ChannelStatus::Failed);
                    }
                    let backoff = self.config.retry_backoff_ms << (attempt_number - 1);
                    debug!(
                        notification_id = %notification.id,
                        %channel,
                        attempt_number,
                        backoff_ms = backoff,
                        "Transient channel failure; backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
            }
        }
    }

    /// Whether a sender is registered for the channel.
    pub fn has_sender(&self, channel: Channel) -> bool {
        self.senders.contains_key(&channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberly_core::types::UserId;
    use emberly_entity::notification::{NotificationKind, NotificationPriority};
    use emberly_outbound::senders::memory::RecordingSender;
    use emberly_store::memory::MemoryDeliveryLedger;

    fn notification() -> Notification {
        Notification::new(
            UserId::new(),
            NotificationKind::Match,
            "It's a match!",
            "body",
            serde_json::json!({}),
            NotificationPriority::High,
            None,
            Utc::now(),
        )
    }

    fn config() -> NotificationsConfig {
        NotificationsConfig {
            max_delivery_attempts: 3,
            retry_backoff_ms: 1,
            ..NotificationsConfig::default()
        }
    }

    fn dispatcher(
        sender: Arc<RecordingSender>,
        ledger: Arc<MemoryDeliveryLedger>,
    ) -> ChannelDispatcher {
        ChannelDispatcher::new(ledger, vec![sender], config())
    }

    #[tokio::test]
    async fn test_transient_failures_retry_then_succeed() {
        let sender = Arc::new(RecordingSender::new(Channel::Push));
        sender.fail_next_transient(2);
        let ledger = Arc::new(MemoryDeliveryLedger::new());
        let d = dispatcher(Arc::clone(&sender), Arc::clone(&ledger));

        let n = notification();
        let status = d.dispatch_channel(&n, Channel::Push).await.unwrap();
        assert_eq!(status, ChannelStatus::Delivered);
        assert_eq!(sender.sent_count(), 1);

        let attempts = ledger.attempts_for(n.id, Channel::Push).await.unwrap();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[2].outcome, DeliveryOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_exhausted_retries_mark_failed() {
        let sender = Arc::new(RecordingSender::new(Channel::Push));
        sender.fail_next_transient(10);
        let ledger = Arc::new(MemoryDeliveryLedger::new());
        let d = dispatcher(Arc::clone(&sender), Arc::clone(&ledger));

        let n = notification();
        let status = d.dispatch_channel(&n, Channel::Push).await.unwrap();
        assert_eq!(status, ChannelStatus::Failed);
        assert_eq!(sender.sent_count(), 0);

        let attempts = ledger.attempts_for(n.id, Channel::Push).await.unwrap();
        assert_eq!(attempts.len(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_does_not_retry() {
        let sender = Arc::new(RecordingSender::new(Channel::Push));
        sender.fail_next_permanent(1);
        let ledger = Arc::new(MemoryDeliveryLedger::new());
        let d = dispatcher(Arc::clone(&sender), Arc::clone(&ledger));

        let n = notification();
        let status = d.dispatch_channel(&n, Channel::Push).await.unwrap();
        assert_eq!(status, ChannelStatus::Failed);

        let attempts = ledger.attempts_for(n.id, Channel::Push).await.unwrap();
        assert_eq!(attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_redelivery_is_idempotent() {
        let sender = Arc::new(RecordingSender::new(Channel::Push));
        let ledger = Arc::new(MemoryDeliveryLedger::new());
        let d = dispatcher(Arc::clone(&sender), Arc::clone(&ledger));

        let n = notification();
        assert_eq!(
            d.dispatch_channel(&n, Channel::Push).await.unwrap(),
            ChannelStatus::Delivered
        );
        assert_eq!(
            d.dispatch_channel(&n, Channel::Push).await.unwrap(),
            ChannelStatus::Delivered
        );
        // One user-visible delivery, with the duplicate recorded as skipped.
        assert_eq!(sender.sent_count(), 1);
        let attempts = ledger.attempts_for(n.id, Channel::Push).await.unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].outcome, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_missing_sender_is_suppressed() {
        let ledger = Arc::new(MemoryDeliveryLedger::new());
        let d = ChannelDispatcher::new(ledger, vec![], config());
        let status = d
            .dispatch_channel(&notification(), Channel::Email)
            .await
            .unwrap();
        assert_eq!(status, ChannelStatus::Suppressed);
    }
}
