//! In-memory delivery attempt ledger.

use async_trait::async_trait;
use dashmap::DashMap;

use emberly_core::result::AppResult;
use emberly_core::types::NotificationId;
use emberly_entity::delivery::{DeliveryAttempt, DeliveryOutcome};
use emberly_entity::notification::Channel;

use crate::traits::delivery::DeliveryLedger;

/// In-memory append-only delivery ledger keyed by (notification, channel).
#[derive(Debug, Default)]
pub struct MemoryDeliveryLedger {
    attempts: DashMap<(NotificationId, Channel), Vec<DeliveryAttempt>>,
}

impl MemoryDeliveryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryLedger for MemoryDeliveryLedger {
    async fn record(&self, attempt: DeliveryAttempt) -> AppResult<()> {
        self.attempts
            .entry((attempt.notification_id, attempt.channel))
            .or_default()
            .push(attempt);
        Ok(())
    }

    async fn next_attempt_number(
        &self,
        id: NotificationId,
        channel: Channel,
    ) -> AppResult<u32> {
        Ok(self
            .attempts
            .get(&(id, channel))
            .map(|v| v.len() as u32)
            .unwrap_or(0)
            + 1)
    }

    async fn already_delivered(
        &self,
        id: NotificationId,
        channel: Channel,
        content_hash: &str,
    ) -> AppResult<bool> {
        Ok(self
            .attempts
            .get(&(id, channel))
            .map(|v| {
                v.iter().any(|a| {
                    a.outcome == DeliveryOutcome::Delivered && a.content_hash == content_hash
                })
            })
            .unwrap_or(false))
    }

    async fn attempts_for(
        &self,
        id: NotificationId,
        channel: Channel,
    ) -> AppResult<Vec<DeliveryAttempt>> {
        Ok(self
            .attempts
            .get(&(id, channel))
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn attempt(
        id: NotificationId,
        number: u32,
        outcome: DeliveryOutcome,
    ) -> DeliveryAttempt {
        DeliveryAttempt {
            notification_id: id,
            channel: Channel::Push,
            attempt_number: number,
            outcome,
            content_hash: "abc123".to_string(),
            error: None,
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_attempt_numbers_increment() {
        let ledger = MemoryDeliveryLedger::new();
        let id = NotificationId::new();

        assert_eq!(ledger.next_attempt_number(id, Channel::Push).await.unwrap(), 1);
        ledger
            .record(attempt(id, 1, DeliveryOutcome::TransientFailure))
            .await
            .unwrap();
        assert_eq!(ledger.next_attempt_number(id, Channel::Push).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_already_delivered_matches_hash() {
        let ledger = MemoryDeliveryLedger::new();
        let id = NotificationId::new();
        ledger
            .record(attempt(id, 1, DeliveryOutcome::Delivered))
            .await
            .unwrap();

        assert!(ledger.already_delivered(id, Channel::Push, "abc123").await.unwrap());
        assert!(!ledger.already_delivered(id, Channel::Push, "other").await.unwrap());
        assert!(!ledger.already_delivered(id, Channel::Email, "abc123").await.unwrap());
    }
}
