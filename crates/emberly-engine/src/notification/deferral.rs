//! Queue of quiet-hours-deferred channel deliveries.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use emberly_core::types::NotificationId;
use emberly_entity::notification::{Channel, Notification};

/// One channel delivery waiting for quiet hours to end.
#[derive(Debug, Clone)]
pub struct DeferredDelivery {
    /// The notification to deliver.
    pub notification: Notification,
    /// The channel the delivery was deferred on.
    pub channel: Channel,
    /// When the quiet-hours window ends.
    pub release_at: DateTime<Utc>,
    /// When the deferral lapses; past this the delivery is dropped as
    /// suppressed instead of fired.
    pub expires_at: DateTime<Utc>,
}

/// Holds deferred deliveries until their release instant.
///
/// `take_due` removes entries as it returns them, so a delivery is
/// released to exactly one concurrent scheduler tick.
#[derive(Debug, Default)]
pub struct DeferralQueue {
    deferred: DashMap<(NotificationId, Channel), DeferredDelivery>,
}

impl DeferralQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a deferred delivery. Re-scheduling the same
    /// (notification, channel) replaces the previous entry.
    pub fn schedule(&self, delivery: DeferredDelivery) {
        self.deferred.insert(
            (delivery.notification.id, delivery.channel),
            delivery,
        );
    }

    /// Remove and return every delivery whose release instant has passed.
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<DeferredDelivery> {
        let due: Vec<(NotificationId, Channel)> = self
            .deferred
            .iter()
            .filter(|entry| entry.value().release_at <= now)
            .map(|entry| *entry.key())
            .collect();

        due.into_iter()
            .filter_map(|key| self.deferred.remove(&key).map(|(_, d)| d))
            .collect()
    }

    /// Number of waiting deliveries.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Whether any channel of this notification is still waiting.
    pub fn has_pending_for(&self, id: NotificationId) -> bool {
        self.deferred.iter().any(|entry| entry.key().0 == id)
    }
}
