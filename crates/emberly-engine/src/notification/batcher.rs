//! Batching engine — collapses bursts of same-group events into one
//! summary per rolling window.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use emberly_core::types::{NotificationId, UserId};
use emberly_entity::notification::{Notification, NotificationKind};

/// An open batch for one (user, group key).
#[derive(Debug, Clone)]
struct PendingBatch {
    kind: NotificationKind,
    opened_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    member_ids: Vec<NotificationId>,
}

/// A closed batch ready to be summarized.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// The recipient.
    pub user_id: UserId,
    /// The shared group key.
    pub group_key: String,
    /// The members' notification kind.
    pub kind: NotificationKind,
    /// When the window opened.
    pub opened_at: DateTime<Utc>,
    /// Members in arrival order.
    pub member_ids: Vec<NotificationId>,
}

impl BatchSummary {
    /// Number of accumulated members.
    pub fn count(&self) -> usize {
        self.member_ids.len()
    }
}

/// Accumulates groupable notifications per (user, group key).
///
/// The first event of a group opens a window; everything with the same
/// key arriving before the deadline joins it. `flush_due` closes windows
/// whose deadline passed — removal from the map is what makes a close
/// exactly-once under concurrent scheduler ticks.
#[derive(Debug)]
pub struct BatchAccumulator {
    window: Duration,
    pending: DashMap<(UserId, String), PendingBatch>,
}

impl BatchAccumulator {
    /// Create an accumulator with the given window length.
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window: Duration::seconds(window_seconds as i64),
            pending: DashMap::new(),
        }
    }

    /// Add a notification to its group, opening the window if absent.
    /// Returns the group size after the addition.
    pub fn accumulate(&self, notification: &Notification, now: DateTime<Utc>) -> usize {
        let Some(group_key) = notification.group_key.clone() else {
            return 0;
        };
        let mut batch = self
            .pending
            .entry((notification.user_id, group_key))
            .or_insert_with(|| PendingBatch {
                kind: notification.kind,
                opened_at: now,
                deadline: now + self.window,
                member_ids: Vec::new(),
            });
        batch.member_ids.push(notification.id);
        batch.member_ids.len()
    }

    /// Close every batch whose window has ended.
    pub fn flush_due(&self, now: DateTime<Utc>) -> Vec<BatchSummary> {
        let due: Vec<(UserId, String)> = self
            .pending
            .iter()
            .filter(|entry| entry.value().deadline <= now)
            .map(|entry| entry.key().clone())
            .collect();

        let mut closed = Vec::with_capacity(due.len());
        for key in due {
            // Only one concurrent flusher gets the removed value.
            if let Some((key, batch)) = self.pending.remove(&key) {
                closed.push(BatchSummary {
                    user_id: key.0,
                    group_key: key.1,
                    kind: batch.kind,
                    opened_at: batch.opened_at,
                    member_ids: batch.member_ids,
                });
            }
        }
        closed
    }

    /// Number of currently open batches.
    pub fn open_batches(&self) -> usize {
        self.pending.len()
    }
}
