//! Append-only delivery attempt records supporting retry and idempotency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::NotificationId;

use crate::notification::Channel;

/// Outcome of a single channel delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The provider accepted the message.
    Delivered,
    /// Timeout or 5xx-equivalent; eligible for retry.
    TransientFailure,
    /// Rejected permanently; not retried.
    PermanentFailure,
    /// Skipped because an identical delivery already succeeded.
    Skipped,
}

/// One entry in the delivery audit trail, keyed by
/// (notification, channel, attempt number).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    /// The notification being delivered.
    pub notification_id: NotificationId,
    /// The channel attempted.
    pub channel: Channel,
    /// 1-based attempt counter per (notification, channel).
    pub attempt_number: u32,
    /// What happened.
    pub outcome: DeliveryOutcome,
    /// Hash of the content that was (or would have been) sent.
    pub content_hash: String,
    /// Provider error detail, if any.
    pub error: Option<String>,
    /// When the attempt happened.
    pub occurred_at: DateTime<Utc>,
}
