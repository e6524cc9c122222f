//! Notification lifecycle and per-channel delivery states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall lifecycle state of a notification.
///
/// Transitions are driven solely by the dispatch pipeline, except for
/// `Read`, which only the user-initiated read path sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    /// Created, not yet dispatched.
    Pending,
    /// All side channels are waiting out quiet hours.
    Deferred,
    /// At least one channel delivered.
    Delivered,
    /// The user read the notification.
    Read,
    /// Every attempted channel exhausted its retries.
    Failed,
}

impl NotificationState {
    /// Whether the pipeline may move from this state to `next`.
    ///
    /// `Read` is terminal for the pipeline; only delete removes it.
    pub fn can_transition_to(&self, next: NotificationState) -> bool {
        use NotificationState::*;
        match (self, next) {
            (Pending, Deferred | Delivered | Failed) => true,
            (Deferred, Delivered | Failed) => true,
            (Delivered, Read) => true,
            // A deferred or failed side-channel notification is still
            // visible in-app, so the user can read it directly.
            (Deferred, Read) | (Failed, Read) => true,
            _ => false,
        }
    }

    /// Return the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deferred => "deferred",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for NotificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery status of a single channel for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// Not yet attempted.
    Pending,
    /// Waiting for the quiet-hours window to end.
    Deferred,
    /// Delivered successfully.
    Delivered,
    /// Retries exhausted.
    Failed,
    /// Disabled by preference or expired while deferred.
    Suppressed,
}
