//! Notification priority levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Standard events; may be batched and deferred.
    Normal,
    /// Important events (mutual match, super-like); dispatched immediately.
    High,
}

impl NotificationPriority {
    /// Whether this priority can be accumulated into a batch.
    pub fn can_batch(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether this priority bypasses the quiet-hours deferral.
    pub fn bypasses_quiet_hours(&self) -> bool {
        matches!(self, Self::High)
    }

    /// Return the priority as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
