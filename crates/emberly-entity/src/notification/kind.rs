//! Notification kind enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a notification for filtering and preference matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A mutual match formed.
    Match,
    /// A direct message arrived.
    Message,
    /// Someone liked the user's profile.
    Like,
    /// System-level announcements.
    System,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Message => "message",
            Self::Like => "like",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
