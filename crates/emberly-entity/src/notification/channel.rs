//! Delivery channel enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A delivery mechanism for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Mobile push.
    Push,
    /// Email.
    Email,
    /// The in-app notification list.
    InApp,
}

impl Channel {
    /// All channels, in dispatch order.
    pub const ALL: [Channel; 3] = [Channel::InApp, Channel::Push, Channel::Email];

    /// Whether this channel respects quiet hours.
    ///
    /// The in-app list is always written; only the side channels defer.
    pub fn respects_quiet_hours(&self) -> bool {
        matches!(self, Self::Push | Self::Email)
    }

    /// Return the channel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
            Self::InApp => "in_app",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
