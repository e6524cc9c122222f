//! Notification domain entities.

pub mod channel;
pub mod kind;
pub mod model;
pub mod preference;
pub mod priority;
pub mod state;

pub use channel::Channel;
pub use kind::NotificationKind;
pub use model::Notification;
pub use preference::{NotificationPreferences, QuietHours};
pub use priority::NotificationPriority;
pub use state::{ChannelStatus, NotificationState};
