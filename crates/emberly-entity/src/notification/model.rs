//! Notification entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::{NotificationId, UserId};

use super::channel::Channel;
use super::kind::NotificationKind;
use super::priority::NotificationPriority;
use super::state::{ChannelStatus, NotificationState};

/// A notification to be delivered to a user.
///
/// Mutated only by the dispatch pipeline (state transitions) and by the
/// user-initiated read and delete actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Additional structured data (member ids for summaries, actor ids,
    /// match ids, previews).
    pub payload: serde_json::Value,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Grouping key for the batching engine; `None` is never grouped.
    pub group_key: Option<String>,
    /// Overall lifecycle state.
    pub state: NotificationState,
    /// Per-channel delivery status.
    pub channel_status: BTreeMap<Channel, ChannelStatus>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// First successful channel delivery.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the user read the notification. Monotonic; never cleared.
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Create a pending notification.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        payload: serde_json::Value,
        priority: NotificationPriority,
        group_key: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            kind,
            title: title.into(),
            body: body.into(),
            payload,
            priority,
            group_key,
            state: NotificationState::Pending,
            channel_status: BTreeMap::new(),
            created_at,
            delivered_at: None,
            read_at: None,
        }
    }

    /// Whether the user has read this notification.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    /// The status recorded for a channel, defaulting to `Pending`.
    pub fn status_for(&self, channel: Channel) -> ChannelStatus {
        self.channel_status
            .get(&channel)
            .copied()
            .unwrap_or(ChannelStatus::Pending)
    }

    /// Whether this notification should appear in the user's feed.
    pub fn feed_visible(&self) -> bool {
        self.status_for(Channel::InApp) != ChannelStatus::Suppressed
    }

    /// Stable content hash over the user-visible fields, used by the
    /// delivery ledger to make retried sends idempotent.
    pub fn content_hash(&self) -> String {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.id.hash(&mut hasher);
        self.title.hash(&mut hasher);
        self.body.hash(&mut hasher);
        self.payload.to_string().hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification::new(
            UserId::new(),
            NotificationKind::Like,
            "Someone likes you",
            "Open the app to find out who",
            serde_json::json!({}),
            NotificationPriority::Normal,
            Some("profile_likes".to_string()),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_is_pending_and_unread() {
        let n = sample();
        assert_eq!(n.state, NotificationState::Pending);
        assert!(n.is_unread());
        assert!(n.feed_visible());
    }

    #[test]
    fn test_content_hash_is_stable() {
        let n = sample();
        assert_eq!(n.content_hash(), n.content_hash());
    }

    #[test]
    fn test_content_hash_differs_per_notification() {
        let a = sample();
        let b = sample();
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
