//! Notification feed storage trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use emberly_core::result::AppResult;
use emberly_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use emberly_entity::notification::{Channel, ChannelStatus, Notification, NotificationState};

/// Storage for per-user notification feeds and read state.
///
/// Implementations must serialize mutations to one user's feed with
/// respect to each other while letting different users proceed in
/// parallel; user id is the sharding key.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Append a notification to the recipient's feed.
    async fn append(&self, notification: Notification) -> AppResult<()>;

    /// Fetch a single notification.
    async fn get(&self, user: UserId, id: NotificationId) -> AppResult<Option<Notification>>;

    /// List the user's feed: high-priority first (most recent first),
    /// then the rest (most recent first). Rows whose in-app channel was
    /// suppressed are not listed.
    async fn list(
        &self,
        user: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Compare-and-swap the overall state. Returns `false` when the
    /// transition is not allowed from the current state.
    async fn transition(
        &self,
        user: UserId,
        id: NotificationId,
        next: NotificationState,
    ) -> AppResult<bool>;

    /// Record a channel's delivery status.
    async fn set_channel_status(
        &self,
        user: UserId,
        id: NotificationId,
        channel: Channel,
        status: ChannelStatus,
    ) -> AppResult<()>;

    /// Set `delivered_at` if not already set.
    async fn set_delivered_at(
        &self,
        user: UserId,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark a notification read. Monotonic: returns `true` only the
    /// first time; `read_at` is never changed afterwards.
    async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Remove a notification from the feed. Returns `true` if it existed.
    async fn delete(&self, user: UserId, id: NotificationId) -> AppResult<bool>;

    /// Count unread, feed-visible notifications (the badge value).
    async fn unread_count(&self, user: UserId) -> AppResult<u64>;

    /// Purge notifications created before the cutoff, across all users.
    async fn purge_older_than(&self, before: DateTime<Utc>) -> AppResult<u64>;

    /// Keep only the newest `max` notifications per user.
    async fn trim_per_user(&self, max: usize) -> AppResult<u64>;
}
