//! In-memory notification feed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use emberly_core::result::AppResult;
use emberly_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use emberly_entity::notification::{
    Channel, ChannelStatus, Notification, NotificationPriority, NotificationState,
};

use crate::traits::notifications::NotificationStore;

/// In-memory notification store, one feed vector per user.
///
/// All mutations to a feed go through the user's dashmap entry, which
/// serializes them against each other while different users' feeds stay
/// independent — userId is the sharding key.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    feeds: DashMap<UserId, Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_notification<R>(
        &self,
        user: UserId,
        id: NotificationId,
        f: impl FnOnce(&mut Notification) -> R,
    ) -> Option<R> {
        let mut feed = self.feeds.get_mut(&user)?;
        let notification = feed.iter_mut().find(|n| n.id == id)?;
        Some(f(notification))
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn append(&self, notification: Notification) -> AppResult<()> {
        self.feeds
            .entry(notification.user_id)
            .or_default()
            .push(notification);
        Ok(())
    }

    async fn get(&self, user: UserId, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self
            .feeds
            .get(&user)
            .and_then(|feed| feed.iter().find(|n| n.id == id).cloned()))
    }

    async fn list(
        &self,
        user: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut visible: Vec<Notification> = self
            .feeds
            .get(&user)
            .map(|feed| feed.iter().filter(|n| n.feed_visible()).cloned().collect())
            .unwrap_or_default();

        // High priority ahead of any pending batch or normal item, each
        // bucket most recent first.
        visible.sort_by(|a, b| {
            let bucket = |n: &Notification| match n.priority {
                NotificationPriority::High => 0u8,
                NotificationPriority::Normal => 1u8,
            };
            bucket(a)
                .cmp(&bucket(b))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total = visible.len() as u64;
        let items: Vec<Notification> = visible
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn transition(
        &self,
        user: UserId,
        id: NotificationId,
        next: NotificationState,
    ) -> AppResult<bool> {
        Ok(self
            .with_notification(user, id, |n| {
                if n.state.can_transition_to(next) {
                    n.state = next;
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false))
    }

    async fn set_channel_status(
        &self,
        user: UserId,
        id: NotificationId,
        channel: Channel,
        status: ChannelStatus,
    ) -> AppResult<()> {
        self.with_notification(user, id, |n| {
            n.channel_status.insert(channel, status);
        });
        Ok(())
    }

    async fn set_delivered_at(
        &self,
        user: UserId,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.with_notification(user, id, |n| {
            if n.delivered_at.is_none() {
                n.delivered_at = Some(at);
            }
        });
        Ok(())
    }

    async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self
            .with_notification(user, id, |n| {
                if n.read_at.is_some() {
                    return false;
                }
                n.read_at = Some(at);
                if n.state.can_transition_to(NotificationState::Read) {
                    n.state = NotificationState::Read;
                }
                true
            })
            .unwrap_or(false))
    }

    async fn delete(&self, user: UserId, id: NotificationId) -> AppResult<bool> {
        let Some(mut feed) = self.feeds.get_mut(&user) else {
            return Ok(false);
        };
        let before = feed.len();
        feed.retain(|n| n.id != id);
        Ok(feed.len() < before)
    }

    async fn unread_count(&self, user: UserId) -> AppResult<u64> {
        Ok(self
            .feeds
            .get(&user)
            .map(|feed| {
                feed.iter()
                    .filter(|n| n.feed_visible() && n.is_unread())
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn purge_older_than(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut purged = 0u64;
        for mut entry in self.feeds.iter_mut() {
            let len_before = entry.len();
            entry.retain(|n| n.created_at >= before);
            purged += (len_before - entry.len()) as u64;
        }
        Ok(purged)
    }

    async fn trim_per_user(&self, max: usize) -> AppResult<u64> {
        let mut trimmed = 0u64;
        for mut entry in self.feeds.iter_mut() {
            if entry.len() > max {
                // Feeds are append-ordered; drop from the front (oldest).
                let excess = entry.len() - max;
                entry.drain(0..excess);
                trimmed += excess as u64;
            }
        }
        Ok(trimmed)
    }
}
