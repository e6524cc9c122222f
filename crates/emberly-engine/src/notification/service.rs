//! Notification feed operations and preference management.

use std::sync::Arc;

use chrono::NaiveTime;
use serde::Deserialize;
use tracing::info;

use emberly_core::config::notifications::NotificationsConfig;
use emberly_core::error::AppError;
use emberly_core::result::AppResult;
use emberly_core::types::{NotificationId, PageRequest, PageResponse};
use emberly_entity::notification::preference::KindPreference;
use emberly_entity::notification::{Notification, NotificationPreferences, QuietHours};
use emberly_store::{NotificationStore, PreferenceStore};

use crate::context::RequestContext;

/// Partial preference update; absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    /// Match notification toggles.
    #[serde(default)]
    pub matches: Option<KindPreference>,
    /// Message notification toggles.
    #[serde(default)]
    pub messages: Option<KindPreference>,
    /// Like notification toggles.
    #[serde(default)]
    pub likes: Option<KindPreference>,
    /// System notification toggles.
    #[serde(default)]
    pub system: Option<KindPreference>,
    /// Turn quiet hours on (with the default window unless one is given)
    /// or off.
    #[serde(default)]
    pub quiet_hours_enabled: Option<bool>,
    /// Explicit quiet-hours window.
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
    /// Local-time offset from UTC in minutes.
    #[serde(default)]
    pub tz_offset_minutes: Option<i32>,
    /// Whether like bursts are digested into summaries.
    #[serde(default)]
    pub digest_opt_in: Option<bool>,
}

/// Manages user notification feeds and preferences.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    prefs: Arc<dyn PreferenceStore>,
    config: NotificationsConfig,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        prefs: Arc<dyn PreferenceStore>,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            store,
            prefs,
            config,
        }
    }

    /// Lists the current user's feed, high-priority first.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.store.list(ctx.user_id, &page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.unread_count(ctx.user_id).await
    }

    /// Marks a notification as read. Idempotent: reading twice leaves
    /// `read_at` at the first read's instant.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        if self.store.get(ctx.user_id, id).await?.is_none() {
            return Err(AppError::not_found(format!("No notification {id}")));
        }
        self.store.mark_read(ctx.user_id, id, ctx.request_time).await?;
        Ok(())
    }

    /// Deletes a notification from the user's feed.
    pub async fn delete_notification(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> AppResult<()> {
        if !self.store.delete(ctx.user_id, id).await? {
            return Err(AppError::not_found(format!("No notification {id}")));
        }
        Ok(())
    }

    /// Gets the user's notification preferences.
    pub async fn get_preferences(&self, ctx: &RequestContext) -> AppResult<NotificationPreferences> {
        self.prefs.get(ctx.user_id).await
    }

    /// Applies a partial preference update.
    ///
    /// Enabling quiet hours without a window applies the configured
    /// default window (a policy parameter, not a constant).
    pub async fn update_preferences(
        &self,
        ctx: &RequestContext,
        update: PreferencesUpdate,
    ) -> AppResult<NotificationPreferences> {
        let mut prefs = self.prefs.get(ctx.user_id).await?;

        if let Some(matches) = update.matches {
            prefs.matches = matches;
        }
        if let Some(messages) = update.messages {
            prefs.messages = messages;
        }
        if let Some(likes) = update.likes {
            prefs.likes = likes;
        }
        if let Some(system) = update.system {
            prefs.system = system;
        }
        if let Some(tz) = update.tz_offset_minutes {
            prefs.tz_offset_minutes = tz;
        }
        if let Some(digest) = update.digest_opt_in {
            prefs.digest_opt_in = digest;
        }

        if let Some(window) = update.quiet_hours {
            prefs.quiet_hours = Some(window);
        }
        match update.quiet_hours_enabled {
            Some(true) if prefs.quiet_hours.is_none() => {
                prefs.quiet_hours = Some(self.default_quiet_hours()?);
            }
            Some(false) => prefs.quiet_hours = None,
            _ => {}
        }

        info!(user_id = %ctx.user_id, "Notification preferences updated");
        self.prefs.put(prefs).await
    }

    fn default_quiet_hours(&self) -> AppResult<QuietHours> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| {
                AppError::configuration(format!("Invalid quiet-hours default '{s}': {e}"))
            })
        };
        Ok(QuietHours::new(
            parse(&self.config.quiet_hours_start)?,
            parse(&self.config.quiet_hours_end)?,
        ))
    }
}
