//! Notification preference storage trait.

use async_trait::async_trait;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::notification::NotificationPreferences;

/// Storage for per-user notification preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Fetch a user's preferences, falling back to the defaults when the
    /// user never saved any.
    async fn get(&self, user: UserId) -> AppResult<NotificationPreferences>;

    /// Upsert a user's preferences.
    async fn put(&self, prefs: NotificationPreferences) -> AppResult<NotificationPreferences>;
}
