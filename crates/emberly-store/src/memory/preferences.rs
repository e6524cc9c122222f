//! In-memory preference store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::notification::NotificationPreferences;

use crate::traits::preferences::PreferenceStore;

/// In-memory notification preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    prefs: DashMap<UserId, NotificationPreferences>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, user: UserId) -> AppResult<NotificationPreferences> {
        Ok(self
            .prefs
            .get(&user)
            .map(|p| p.clone())
            .unwrap_or_else(|| NotificationPreferences::default_for_user(user)))
    }

    async fn put(&self, mut prefs: NotificationPreferences) -> AppResult<NotificationPreferences> {
        prefs.updated_at = Some(Utc::now());
        self.prefs.insert(prefs.user_id, prefs.clone());
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_defaults_for_unknown_user() {
        let store = MemoryPreferenceStore::new();
        let user = UserId::new();
        let prefs = store.get(user).await.unwrap();
        assert_eq!(prefs.user_id, user);
        assert!(prefs.quiet_hours.is_none());
        assert!(prefs.digest_opt_in);
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = MemoryPreferenceStore::new();
        let user = UserId::new();
        let mut prefs = NotificationPreferences::default_for_user(user);
        prefs.likes.push = false;
        store.put(prefs).await.unwrap();

        let stored = store.get(user).await.unwrap();
        assert!(!stored.likes.push);
        assert!(stored.updated_at.is_some());
    }
}
