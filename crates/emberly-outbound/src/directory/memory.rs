//! In-memory user directory for tests and local runs.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use emberly_core::error::AppError;
use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::profile::{DiscoveryPreferences, Profile};

use super::UserDirectory;

/// Seedable in-memory directory.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    profiles: DashMap<UserId, Profile>,
    preferences: DashMap<UserId, DiscoveryPreferences>,
    premium: DashSet<UserId>,
    blocks: DashSet<(UserId, UserId)>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with a profile and discovery preferences.
    pub fn insert_user(&self, profile: Profile, prefs: DiscoveryPreferences) {
        self.preferences.insert(profile.user_id, prefs);
        self.profiles.insert(profile.user_id, profile);
    }

    /// Mark a user premium.
    pub fn set_premium(&self, user: UserId, premium: bool) {
        if premium {
            self.premium.insert(user);
        } else {
            self.premium.remove(&user);
        }
    }

    /// Record that `blocker` blocked `blocked`.
    pub fn block(&self, blocker: UserId, blocked: UserId) {
        self.blocks.insert((blocker, blocked));
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_profile(&self, user: UserId) -> AppResult<Profile> {
        self.profiles
            .get(&user)
            .map(|p| p.clone())
            .ok_or_else(|| AppError::not_found(format!("No profile for user {user}")))
    }

    async fn get_preferences(&self, user: UserId) -> AppResult<DiscoveryPreferences> {
        self.preferences
            .get(&user)
            .map(|p| p.clone())
            .ok_or_else(|| AppError::not_found(format!("No preferences for user {user}")))
    }

    async fn is_blocked(&self, a: UserId, b: UserId) -> AppResult<bool> {
        Ok(self.blocks.contains(&(a, b)) || self.blocks.contains(&(b, a)))
    }

    async fn is_premium(&self, user: UserId) -> AppResult<bool> {
        Ok(self.premium.contains(&user))
    }

    async fn candidates(&self, user: UserId, limit: usize) -> AppResult<Vec<Profile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|entry| *entry.key() != user)
            .map(|entry| entry.value().clone())
            .take(limit)
            .collect())
    }
}
