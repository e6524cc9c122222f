//! User directory trait and backend selection.

pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use emberly_core::config::outbound::OutboundConfig;
use emberly_core::error::AppError;
use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::profile::{DiscoveryPreferences, Profile};

pub use http::HttpUserDirectory;
pub use memory::MemoryUserDirectory;

/// The profile/user service, consumed as an opaque collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Fetch a user's profile. `NotFound` when the user does not exist.
    async fn get_profile(&self, user: UserId) -> AppResult<Profile>;

    /// Fetch a user's discovery preferences.
    async fn get_preferences(&self, user: UserId) -> AppResult<DiscoveryPreferences>;

    /// Whether either user has blocked the other.
    async fn is_blocked(&self, a: UserId, b: UserId) -> AppResult<bool>;

    /// Whether the user holds a premium subscription.
    async fn is_premium(&self, user: UserId) -> AppResult<bool>;

    /// The candidate pool for discovery, excluding the user themselves.
    async fn candidates(&self, user: UserId, limit: usize) -> AppResult<Vec<Profile>>;
}

/// Build the configured directory backend.
pub fn build_directory(config: &OutboundConfig) -> Result<Arc<dyn UserDirectory>, AppError> {
    match config.directory_provider.as_str() {
        "http" => Ok(Arc::new(HttpUserDirectory::new(config)?)),
        "memory" => Ok(Arc::new(MemoryUserDirectory::new())),
        other => Err(AppError::configuration(format!(
            "Unknown directory provider: '{other}'. Expected 'http' or 'memory'"
        ))),
    }
}
