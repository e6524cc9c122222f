//! HTTP client for the profile/user directory service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use emberly_core::config::outbound::OutboundConfig;
use emberly_core::error::AppError;
use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::profile::{DiscoveryPreferences, Profile};

use super::UserDirectory;

const REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize)]
struct FlagResponse {
    value: bool,
}

/// Directory client talking to the profile service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    /// Build a client from configuration.
    pub fn new(config: &OutboundConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build directory client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.directory_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Directory request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Directory has no '{path}'")));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Directory returned {} for '{path}'",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::external_service(format!("Directory response invalid: {e}")))
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_profile(&self, user: UserId) -> AppResult<Profile> {
        self.get_json(&format!("/users/{user}/profile")).await
    }

    async fn get_preferences(&self, user: UserId) -> AppResult<DiscoveryPreferences> {
        self.get_json(&format!("/users/{user}/preferences")).await
    }

    async fn is_blocked(&self, a: UserId, b: UserId) -> AppResult<bool> {
        let flag: FlagResponse = self.get_json(&format!("/users/{a}/blocked/{b}")).await?;
        Ok(flag.value)
    }

    async fn is_premium(&self, user: UserId) -> AppResult<bool> {
        let flag: FlagResponse = self.get_json(&format!("/users/{user}/premium")).await?;
        Ok(flag.value)
    }

    async fn candidates(&self, user: UserId, limit: usize) -> AppResult<Vec<Profile>> {
        self.get_json(&format!("/users/{user}/candidates?limit={limit}"))
            .await
    }
}
