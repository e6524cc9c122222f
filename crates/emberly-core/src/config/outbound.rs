//! Outbound service configuration: user directory, push, and email.

use serde::{Deserialize, Serialize};

/// Settings for services the engine consumes over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundConfig {
    /// Directory backend: `"http"` or `"memory"` (tests, local runs).
    #[serde(default = "default_directory_provider")]
    pub directory_provider: String,
    /// Base URL of the profile/user directory service.
    #[serde(default = "default_directory_url")]
    pub directory_url: String,
    /// Push provider settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Email provider settings.
    #[serde(default)]
    pub email: EmailConfig,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            directory_provider: default_directory_provider(),
            directory_url: default_directory_url(),
            push: PushConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

/// Push provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider endpoint receiving the opaque JSON payload.
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_push_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Email provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Whether email delivery is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider endpoint receiving the rendered message.
    #[serde(default = "default_email_endpoint")]
    pub endpoint: String,
    /// From address for rendered messages.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_email_endpoint(),
            from_address: default_from(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_directory_provider() -> String {
    "http".to_string()
}

fn default_directory_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_push_endpoint() -> String {
    "http://localhost:8082/push".to_string()
}

fn default_email_endpoint() -> String {
    "http://localhost:8083/send".to_string()
}

fn default_from() -> String {
    "no-reply@emberly.app".to_string()
}

fn default_timeout() -> u64 {
    10
}
