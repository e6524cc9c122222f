//! Notification pipeline configuration.

use serde::{Deserialize, Serialize};

/// Notification batching, retry, deferral, and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Rolling batch window in seconds, measured from the first ungrouped
    /// event of a group.
    #[serde(default = "default_batch_window")]
    pub batch_window_seconds: u64,
    /// Maximum delivery attempts per (notification, channel).
    #[serde(default = "default_max_attempts")]
    pub max_delivery_attempts: u32,
    /// Base backoff in milliseconds between retries; doubles per attempt.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
    /// Default quiet-hours start, `HH:MM`, applied when a user enables
    /// quiet hours without choosing a window.
    #[serde(default = "default_quiet_start")]
    pub quiet_hours_start: String,
    /// Default quiet-hours end, `HH:MM`.
    #[serde(default = "default_quiet_end")]
    pub quiet_hours_end: String,
    /// Hours after which a deferred delivery expires instead of firing.
    #[serde(default = "default_defer_expiry")]
    pub defer_expiry_hours: u64,
    /// Days after which stored notifications are purged.
    #[serde(default = "default_cleanup_days")]
    pub cleanup_after_days: u32,
    /// Maximum stored notifications per user.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            batch_window_seconds: default_batch_window(),
            max_delivery_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            quiet_hours_start: default_quiet_start(),
            quiet_hours_end: default_quiet_end(),
            defer_expiry_hours: default_defer_expiry(),
            cleanup_after_days: default_cleanup_days(),
            max_stored_per_user: default_max_stored(),
        }
    }
}

fn default_batch_window() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    200
}

fn default_quiet_start() -> String {
    "22:00".to_string()
}

fn default_quiet_end() -> String {
    "08:00".to_string()
}

fn default_defer_expiry() -> u64 {
    24
}

fn default_cleanup_days() -> u32 {
    30
}

fn default_max_stored() -> usize {
    1000
}
