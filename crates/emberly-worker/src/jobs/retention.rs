//! Notification retention tick.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use emberly_core::config::notifications::NotificationsConfig;
use emberly_core::error::AppError;
use emberly_store::NotificationStore;

use super::TickJob;

/// Purges old notifications and trims oversized feeds.
pub struct RetentionJob {
    store: Arc<dyn NotificationStore>,
    config: NotificationsConfig,
}

impl RetentionJob {
    /// Create the job.
    pub fn new(store: Arc<dyn NotificationStore>, config: NotificationsConfig) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl TickJob for RetentionJob {
    fn name(&self) -> &'static str {
        "notification_retention"
    }

    fn schedule(&self) -> &'static str {
        // Daily at 3 AM.
        "0 0 3 * * *"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        let cutoff = now - Duration::days(i64::from(self.config.cleanup_after_days));
        let purged = self.store.purge_older_than(cutoff).await?;
        let trimmed = self
            .store
            .trim_per_user(self.config.max_stored_per_user)
            .await?;
        if purged > 0 || trimmed > 0 {
            info!(purged, trimmed, "Notification retention pass complete");
        }
        Ok(())
    }
}
