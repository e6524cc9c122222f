//! Deferred-delivery release tick.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use emberly_core::error::AppError;
use emberly_engine::notification::Notifier;

use super::TickJob;

/// Releases quiet-hours-deferred deliveries whose window has ended,
/// re-checking preferences at fire time.
pub struct DeferredReleaseJob {
    notifier: Arc<Notifier>,
}

impl DeferredReleaseJob {
    /// Create the job.
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl TickJob for DeferredReleaseJob {
    fn name(&self) -> &'static str {
        "deferred_release"
    }

    fn schedule(&self) -> &'static str {
        "*/30 * * * * *"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        let released = self.notifier.release_deferred(now).await?;
        if released > 0 {
            debug!(released, "Deferred deliveries released");
        }
        Ok(())
    }
}
