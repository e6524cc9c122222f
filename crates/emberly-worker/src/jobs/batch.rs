//! Batch-window closure tick.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use emberly_core::error::AppError;
use emberly_engine::notification::Notifier;

use super::TickJob;

/// Closes batch windows whose rolling window has ended and emits the
/// summary notifications.
pub struct BatchFlushJob {
    notifier: Arc<Notifier>,
}

impl BatchFlushJob {
    /// Create the job.
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl TickJob for BatchFlushJob {
    fn name(&self) -> &'static str {
        "batch_flush"
    }

    fn schedule(&self) -> &'static str {
        // Every 15 seconds; the window itself is measured per group.
        "*/15 * * * * *"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        let flushed = self.notifier.flush_batches(now).await?;
        if flushed > 0 {
            debug!(flushed, "Batch windows closed");
        }
        Ok(())
    }
}
