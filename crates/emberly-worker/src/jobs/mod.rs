//! Periodic tick jobs.

pub mod batch;
pub mod deferred;
pub mod retention;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use emberly_core::error::AppError;

pub use batch::BatchFlushJob;
pub use deferred::DeferredReleaseJob;
pub use retention::RetentionJob;

/// A scheduled tick the cron scheduler fires on a fixed cadence.
#[async_trait]
pub trait TickJob: Send + Sync + 'static {
    /// Stable job name for logging.
    fn name(&self) -> &'static str;

    /// Six-field cron expression (seconds first).
    fn schedule(&self) -> &'static str;

    /// Run one tick at the given instant.
    async fn run(&self, now: DateTime<Utc>) -> Result<(), AppError>;
}
