//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Dispatch worker and scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent dispatch tasks.
    #[serde(default = "default_concurrency")]
    pub dispatch_concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dispatch_concurrency: default_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}
