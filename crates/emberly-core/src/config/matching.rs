//! Discovery and swipe policy configuration.
//!
//! The quota and scoring-decay values are policy parameters, not
//! constants; product can tune them per deployment.

use serde::{Deserialize, Serialize};

/// Matching and discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Daily outgoing like/super-like quota for non-premium users.
    #[serde(default = "default_daily_like_quota")]
    pub daily_like_quota: u32,
    /// Years outside the preferred age range over which the age sub-score
    /// decays linearly to zero.
    #[serde(default = "default_age_tolerance_years")]
    pub age_tolerance_years: f64,
    /// Multiple of the preferred max distance at which the distance
    /// sub-score reaches zero.
    #[serde(default = "default_distance_decay_factor")]
    pub distance_decay_factor: f64,
    /// Maximum number of directory candidates scanned per ranking request.
    #[serde(default = "default_candidate_pool_limit")]
    pub candidate_pool_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            daily_like_quota: default_daily_like_quota(),
            age_tolerance_years: default_age_tolerance_years(),
            distance_decay_factor: default_distance_decay_factor(),
            candidate_pool_limit: default_candidate_pool_limit(),
        }
    }
}

fn default_daily_like_quota() -> u32 {
    50
}

fn default_age_tolerance_years() -> f64 {
    5.0
}

fn default_distance_decay_factor() -> f64 {
    2.0
}

fn default_candidate_pool_limit() -> usize {
    500
}
