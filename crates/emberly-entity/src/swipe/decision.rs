//! Swipe decision enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A recorded decision by one user about another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDecision {
    /// Positive decision.
    Like,
    /// Negative decision.
    Pass,
    /// Emphatic positive decision; notifies the target at high priority.
    SuperLike,
}

impl SwipeDecision {
    /// Whether this decision can form a mutual match.
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }

    /// Whether this decision counts against the daily quota.
    pub fn counts_against_quota(&self) -> bool {
        self.is_positive()
    }

    /// Return the decision as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::SuperLike => "super_like",
        }
    }
}

impl fmt::Display for SwipeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwipeDecision {
    type Err = emberly_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "pass" => Ok(Self::Pass),
            "super_like" => Ok(Self::SuperLike),
            _ => Err(emberly_core::AppError::validation(format!(
                "Invalid swipe decision: '{s}'. Expected one of: like, pass, super_like"
            ))),
        }
    }
}
