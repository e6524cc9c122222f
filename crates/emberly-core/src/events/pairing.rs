//! Mutual-match domain events.

use serde::{Deserialize, Serialize};

use crate::types::{MatchId, UserId};

/// Events emitted by match detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// Both sides of a pair recorded a positive decision.
    ///
    /// Emitted exactly once per unordered user pair.
    Formed {
        /// The match row created for the pair.
        match_id: MatchId,
        /// The lower user id of the canonical pair.
        user_a: UserId,
        /// The higher user id of the canonical pair.
        user_b: UserId,
        /// Whether either triggering swipe was a super-like.
        via_super_like: bool,
    },
}
