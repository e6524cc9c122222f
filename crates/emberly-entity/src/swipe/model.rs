//! Swipe action entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::UserId;

use super::decision::SwipeDecision;

/// A single recorded swipe. Created once per (actor, target) pair and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeAction {
    /// The user who swiped.
    pub actor_id: UserId,
    /// The user being decided about.
    pub target_id: UserId,
    /// The recorded decision.
    pub decision: SwipeDecision,
    /// When the swipe was recorded.
    pub created_at: DateTime<Utc>,
}

impl SwipeAction {
    /// Create a new swipe action stamped with the given time.
    pub fn new(
        actor_id: UserId,
        target_id: UserId,
        decision: SwipeDecision,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id,
            target_id,
            decision,
            created_at,
        }
    }
}
