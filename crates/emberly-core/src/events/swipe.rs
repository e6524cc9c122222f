//! Swipe-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Events emitted by the swipe ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SwipeEvent {
    /// Someone recorded a positive decision about a user.
    LikeReceived {
        /// The user who swiped.
        actor_id: UserId,
        /// The user who was liked.
        target_id: UserId,
        /// Whether the decision was a super-like.
        super_like: bool,
    },
}
