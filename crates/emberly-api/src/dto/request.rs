//! Request DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use emberly_entity::swipe::SwipeDecision;

/// Body of `POST /api/swipes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSwipeRequest {
    /// The user being decided about.
    pub target_id: Uuid,
    /// The decision.
    pub decision: SwipeDecision,
}

/// Body of `POST /api/internal/events/message`, ingested from the
/// message service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageEventRequest {
    /// The sending user.
    pub sender_id: Uuid,
    /// The receiving user.
    pub recipient_id: Uuid,
    /// Short preview of the message body.
    #[validate(length(min = 1, max = 280))]
    pub preview: String,
}
