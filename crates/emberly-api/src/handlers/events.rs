//! Internal event ingestion from upstream services.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use validator::Validate;

use emberly_core::error::AppError;
use emberly_core::events::{DomainEvent, EventPayload, MessageEvent};
use emberly_core::types::UserId;

use crate::dto::request::MessageEventRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/internal/events/message
///
/// The message service reports a sent message; the pipeline turns it
/// into a notification for the recipient.
pub async fn ingest_message_event(
    State(state): State<AppState>,
    Json(req): Json<MessageEventRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid message event: {e}")))?;

    state.outbox.publish(DomainEvent::new(
        Utc::now(),
        EventPayload::Message(MessageEvent::Sent {
            sender_id: UserId::from(req.sender_id),
            recipient_id: UserId::from(req.recipient_id),
            preview: req.preview,
        }),
    ));

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Event accepted".to_string(),
    })))
}
