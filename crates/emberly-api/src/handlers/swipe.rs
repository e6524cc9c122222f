//! Swipe handlers.

use axum::Json;
use axum::extract::State;

use emberly_core::error::AppError;
use emberly_core::types::UserId;
use emberly_engine::swipe::SwipeOutcome;

use crate::dto::request::RecordSwipeRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::ActingUser;
use crate::state::AppState;

/// POST /api/swipes
pub async fn record_swipe(
    State(state): State<AppState>,
    ActingUser(ctx): ActingUser,
    Json(req): Json<RecordSwipeRequest>,
) -> Result<Json<ApiResponse<SwipeOutcome>>, AppError> {
    let outcome = state
        .swipe_service
        .record_swipe(&ctx, UserId::from(req.target_id), req.decision)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
