//! Notification preference handlers.

use axum::Json;
use axum::extract::State;

use emberly_core::error::AppError;
use emberly_entity::notification::NotificationPreferences;
use emberly_engine::notification::service::PreferencesUpdate;

use crate::dto::response::ApiResponse;
use crate::extractors::ActingUser;
use crate::state::AppState;

/// GET /api/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    ActingUser(ctx): ActingUser,
) -> Result<Json<ApiResponse<NotificationPreferences>>, AppError> {
    let prefs = state.notification_service.get_preferences(&ctx).await?;
    Ok(Json(ApiResponse::ok(prefs)))
}

/// PUT /api/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    ActingUser(ctx): ActingUser,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<ApiResponse<NotificationPreferences>>, AppError> {
    let prefs = state
        .notification_service
        .update_preferences(&ctx, update)
        .await?;
    Ok(Json(ApiResponse::ok(prefs)))
}
