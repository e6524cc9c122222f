//! Internal scheduler-invoked triggers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use emberly_core::error::AppError;

use crate::dto::response::{ApiResponse, CountResponse};
use crate::state::AppState;

/// POST /api/internal/batch-delivery
///
/// Closes every batch window that has ended. Normally driven by the
/// scheduler tick; exposed for manual and scheduler-invoked runs.
pub async fn trigger_batch_delivery(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let flushed = state.notifier.flush_batches(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(CountResponse {
        count: flushed as u64,
    })))
}

/// POST /api/internal/deferred-release
///
/// Releases quiet-hours deferrals whose window has ended.
pub async fn trigger_deferred_release(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let released = state.notifier.release_deferred(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(CountResponse {
        count: released as u64,
    })))
}
