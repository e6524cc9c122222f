//! Discovery handlers.

use axum::Json;
use axum::extract::{Query, State};

use emberly_core::error::AppError;
use emberly_core::types::PageResponse;
use emberly_engine::discovery::RankedCandidate;

use crate::dto::response::ApiResponse;
use crate::extractors::{ActingUser, PaginationParams};
use crate::state::AppState;

/// GET /api/candidates
pub async fn rank_candidates(
    State(state): State<AppState>,
    ActingUser(ctx): ActingUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<RankedCandidate>>>, AppError> {
    let ranked = state
        .ranker
        .rank_candidates(&ctx, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(ranked)))
}
