//! Route definitions for the Emberly HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(discovery_routes())
        .merge(swipe_routes())
        .merge(notification_routes())
        .merge(preference_routes())
        .merge(internal_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Candidate discovery.
fn discovery_routes() -> Router<AppState> {
    Router::new().route("/candidates", get(handlers::discovery::rank_candidates))
}

/// Swipe recording.
fn swipe_routes() -> Router<AppState> {
    Router::new().route("/swipes", post(handlers::swipe::record_swipe))
}

/// Notification feed and read state.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Notification preferences.
fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(handlers::preference::get_preferences))
        .route("/preferences", put(handlers::preference::update_preferences))
}

/// Internal ingestion and scheduler triggers.
fn internal_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/internal/events/message",
            post(handlers::events::ingest_message_event),
        )
        .route(
            "/internal/batch-delivery",
            post(handlers::admin::trigger_batch_delivery),
        )
        .route(
            "/internal/deferred-release",
            post(handlers::admin::trigger_deferred_release),
        )
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(parsed)
    }
}
