//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use emberly_core::config::AppConfig;
use emberly_engine::EventOutbox;
use emberly_engine::discovery::CandidateRanker;
use emberly_engine::notification::{NotificationService, Notifier};
use emberly_engine::swipe::SwipeService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Candidate ranking service.
    pub ranker: Arc<CandidateRanker>,
    /// Swipe ledger service.
    pub swipe_service: Arc<SwipeService>,
    /// Notification feed and preference service.
    pub notification_service: Arc<NotificationService>,
    /// Pipeline orchestrator, for the internal trigger endpoints.
    pub notifier: Arc<Notifier>,
    /// Outbox for ingested external events (message service).
    pub outbox: EventOutbox,
}
