//! # emberly-api
//!
//! HTTP surface for the matching and notification engine. Routes live
//! under `/api`; the upstream gateway authenticates requests and
//! forwards the acting user in the `X-User-Id` header.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
