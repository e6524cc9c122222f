//! Swipe ledger service and match detection.

pub mod service;

pub use service::{SwipeOutcome, SwipeService, SwipeStatus};
