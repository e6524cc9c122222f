//! # emberly-engine
//!
//! The matching and notification core: compatibility scoring, candidate
//! ranking, the swipe ledger with exactly-once match detection, and the
//! notification pipeline (preference filter, quiet hours, batching,
//! channel dispatch with idempotent retry).
//!
//! Ingestion paths return promptly and hand dispatch work to the outbox;
//! the worker crate drains it. All pipeline entry points take an explicit
//! `now` so that scheduling behavior is testable without a clock.

pub mod context;
pub mod discovery;
pub mod notification;
pub mod outbox;
pub mod swipe;

pub use context::RequestContext;
pub use outbox::EventOutbox;
