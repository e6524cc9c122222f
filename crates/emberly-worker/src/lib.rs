//! # emberly-worker
//!
//! Background processing for the matching engine: the dispatch worker
//! that drains the event outbox, and the cron scheduler driving the
//! periodic ticks (batch-window closure, deferred release, retention).

pub mod dispatch;
pub mod jobs;
pub mod scheduler;

pub use dispatch::DispatchWorker;
pub use scheduler::CronScheduler;
