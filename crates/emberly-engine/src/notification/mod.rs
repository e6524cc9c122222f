//! The notification pipeline.
//!
//! Flow per recipient: format → preference filter → quiet-hours decision
//! → batching → channel dispatch → store. The notifier orchestrates and
//! serializes per-recipient processing.

pub mod batcher;
pub mod deferral;
pub mod dispatcher;
pub mod filter;
pub mod formatter;
pub mod notifier;
pub mod service;

pub use batcher::BatchAccumulator;
pub use deferral::DeferralQueue;
pub use dispatcher::ChannelDispatcher;
pub use filter::DeliveryDecision;
pub use notifier::Notifier;
pub use service::NotificationService;
