//! Delivery attempt audit entities.

pub mod attempt;

pub use attempt::{DeliveryAttempt, DeliveryOutcome};
