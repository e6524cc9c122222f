//! # emberly-store
//!
//! Storage interfaces for the matching engine and their in-memory
//! implementations. The traits model the capability set the engine
//! needs — get, put, and conditional insert — so that the persistence
//! technology stays swappable behind them. The conditional inserts are
//! what the exactly-once match and idempotent swipe contracts rest on;
//! any real backend must provide an equivalent unique constraint.

pub mod memory;
pub mod traits;

pub use traits::delivery::DeliveryLedger;
pub use traits::matches::{MatchInsert, MatchStore};
pub use traits::notifications::NotificationStore;
pub use traits::preferences::PreferenceStore;
pub use traits::swipes::{SwipeInsert, SwipeStore};
