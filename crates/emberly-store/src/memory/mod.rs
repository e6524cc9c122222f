//! In-memory store implementations backed by dashmap.
//!
//! Per-key entry locking gives each store its atomicity: conditional
//! inserts go through the entry API, and all feed mutations for one user
//! contend on that user's entry while other users proceed in parallel.

pub mod delivery;
pub mod matches;
pub mod notifications;
pub mod preferences;
pub mod swipes;

pub use delivery::MemoryDeliveryLedger;
pub use matches::MemoryMatchStore;
pub use notifications::MemoryNotificationStore;
pub use preferences::MemoryPreferenceStore;
pub use swipes::MemorySwipeStore;
