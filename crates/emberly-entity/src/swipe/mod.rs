//! Swipe ledger entities.

pub mod decision;
pub mod model;

pub use decision::SwipeDecision;
pub use model::SwipeAction;
