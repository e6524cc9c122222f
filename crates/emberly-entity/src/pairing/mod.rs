//! Mutual-match entities.

pub mod model;

pub use model::{Match, PairKey};
