//! # emberly-entity
//!
//! Domain entity models for the Emberly matching and notification engine.
//! Every struct in this crate represents a stored row or a domain value
//! object. All entities derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod delivery;
pub mod notification;
pub mod pairing;
pub mod profile;
pub mod swipe;
