//! # emberly-core
//!
//! Core crate for the Emberly matching and notification engine. Contains
//! configuration schemas, typed identifiers, domain events, geographic
//! helpers, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Emberly crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
