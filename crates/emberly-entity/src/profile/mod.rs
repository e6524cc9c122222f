//! Profile entities mirrored from the directory service.

pub mod model;

pub use model::{DiscoveryPreferences, Gender, Profile};
