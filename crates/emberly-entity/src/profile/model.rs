//! User profile model, read-only to this engine.
//!
//! Profiles are owned by the external profile service; the engine only
//! consumes them for hard filtering and compatibility scoring.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::{GeoPoint, UserId};

/// Self-identified gender, as exposed by the directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Nonbinary,
}

/// A user profile as served by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Age in years.
    pub age: u8,
    /// Self-identified gender.
    pub gender: Gender,
    /// Last reported location.
    pub location: GeoPoint,
    /// Interest tags (set semantics, lowercase).
    pub interests: BTreeSet<String>,
    /// Last time the user was active in the app.
    pub last_active_at: DateTime<Utc>,
}

/// Discovery preferences, owned by the directory service alongside the
/// profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryPreferences {
    /// Youngest acceptable candidate age.
    pub age_min: u8,
    /// Oldest acceptable candidate age.
    pub age_max: u8,
    /// Preferred maximum distance in kilometres.
    pub max_distance_km: f64,
    /// Genders the user wants to see.
    pub interested_in: Vec<Gender>,
}

impl DiscoveryPreferences {
    /// Whether a candidate's gender passes the hard filter.
    pub fn accepts_gender(&self, gender: Gender) -> bool {
        self.interested_in.contains(&gender)
    }

    /// Whether an age lies inside the preferred range.
    pub fn age_in_range(&self, age: u8) -> bool {
        age >= self.age_min && age <= self.age_max
    }
}
