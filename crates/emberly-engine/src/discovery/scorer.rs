//! Compatibility scorer.
//!
//! Pure and deterministic: the same (profile, candidate, preferences)
//! always yields the same score, so rankings are reproducible. Hard
//! filters (gender, blocked, already swiped) are applied by the ranker
//! before scoring; this function assumes the candidate is eligible.

use emberly_core::config::matching::MatchingConfig;
use emberly_entity::profile::{DiscoveryPreferences, Profile};

/// Weight of the shared-interest overlap sub-score.
const INTEREST_WEIGHT: f64 = 0.40;
/// Weight of the age-range fit sub-score.
const AGE_WEIGHT: f64 = 0.30;
/// Weight of the distance fit sub-score.
const DISTANCE_WEIGHT: f64 = 0.30;

/// Score a candidate for a requester, in [0, 100].
pub fn compatibility_score(
    requester: &Profile,
    prefs: &DiscoveryPreferences,
    candidate: &Profile,
    policy: &MatchingConfig,
) -> f64 {
    let interests = interest_overlap(requester, candidate);
    let age = age_fit(prefs, candidate.age, policy.age_tolerance_years);
    let distance = distance_fit(
        requester,
        candidate,
        prefs.max_distance_km,
        policy.distance_decay_factor,
    );

    let score =
        100.0 * (INTEREST_WEIGHT * interests + AGE_WEIGHT * age + DISTANCE_WEIGHT * distance);
    score.clamp(0.0, 100.0)
}

/// Jaccard overlap of the two interest sets. Two empty sets share no
/// signal, so they score zero rather than one.
fn interest_overlap(requester: &Profile, candidate: &Profile) -> f64 {
    let intersection = requester
        .interests
        .intersection(&candidate.interests)
        .count();
    let union = requester.interests.union(&candidate.interests).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// 1.0 inside the preferred range, decaying linearly to 0 over
/// `tolerance_years` outside it.
fn age_fit(prefs: &DiscoveryPreferences, age: u8, tolerance_years: f64) -> f64 {
    if prefs.age_in_range(age) {
        return 1.0;
    }
    if tolerance_years <= 0.0 {
        return 0.0;
    }
    let distance = if age < prefs.age_min {
        f64::from(prefs.age_min - age)
    } else {
        f64::from(age - prefs.age_max)
    };
    (1.0 - distance / tolerance_years).max(0.0)
}

/// 1.0 within the preferred max distance, decaying linearly to 0 at
/// `decay_factor` times that distance.
fn distance_fit(
    requester: &Profile,
    candidate: &Profile,
    max_distance_km: f64,
    decay_factor: f64,
) -> f64 {
    let distance = requester.location.distance_km(&candidate.location);
    if distance <= max_distance_km {
        return 1.0;
    }
    let cutoff = max_distance_km * decay_factor.max(1.0);
    if distance >= cutoff || cutoff <= max_distance_km {
        return 0.0;
    }
    1.0 - (distance - max_distance_km) / (cutoff - max_distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use emberly_core::types::{GeoPoint, UserId};
    use emberly_entity::profile::Gender;

    fn profile(age: u8, location: GeoPoint, interests: &[&str]) -> Profile {
        Profile {
            user_id: UserId::new(),
            display_name: "p".to_string(),
            age,
            gender: Gender::Female,
            location,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            last_active_at: Utc::now(),
        }
    }

    fn prefs() -> DiscoveryPreferences {
        DiscoveryPreferences {
            age_min: 25,
            age_max: 35,
            max_distance_km: 50.0,
            interested_in: vec![Gender::Female],
        }
    }

    fn policy() -> MatchingConfig {
        MatchingConfig::default()
    }

    #[test]
    fn test_perfect_candidate_scores_100() {
        let home = GeoPoint::new(52.52, 13.405);
        let me = profile(30, home, &["hiking", "jazz"]);
        let them = profile(30, home, &["hiking", "jazz"]);
        let score = compatibility_score(&me, &prefs(), &them, &policy());
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_deterministic() {
        let me = profile(30, GeoPoint::new(52.52, 13.405), &["hiking", "jazz"]);
        let them = profile(28, GeoPoint::new(52.6, 13.5), &["jazz", "wine"]);
        let p = prefs();
        let c = policy();
        let a = compatibility_score(&me, &p, &them, &c);
        let b = compatibility_score(&me, &p, &them, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_stays_in_range() {
        let me = profile(30, GeoPoint::new(0.0, 0.0), &[]);
        let far = profile(90, GeoPoint::new(-45.0, 170.0), &["x"]);
        let score = compatibility_score(&me, &prefs(), &far, &policy());
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_age_decays_outside_range() {
        let p = prefs();
        assert_eq!(age_fit(&p, 30, 5.0), 1.0);
        assert!((age_fit(&p, 37, 5.0) - 0.6).abs() < 1e-9);
        assert_eq!(age_fit(&p, 45, 5.0), 0.0);
        assert!((age_fit(&p, 23, 5.0) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_distance_decays_to_zero_at_twice_max() {
        let home = GeoPoint::new(52.52, 13.405);
        // Hamburg is ~255 km from Berlin; with a 200 km preference and
        // 2x decay the fit lands strictly between 0 and 1.
        let hamburg = GeoPoint::new(53.5511, 9.9937);
        let me = profile(30, home, &[]);
        let near = profile(30, home, &[]);
        let mid = profile(30, hamburg, &[]);

        assert_eq!(distance_fit(&me, &near, 200.0, 2.0), 1.0);
        let partial = distance_fit(&me, &mid, 200.0, 2.0);
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(distance_fit(&me, &mid, 100.0, 2.0), 0.0);
    }

    #[test]
    fn test_empty_interest_sets_score_zero_overlap() {
        let home = GeoPoint::new(52.52, 13.405);
        let me = profile(30, home, &[]);
        let them = profile(30, home, &[]);
        // Only age (0.3) and distance (0.3) contribute.
        let score = compatibility_score(&me, &prefs(), &them, &policy());
        assert!((score - 60.0).abs() < 1e-9);
    }
}
