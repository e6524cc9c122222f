//! Match entity and the canonical unordered pair key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::{MatchId, UserId};

/// Canonicalized unordered user pair, ordered so that `a < b`.
///
/// Both (x, y) and (y, x) map to the same key, which is what the match
/// store's uniqueness guarantee is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    /// The lower user id.
    pub a: UserId,
    /// The higher user id.
    pub b: UserId,
}

impl PairKey {
    /// Build the canonical key for two users, in either order.
    pub fn new(x: UserId, y: UserId) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    /// Whether the given user is part of this pair.
    pub fn contains(&self, user: UserId) -> bool {
        self.a == user || self.b == user
    }

    /// The other member of the pair.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.a {
            Some(self.b)
        } else if user == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A mutual match between two users.
///
/// At most one exists per unordered pair, enforced by the match store's
/// conditional insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// The lower user id of the pair.
    pub user_a: UserId,
    /// The higher user id of the pair.
    pub user_b: UserId,
    /// Whether either triggering swipe was a super-like.
    pub via_super_like: bool,
    /// When the match formed.
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Create a new match for a canonical pair.
    pub fn new(pair: PairKey, via_super_like: bool, created_at: DateTime<Utc>) -> Self {
        Self {
            id: MatchId::new(),
            user_a: pair.a,
            user_b: pair.b,
            via_super_like,
            created_at,
        }
    }

    /// The canonical pair key for this match.
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.user_a, self.user_b)
    }
}
