//! Match storage trait with the uniqueness guarantee on the canonical pair.

use async_trait::async_trait;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::pairing::{Match, PairKey};

/// Result of the conditional match insert.
#[derive(Debug, Clone)]
pub enum MatchInsert {
    /// This caller created the match.
    Created(Match),
    /// Another caller won the race; the existing match is returned.
    Existing(Match),
}

impl MatchInsert {
    /// The match row, whoever created it.
    pub fn into_match(self) -> Match {
        match self {
            Self::Created(m) | Self::Existing(m) => m,
        }
    }

    /// Whether this caller created the row.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Storage for mutual matches.
///
/// `insert_if_absent` must behave like a unique-constrained insert on the
/// canonical pair: for any interleaving of concurrent callers, exactly one
/// observes `Created` and every other observes `Existing` with the same
/// row. This is the engine's central correctness property.
#[async_trait]
pub trait MatchStore: Send + Sync + 'static {
    /// Conditionally insert a match for its canonical pair.
    async fn insert_if_absent(&self, candidate: Match) -> AppResult<MatchInsert>;

    /// Fetch the match for a pair, if formed.
    async fn get(&self, pair: PairKey) -> AppResult<Option<Match>>;

    /// All matches involving a user, most recent first.
    async fn find_for_user(&self, user: UserId) -> AppResult<Vec<Match>>;
}
