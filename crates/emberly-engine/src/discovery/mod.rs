//! Discovery: compatibility scoring and candidate ranking.

pub mod ranker;
pub mod scorer;

pub use ranker::{CandidateRanker, RankedCandidate};
pub use scorer::compatibility_score;
