//! Swipe ledger storage trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::swipe::SwipeAction;

/// Result of a conditional swipe insert.
#[derive(Debug, Clone)]
pub enum SwipeInsert {
    /// The swipe was stored; no prior action existed for the pair.
    Inserted,
    /// A swipe by this actor about this target already exists; the
    /// stored action is returned unchanged.
    Existing(SwipeAction),
}

/// Storage for the append-only swipe ledger and the daily quota counter.
#[async_trait]
pub trait SwipeStore: Send + Sync + 'static {
    /// Insert the swipe unless one already exists for
    /// (actor, target). Atomic: concurrent duplicates see exactly one
    /// `Inserted`.
    async fn insert_if_absent(&self, swipe: SwipeAction) -> AppResult<SwipeInsert>;

    /// Fetch the swipe recorded by `actor` about `target`, if any.
    async fn get(&self, actor: UserId, target: UserId) -> AppResult<Option<SwipeAction>>;

    /// Atomically reserve one unit of the actor's positive-swipe quota
    /// for the given local calendar day. Returns `false` when the limit
    /// is already reached; nothing is consumed in that case.
    async fn try_reserve_quota(
        &self,
        actor: UserId,
        day: NaiveDate,
        limit: u32,
    ) -> AppResult<bool>;

    /// Return one previously reserved quota unit (used when the swipe
    /// insert turns out to be a duplicate).
    async fn release_quota(&self, actor: UserId, day: NaiveDate) -> AppResult<()>;
}
