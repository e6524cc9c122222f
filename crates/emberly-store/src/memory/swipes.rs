//! In-memory swipe ledger.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::swipe::SwipeAction;

use crate::traits::swipes::{SwipeInsert, SwipeStore};

/// In-memory swipe ledger keyed by (actor, target), with per-day quota
/// counters.
#[derive(Debug, Default)]
pub struct MemorySwipeStore {
    /// Recorded swipes.
    swipes: DashMap<(UserId, UserId), SwipeAction>,
    /// Consumed positive-swipe quota per actor and local day.
    quota: DashMap<(UserId, NaiveDate), u32>,
}

impl MemorySwipeStore {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SwipeStore for MemorySwipeStore {
    async fn insert_if_absent(&self, swipe: SwipeAction) -> AppResult<SwipeInsert> {
        match self.swipes.entry((swipe.actor_id, swipe.target_id)) {
            Entry::Occupied(existing) => Ok(SwipeInsert::Existing(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(swipe);
                Ok(SwipeInsert::Inserted)
            }
        }
    }

    async fn get(&self, actor: UserId, target: UserId) -> AppResult<Option<SwipeAction>> {
        Ok(self.swipes.get(&(actor, target)).map(|s| s.clone()))
    }

    async fn try_reserve_quota(
        &self,
        actor: UserId,
        day: NaiveDate,
        limit: u32,
    ) -> AppResult<bool> {
        let mut used = self.quota.entry((actor, day)).or_insert(0);
        if *used >= limit {
            return Ok(false);
        }
        *used += 1;
        Ok(true)
    }

    async fn release_quota(&self, actor: UserId, day: NaiveDate) -> AppResult<()> {
        if let Some(mut used) = self.quota.get_mut(&(actor, day)) {
            *used = used.saturating_sub(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use emberly_entity::swipe::SwipeDecision;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let store = MemorySwipeStore::new();
        let actor = UserId::new();
        let target = UserId::new();
        let swipe = SwipeAction::new(actor, target, SwipeDecision::Like, Utc::now());

        let first = store.insert_if_absent(swipe.clone()).await.unwrap();
        assert!(matches!(first, SwipeInsert::Inserted));

        let second = store.insert_if_absent(swipe).await.unwrap();
        match second {
            SwipeInsert::Existing(prior) => assert_eq!(prior.decision, SwipeDecision::Like),
            SwipeInsert::Inserted => panic!("duplicate insert must not succeed"),
        }
    }

    #[tokio::test]
    async fn test_quota_reserve_and_release() {
        let store = MemorySwipeStore::new();
        let actor = UserId::new();

        assert!(store.try_reserve_quota(actor, day(), 2).await.unwrap());
        assert!(store.try_reserve_quota(actor, day(), 2).await.unwrap());
        assert!(!store.try_reserve_quota(actor, day(), 2).await.unwrap());

        store.release_quota(actor, day()).await.unwrap();
        assert!(store.try_reserve_quota(actor, day(), 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_quota_is_per_day() {
        let store = MemorySwipeStore::new();
        let actor = UserId::new();
        let tomorrow = day().succ_opt().unwrap();

        assert!(store.try_reserve_quota(actor, day(), 1).await.unwrap());
        assert!(!store.try_reserve_quota(actor, day(), 1).await.unwrap());
        assert!(store.try_reserve_quota(actor, tomorrow, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_quota_never_oversubscribes() {
        use std::sync::Arc;

        let store = Arc::new(MemorySwipeStore::new());
        let actor = UserId::new();
        let limit = 10u32;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.try_reserve_quota(actor, day(), limit).await.unwrap()
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, limit);
    }
}
