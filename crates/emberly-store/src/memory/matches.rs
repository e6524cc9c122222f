//! In-memory match store with the conditional pair insert.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::pairing::{Match, PairKey};

use crate::traits::matches::{MatchInsert, MatchStore};

/// In-memory match store keyed by the canonical pair.
///
/// The dashmap entry API makes the check-then-insert a single atomic
/// step per key, which is the compare-and-swap the swipe service's
/// exactly-once contract needs.
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    matches: DashMap<PairKey, Match>,
}

impl MemoryMatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn insert_if_absent(&self, candidate: Match) -> AppResult<MatchInsert> {
        match self.matches.entry(candidate.pair()) {
            Entry::Occupied(existing) => Ok(MatchInsert::Existing(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(candidate.clone());
                Ok(MatchInsert::Created(candidate))
            }
        }
    }

    async fn get(&self, pair: PairKey) -> AppResult<Option<Match>> {
        Ok(self.matches.get(&pair).map(|m| m.clone()))
    }

    async fn find_for_user(&self, user: UserId) -> AppResult<Vec<Match>> {
        let mut found: Vec<Match> = self
            .matches
            .iter()
            .filter(|entry| entry.key().contains(user))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_second_insert_sees_existing() {
        let store = MemoryMatchStore::new();
        let pair = PairKey::new(UserId::new(), UserId::new());

        let first = store
            .insert_if_absent(Match::new(pair, false, Utc::now()))
            .await
            .unwrap();
        assert!(first.is_created());
        let winner_id = first.into_match().id;

        let second = store
            .insert_if_absent(Match::new(pair, true, Utc::now()))
            .await
            .unwrap();
        assert!(!second.is_created());
        assert_eq!(second.into_match().id, winner_id);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_create_exactly_one() {
        let store = Arc::new(MemoryMatchStore::new());
        let pair = PairKey::new(UserId::new(), UserId::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert_if_absent(Match::new(pair, false, Utc::now()))
                    .await
                    .unwrap()
            }));
        }

        let mut created = 0;
        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let outcome = handle.await.unwrap();
            if outcome.is_created() {
                created += 1;
            }
            ids.insert(outcome.into_match().id);
        }
        assert_eq!(created, 1, "exactly one insert may win");
        assert_eq!(ids.len(), 1, "every caller must observe the same row");
    }

    #[tokio::test]
    async fn test_find_for_user_most_recent_first() {
        let store = MemoryMatchStore::new();
        let me = UserId::new();
        let t0 = Utc::now();

        for i in 0..3 {
            let pair = PairKey::new(me, UserId::new());
            let mut m = Match::new(pair, false, t0 + chrono::Duration::seconds(i));
            m.created_at = t0 + chrono::Duration::seconds(i);
            store.insert_if_absent(m).await.unwrap();
        }

        let found = store.find_for_user(me).await.unwrap();
        assert_eq!(found.len(), 3);
        assert!(found[0].created_at >= found[1].created_at);
        assert!(found[1].created_at >= found[2].created_at);
    }
}
