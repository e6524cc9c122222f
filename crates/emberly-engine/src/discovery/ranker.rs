//! Candidate ranking over the directory's candidate pool.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use emberly_core::config::matching::MatchingConfig;
use emberly_core::result::AppResult;
use emberly_core::types::{PageRequest, PageResponse, UserId};
use emberly_outbound::directory::UserDirectory;
use emberly_store::SwipeStore;

use crate::context::RequestContext;
use crate::discovery::scorer::compatibility_score;

/// One ranked discovery result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// The candidate user.
    pub candidate_id: UserId,
    /// Compatibility score in [0, 100].
    pub score: f64,
}

/// Ranks directory candidates for a requesting user.
#[derive(Clone)]
pub struct CandidateRanker {
    directory: Arc<dyn UserDirectory>,
    swipes: Arc<dyn SwipeStore>,
    config: MatchingConfig,
}

impl CandidateRanker {
    /// Creates a new ranker.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        swipes: Arc<dyn SwipeStore>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            directory,
            swipes,
            config,
        }
    }

    /// Rank candidates for the requesting user.
    ///
    /// Hard-filter failures (gender preference, blocked pair, already
    /// swiped) are excluded before scoring, not scored at zero. Ties
    /// break by most-recently-active candidate first; the ordering is
    /// fully deterministic for identical inputs.
    pub async fn rank_candidates(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RankedCandidate>> {
        let requester = self.directory.get_profile(ctx.user_id).await?;
        let prefs = self.directory.get_preferences(ctx.user_id).await?;
        let pool = self
            .directory
            .candidates(ctx.user_id, self.config.candidate_pool_limit)
            .await?;

        let mut scored = Vec::with_capacity(pool.len());
        for candidate in pool {
            if candidate.user_id == ctx.user_id {
                continue;
            }
            if !prefs.accepts_gender(candidate.gender) {
                continue;
            }
            if self
                .swipes
                .get(ctx.user_id, candidate.user_id)
                .await?
                .is_some()
            {
                continue;
            }
            if self
                .directory
                .is_blocked(ctx.user_id, candidate.user_id)
                .await?
            {
                continue;
            }

            let score = compatibility_score(&requester, &prefs, &candidate, &self.config);
            scored.push((candidate, score));
        }

        scored.sort_by(|(a, sa), (b, sb)| {
            sb.total_cmp(sa)
                .then_with(|| b.last_active_at.cmp(&a.last_active_at))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        debug!(
            user_id = %ctx.user_id,
            eligible = scored.len(),
            "Ranked discovery candidates"
        );

        let total = scored.len() as u64;
        let items: Vec<RankedCandidate> = scored
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|(candidate, score)| RankedCandidate {
                candidate_id: candidate.user_id,
                score,
            })
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
