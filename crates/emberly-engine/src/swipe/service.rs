//! Swipe recording with quota enforcement and exactly-once match creation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use emberly_core::config::matching::MatchingConfig;
use emberly_core::error::{AppError, ErrorKind};
use emberly_core::events::{DomainEvent, EventPayload, MatchEvent, SwipeEvent};
use emberly_core::result::AppResult;
use emberly_core::types::{MatchId, UserId};
use emberly_entity::notification::NotificationPreferences;
use emberly_entity::pairing::{Match, PairKey};
use emberly_entity::swipe::{SwipeAction, SwipeDecision};
use emberly_outbound::directory::UserDirectory;
use emberly_store::{MatchStore, PreferenceStore, SwipeInsert, SwipeStore};

use crate::context::RequestContext;
use crate::outbox::EventOutbox;

/// Caller-visible result classification of a recorded swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeStatus {
    /// A positive decision was stored; no reciprocal like yet.
    Liked,
    /// A negative decision was stored.
    Passed,
    /// The swipe completed a mutual match.
    Matched,
}

/// Result of `record_swipe`.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeOutcome {
    /// What happened.
    pub status: SwipeStatus,
    /// The match row, when `status` is `Matched`.
    pub match_id: Option<MatchId>,
}

/// Records swipes, enforces the daily quota, and detects mutual matches.
#[derive(Clone)]
pub struct SwipeService {
    swipes: Arc<dyn SwipeStore>,
    matches: Arc<dyn MatchStore>,
    prefs: Arc<dyn PreferenceStore>,
    directory: Arc<dyn UserDirectory>,
    outbox: EventOutbox,
    config: MatchingConfig,
}

impl SwipeService {
    /// Creates a new swipe service.
    pub fn new(
        swipes: Arc<dyn SwipeStore>,
        matches: Arc<dyn MatchStore>,
        prefs: Arc<dyn PreferenceStore>,
        directory: Arc<dyn UserDirectory>,
        outbox: EventOutbox,
        config: MatchingConfig,
    ) -> Self {
        Self {
            swipes,
            matches,
            prefs,
            directory,
            outbox,
            config,
        }
    }

    /// Record a swipe by the acting user about `target`.
    ///
    /// Identical re-submissions are idempotent and return the prior
    /// outcome. Only invalid input (`InvalidTarget`) and the daily quota
    /// (`QuotaExceeded`) surface as errors; the concurrent mutual-like
    /// race is absorbed by re-reading the winning match row.
    pub async fn record_swipe(
        &self,
        ctx: &RequestContext,
        target: UserId,
        decision: SwipeDecision,
    ) -> AppResult<SwipeOutcome> {
        let actor = ctx.user_id;
        let now = ctx.request_time;

        if actor == target {
            return Err(AppError::invalid_target("Cannot swipe on yourself"));
        }

        // Unknown targets surface as InvalidTarget, not NotFound.
        if let Err(e) = self.directory.get_profile(target).await {
            return Err(if e.kind == ErrorKind::NotFound {
                AppError::invalid_target(format!("Unknown swipe target {target}"))
            } else {
                e
            });
        }

        if self.directory.is_blocked(actor, target).await? {
            return Err(AppError::invalid_target("Target is not available"));
        }

        // Retried submissions return the prior result rather than erroring.
        if let Some(prior) = self.swipes.get(actor, target).await? {
            return self.replay_outcome(actor, target, prior.decision, decision).await;
        }

        // Quota is reserved before the insert and returned if the insert
        // loses a duplicate race, so concurrent retries never double-count.
        let quota_day = {
            let prefs = self.prefs.get(actor).await?;
            NotificationPreferences::local_date(now, prefs.tz_offset_minutes)
        };
        let mut quota_reserved = false;
        if decision.counts_against_quota() && !self.directory.is_premium(actor).await? {
            if !self
                .swipes
                .try_reserve_quota(actor, quota_day, self.config.daily_like_quota)
                .await?
            {
                return Err(AppError::quota_exceeded(format!(
                    "Daily like limit of {} reached; resets at local midnight",
                    self.config.daily_like_quota
                )));
            }
            quota_reserved = true;
        }

        let swipe = SwipeAction::new(actor, target, decision, now);
        match self.swipes.insert_if_absent(swipe).await? {
            SwipeInsert::Inserted => {}
            SwipeInsert::Existing(prior) => {
                if quota_reserved {
                    self.swipes.release_quota(actor, quota_day).await?;
                }
                return self.replay_outcome(actor, target, prior.decision, decision).await;
            }
        }

        debug!(%actor, %target, %decision, "Swipe recorded");

        if !decision.is_positive() {
            return Ok(SwipeOutcome {
                status: SwipeStatus::Passed,
                match_id: None,
            });
        }

        // A reciprocal positive swipe completes the pair. A later `pass`
        // from the counterpart never revokes this like.
        let reciprocal = self.swipes.get(target, actor).await?;
        let reciprocal_positive = reciprocal
            .as_ref()
            .map(|r| r.decision.is_positive())
            .unwrap_or(false);

        if !reciprocal_positive {
            self.outbox.publish(DomainEvent::new(
                now,
                EventPayload::Swipe(SwipeEvent::LikeReceived {
                    actor_id: actor,
                    target_id: target,
                    super_like: decision == SwipeDecision::SuperLike,
                }),
            ));
            return Ok(SwipeOutcome {
                status: SwipeStatus::Liked,
                match_id: None,
            });
        }

        let via_super_like = decision == SwipeDecision::SuperLike
            || reciprocal
                .map(|r| r.decision == SwipeDecision::SuperLike)
                .unwrap_or(false);
        let pair = PairKey::new(actor, target);
        let candidate = Match::new(pair, via_super_like, now);

        // The conditional insert is the atomic step: under a concurrent
        // reciprocal swipe exactly one side creates the row and emits the
        // event; the other re-reads the winner's row.
        let insert = self.matches.insert_if_absent(candidate).await?;
        if insert.is_created() {
            let created = insert.into_match();
            info!(match_id = %created.id, user_a = %created.user_a, user_b = %created.user_b, "Match formed");
            self.outbox.publish(DomainEvent::new(
                now,
                EventPayload::Match(MatchEvent::Formed {
                    match_id: created.id,
                    user_a: created.user_a,
                    user_b: created.user_b,
                    via_super_like: created.via_super_like,
                }),
            ));
            return Ok(SwipeOutcome {
                status: SwipeStatus::Matched,
                match_id: Some(created.id),
            });
        }

        let existing = insert.into_match();
        debug!(match_id = %existing.id, "Lost match-creation race; reusing winner's row");
        Ok(SwipeOutcome {
            status: SwipeStatus::Matched,
            match_id: Some(existing.id),
        })
    }

    /// Rebuild the outcome of an already-recorded swipe.
    ///
    /// A duplicate with the same decision is a client retry; a different
    /// decision is an attempt to flip an immutable row.
    async fn replay_outcome(
        &self,
        actor: UserId,
        target: UserId,
        recorded: SwipeDecision,
        submitted: SwipeDecision,
    ) -> AppResult<SwipeOutcome> {
        if recorded != submitted {
            return Err(AppError::invalid_target(format!(
                "A '{recorded}' decision is already recorded for this pair and cannot be changed"
            )));
        }

        if !recorded.is_positive() {
            return Ok(SwipeOutcome {
                status: SwipeStatus::Passed,
                match_id: None,
            });
        }

        match self.matches.get(PairKey::new(actor, target)).await? {
            Some(existing) => Ok(SwipeOutcome {
                status: SwipeStatus::Matched,
                match_id: Some(existing.id),
            }),
            None => Ok(SwipeOutcome {
                status: SwipeStatus::Liked,
                match_id: None,
            }),
        }
    }
}
