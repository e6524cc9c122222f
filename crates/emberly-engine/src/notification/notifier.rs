//! Pipeline orchestrator: event → notifications → filter → batch →
//! dispatch → store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use emberly_core::config::notifications::NotificationsConfig;
use emberly_core::events::DomainEvent;
use emberly_core::result::AppResult;
use emberly_core::types::UserId;
use emberly_entity::notification::{
    Channel, ChannelStatus, Notification, NotificationState,
};
use emberly_store::{NotificationStore, PreferenceStore};

use super::batcher::BatchAccumulator;
use super::deferral::{DeferralQueue, DeferredDelivery};
use super::dispatcher::ChannelDispatcher;
use super::filter::{self, DeliveryDecision};
use super::formatter;

/// Runs the notification pipeline for domain events and scheduler ticks.
///
/// Processing for one recipient is serialized through a per-user lock;
/// different recipients proceed in parallel. Preferences are consulted
/// at the moment of each delivery decision, never cached from creation
/// time.
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
    prefs: Arc<dyn PreferenceStore>,
    dispatcher: ChannelDispatcher,
    batcher: BatchAccumulator,
    deferrals: DeferralQueue,
    feed_locks: DashMap<UserId, Arc<Mutex<()>>>,
    config: NotificationsConfig,
}

impl Notifier {
    /// Create a notifier over the given stores and dispatcher.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        prefs: Arc<dyn PreferenceStore>,
        dispatcher: ChannelDispatcher,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            store,
            prefs,
            dispatcher,
            batcher: BatchAccumulator::new(config.batch_window_seconds),
            deferrals: DeferralQueue::new(),
            feed_locks: DashMap::new(),
            config,
        }
    }

    /// Handle one domain event at the given instant.
    ///
    /// A match fans out to both users; recipients are distinct, so their
    /// pipelines run concurrently under their own feed locks.
    pub async fn handle_event(&self, event: &DomainEvent, now: DateTime<Utc>) -> AppResult<()> {
        let pipelines = formatter::notifications_for(event)
            .into_iter()
            .map(|notification| self.process(notification, now));
        futures::future::try_join_all(pipelines).await?;
        Ok(())
    }

    /// Close every batch window that has ended, emitting one summary per
    /// group. Invoked by the scheduler tick and the internal trigger
    /// endpoint.
    pub async fn flush_batches(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let summaries = self.batcher.flush_due(now);
        let flushed = summaries.len();
        for summary in summaries {
            debug!(
                user_id = %summary.user_id,
                group_key = %summary.group_key,
                count = summary.count(),
                "Closing batch window"
            );
            // Summaries carry no group key, so they flow through the
            // pipeline without being re-batched.
            self.process(formatter::summary_notification(&summary, now), now)
                .await?;
        }
        Ok(flushed)
    }

    /// Release every deferred delivery whose quiet-hours window ended.
    ///
    /// Preferences are re-read here: a channel the user disabled while
    /// the delivery was waiting is suppressed, not fired. Expired
    /// deferrals are dropped as suppressed rather than delivered late.
    pub async fn release_deferred(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let due = self.deferrals.take_due(now);
        let released = due.len();

        for deferred in due {
            let user = deferred.notification.user_id;
            let id = deferred.notification.id;
            let channel = deferred.channel;
            let lock = self.user_lock(user);
            let _guard = lock.lock().await;

            if now >= deferred.expires_at {
                warn!(
                    notification_id = %id,
                    %channel,
                    "Deferred delivery expired before release"
                );
                self.store
                    .set_channel_status(user, id, channel, ChannelStatus::Suppressed)
                    .await?;
                continue;
            }

            let prefs = self.prefs.get(user).await?;
            let decision = filter::decide(
                &prefs,
                deferred.notification.kind,
                channel,
                deferred.notification.priority,
                now,
            );
            match decision {
                DeliveryDecision::Suppress => {
                    self.store
                        .set_channel_status(user, id, channel, ChannelStatus::Suppressed)
                        .await?;
                }
                DeliveryDecision::Defer(until) => {
                    // Quiet hours moved underneath the waiting delivery.
                    self.deferrals.schedule(DeferredDelivery {
                        release_at: until,
                        ..deferred
                    });
                }
                DeliveryDecision::DeliverNow => {
                    let status = self
                        .dispatcher
                        .dispatch_channel(&deferred.notification, channel)
                        .await?;
                    self.store
                        .set_channel_status(user, id, channel, status)
                        .await?;
                    match status {
                        ChannelStatus::Delivered => {
                            self.store.set_delivered_at(user, id, now).await?;
                            self.store
                                .transition(user, id, NotificationState::Delivered)
                                .await?;
                        }
                        ChannelStatus::Failed => {
                            if !self.deferrals.has_pending_for(id) {
                                self.store
                                    .transition(user, id, NotificationState::Failed)
                                    .await?;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(released)
    }

    /// Number of batches currently accumulating.
    pub fn open_batches(&self) -> usize {
        self.batcher.open_batches()
    }

    /// Number of deliveries waiting out quiet hours.
    pub fn pending_deferrals(&self) -> usize {
        self.deferrals.pending()
    }

    /// Run one notification through filter, batching, and dispatch.
    async fn process(&self, notification: Notification, now: DateTime<Utc>) -> AppResult<()> {
        let user = notification.user_id;
        let lock = self.user_lock(user);
        let _guard = lock.lock().await;

        let prefs = self.prefs.get(user).await?;
        let in_app = filter::decide(&prefs, notification.kind, Channel::InApp, notification.priority, now);
        let push = filter::decide(&prefs, notification.kind, Channel::Push, notification.priority, now);
        let email = filter::decide(&prefs, notification.kind, Channel::Email, notification.priority, now);

        if in_app == DeliveryDecision::Suppress
            && push == DeliveryDecision::Suppress
            && email == DeliveryDecision::Suppress
        {
            debug!(
                user_id = %user,
                kind = %notification.kind,
                "Notification suppressed on every channel"
            );
            return Ok(());
        }

        // The in-app record never waits: it is written with the row
        // itself, so the user sees during quiet hours what arrived.
        let mut notification = notification;
        let in_app_recorded = in_app == DeliveryDecision::DeliverNow;
        notification.channel_status.insert(
            Channel::InApp,
            if in_app_recorded {
                ChannelStatus::Delivered
            } else {
                ChannelStatus::Suppressed
            },
        );
        if in_app_recorded {
            notification.delivered_at = Some(now);
            notification.state = NotificationState::Delivered;
        }
        self.store.append(notification.clone()).await?;

        let batchable = notification.priority.can_batch()
            && notification.group_key.is_some()
            && prefs.digest_opt_in;
        if batchable {
            let group_size = self.batcher.accumulate(&notification, now);
            debug!(
                user_id = %user,
                group_key = notification.group_key.as_deref().unwrap_or(""),
                group_size,
                "Accumulated into batch; side channels withheld until window close"
            );
            return Ok(());
        }

        self.dispatch_side_channels(&notification, [(Channel::Push, push), (Channel::Email, email)], now)
            .await
    }

    /// Dispatch the push/email side of a notification per the decisions.
    async fn dispatch_side_channels(
        &self,
        notification: &Notification,
        decisions: [(Channel, DeliveryDecision); 2],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let user = notification.user_id;
        let mut any_delivered = notification.delivered_at.is_some();
        let mut any_deferred = false;
        let mut any_failed = false;

        for (channel, decision) in decisions {
            match decision {
                DeliveryDecision::Suppress => {
                    self.store
                        .set_channel_status(user, notification.id, channel, ChannelStatus::Suppressed)
                        .await?;
                }
                DeliveryDecision::Defer(release_at) => {
                    self.store
                        .set_channel_status(user, notification.id, channel, ChannelStatus::Deferred)
                        .await?;
                    self.deferrals.schedule(DeferredDelivery {
                        notification: notification.clone(),
                        channel,
                        release_at,
                        expires_at: now + Duration::hours(self.config.defer_expiry_hours as i64),
                    });
                    any_deferred = true;
                }
                DeliveryDecision::DeliverNow => {
                    let status = self.dispatcher.dispatch_channel(notification, channel).await?;
                    self.store
                        .set_channel_status(user, notification.id, channel, status)
                        .await?;
                    match status {
                        ChannelStatus::Delivered => {
                            self.store.set_delivered_at(user, notification.id, now).await?;
                            any_delivered = true;
                        }
                        ChannelStatus::Failed => any_failed = true,
                        _ => {}
                    }
                }
            }
        }

        // A push failure never blocks in-app visibility; the rollup only
        // reports Failed when nothing was delivered or deferred at all.
        let next = if any_delivered {
            NotificationState::Delivered
        } else if any_deferred {
            NotificationState::Deferred
        } else if any_failed {
            NotificationState::Failed
        } else {
            return Ok(());
        };
        self.store.transition(user, notification.id, next).await?;
        Ok(())
    }

    fn user_lock(&self, user: UserId) -> Arc<Mutex<()>> {
        self.feed_locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
