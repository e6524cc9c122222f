//! Notification pipeline integration tests: quiet hours, batching,
//! channel dispatch, and read state.

mod common;

use chrono::NaiveTime;

use emberly_core::events::{DomainEvent, EventPayload, MatchEvent, MessageEvent, SwipeEvent};
use emberly_core::types::{MatchId, PageRequest, UserId};
use emberly_engine::RequestContext;
use emberly_engine::notification::service::PreferencesUpdate;
use emberly_entity::notification::preference::KindPreference;
use emberly_entity::notification::{
    Channel, ChannelStatus, NotificationKind, NotificationPreferences, NotificationPriority,
    NotificationState, QuietHours,
};
use emberly_entity::swipe::SwipeDecision;
use emberly_store::{NotificationStore, PreferenceStore};

use common::{at, engine};

fn quiet_22_to_8(user: UserId) -> NotificationPreferences {
    let mut prefs = NotificationPreferences::default_for_user(user);
    prefs.quiet_hours = Some(QuietHours::new(
        NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ));
    prefs
}

fn message_to(user: UserId) -> DomainEvent {
    DomainEvent::new(
        at("2024-03-01T23:00:00Z"),
        EventPayload::Message(MessageEvent::Sent {
            sender_id: UserId::new(),
            recipient_id: user,
            preview: "hey!".to_string(),
        }),
    )
}

fn like_for(user: UserId) -> DomainEvent {
    DomainEvent::new(
        at("2024-03-01T12:00:00Z"),
        EventPayload::Swipe(SwipeEvent::LikeReceived {
            actor_id: UserId::new(),
            target_id: user,
            super_like: false,
        }),
    )
}

#[tokio::test]
async fn test_quiet_hours_defer_push_but_record_in_app() {
    let eng = engine();
    let user = UserId::new();
    eng.prefs.put(quiet_22_to_8(user)).await.unwrap();

    let now = at("2024-03-01T23:00:00Z");
    eng.notifier
        .handle_event(&message_to(user), now)
        .await
        .unwrap();

    // In-app record is immediate; nothing was pushed or emailed.
    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].status_for(Channel::InApp), ChannelStatus::Delivered);
    assert_eq!(feed.items[0].status_for(Channel::Push), ChannelStatus::Deferred);
    assert_eq!(eng.push.sent_count(), 0);
    assert_eq!(eng.email.sent_count(), 0);
    assert_eq!(eng.notifier.pending_deferrals(), 2);

    // Still inside the window: nothing released.
    eng.notifier
        .release_deferred(at("2024-03-02T07:59:00Z"))
        .await
        .unwrap();
    assert_eq!(eng.push.sent_count(), 0);

    // Window over: delivered exactly once.
    eng.notifier
        .release_deferred(at("2024-03-02T08:00:00Z"))
        .await
        .unwrap();
    assert_eq!(eng.push.sent_count(), 1);
    assert_eq!(eng.email.sent_count(), 1);
    assert_eq!(eng.notifier.pending_deferrals(), 0);

    // A later tick does not deliver again.
    eng.notifier
        .release_deferred(at("2024-03-02T09:00:00Z"))
        .await
        .unwrap();
    assert_eq!(eng.push.sent_count(), 1);
}

#[tokio::test]
async fn test_high_priority_match_bypasses_quiet_hours() {
    let eng = engine();
    let a = UserId::new();
    let b = UserId::new();
    eng.prefs.put(quiet_22_to_8(a)).await.unwrap();
    eng.prefs.put(quiet_22_to_8(b)).await.unwrap();

    let now = at("2024-03-01T23:30:00Z");
    let event = DomainEvent::new(
        now,
        EventPayload::Match(MatchEvent::Formed {
            match_id: MatchId::new(),
            user_a: a.min(b),
            user_b: a.max(b),
            via_super_like: false,
        }),
    );
    eng.notifier.handle_event(&event, now).await.unwrap();

    // Pushed immediately to both despite quiet hours.
    assert_eq!(eng.push.sent_count(), 2);
    assert_eq!(eng.notifier.pending_deferrals(), 0);

    // A normal message at the same instant defers until 08:00.
    eng.notifier
        .handle_event(&message_to(a), now)
        .await
        .unwrap();
    assert_eq!(eng.push.sent_count(), 2);
    eng.notifier
        .release_deferred(at("2024-03-02T08:00:00Z"))
        .await
        .unwrap();
    assert_eq!(eng.push.sent_count(), 3);
}

#[tokio::test]
async fn test_like_burst_batches_into_single_summary() {
    let eng = engine();
    let user = UserId::new();

    let t0 = at("2024-03-01T12:00:00Z");
    for i in 0..3 {
        let event = like_for(user);
        eng.notifier
            .handle_event(&event, t0 + chrono::Duration::seconds(i * 60))
            .await
            .unwrap();
    }

    // Members recorded in-app, side channels withheld.
    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items.len(), 3);
    assert_eq!(eng.push.sent_count(), 0);
    assert_eq!(eng.notifier.open_batches(), 1);

    // Window closes five minutes after the first event.
    let flushed = eng
        .notifier
        .flush_batches(t0 + chrono::Duration::seconds(300))
        .await
        .unwrap();
    assert_eq!(flushed, 1);
    assert_eq!(eng.push.sent_count(), 1);

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items.len(), 4);
    let summary = feed
        .items
        .iter()
        .find(|n| n.group_key.is_none() && n.kind == NotificationKind::Like)
        .expect("summary notification");
    assert_eq!(summary.title, "3 people liked your profile");
    assert_eq!(summary.payload["count"], 3);
    assert_eq!(summary.payload["member_ids"].as_array().unwrap().len(), 3);

    // Flushing again emits nothing new.
    let again = eng
        .notifier
        .flush_batches(t0 + chrono::Duration::seconds(600))
        .await
        .unwrap();
    assert_eq!(again, 0);
    assert_eq!(eng.push.sent_count(), 1);
}

#[tokio::test]
async fn test_super_like_is_never_grouped() {
    let eng = engine();
    let user = UserId::new();

    let now = at("2024-03-01T12:00:00Z");
    let event = DomainEvent::new(
        now,
        EventPayload::Swipe(SwipeEvent::LikeReceived {
            actor_id: UserId::new(),
            target_id: user,
            super_like: true,
        }),
    );
    eng.notifier.handle_event(&event, now).await.unwrap();

    assert_eq!(eng.notifier.open_batches(), 0);
    assert_eq!(eng.push.sent_count(), 1);

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items[0].priority, NotificationPriority::High);
}

#[tokio::test]
async fn test_feed_orders_high_priority_ahead_of_batch_members() {
    let eng = engine();
    let user = UserId::new();
    let t0 = at("2024-03-01T12:00:00Z");

    eng.notifier.handle_event(&like_for(user), t0).await.unwrap();

    let super_like = DomainEvent::new(
        t0 + chrono::Duration::seconds(30),
        EventPayload::Swipe(SwipeEvent::LikeReceived {
            actor_id: UserId::new(),
            target_id: user,
            super_like: true,
        }),
    );
    eng.notifier
        .handle_event(&super_like, t0 + chrono::Duration::seconds(30))
        .await
        .unwrap();

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items[0].priority, NotificationPriority::High);
    assert_eq!(feed.items[1].priority, NotificationPriority::Normal);
}

#[tokio::test]
async fn test_digest_opt_out_disables_batching() {
    let eng = engine();
    let user = UserId::new();
    let mut prefs = NotificationPreferences::default_for_user(user);
    prefs.digest_opt_in = false;
    eng.prefs.put(prefs).await.unwrap();

    let now = at("2024-03-01T12:00:00Z");
    for _ in 0..3 {
        eng.notifier.handle_event(&like_for(user), now).await.unwrap();
    }

    assert_eq!(eng.notifier.open_batches(), 0);
    assert_eq!(eng.push.sent_count(), 3);
}

#[tokio::test]
async fn test_preferences_are_rechecked_at_release_time() {
    let eng = engine();
    let user = UserId::new();
    eng.prefs.put(quiet_22_to_8(user)).await.unwrap();

    let now = at("2024-03-01T23:00:00Z");
    eng.notifier
        .handle_event(&message_to(user), now)
        .await
        .unwrap();
    assert_eq!(eng.notifier.pending_deferrals(), 2);

    // The user turns off message push and email while the delivery waits.
    let mut updated = quiet_22_to_8(user);
    updated.messages = KindPreference {
        enabled: true,
        push: false,
        email: false,
        in_app: true,
    };
    eng.prefs.put(updated).await.unwrap();

    eng.notifier
        .release_deferred(at("2024-03-02T08:00:00Z"))
        .await
        .unwrap();

    // Fire-time preferences win: nothing is sent.
    assert_eq!(eng.push.sent_count(), 0);
    assert_eq!(eng.email.sent_count(), 0);

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items[0].status_for(Channel::Push), ChannelStatus::Suppressed);
}

#[tokio::test]
async fn test_expired_deferral_is_suppressed_not_delivered() {
    let eng = engine();
    let user = UserId::new();
    eng.prefs.put(quiet_22_to_8(user)).await.unwrap();

    let now = at("2024-03-01T23:00:00Z");
    eng.notifier
        .handle_event(&message_to(user), now)
        .await
        .unwrap();

    // Two days later, far past the 24h expiry.
    eng.notifier
        .release_deferred(at("2024-03-04T08:00:00Z"))
        .await
        .unwrap();

    assert_eq!(eng.push.sent_count(), 0);
    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert_eq!(feed.items[0].status_for(Channel::Push), ChannelStatus::Suppressed);
}

#[tokio::test]
async fn test_push_failure_never_blocks_in_app_or_email() {
    let eng = engine();
    let user = UserId::new();
    eng.push.fail_next_transient(10);

    let now = at("2024-03-01T12:00:00Z");
    let event = DomainEvent::new(
        now,
        EventPayload::Match(MatchEvent::Formed {
            match_id: MatchId::new(),
            user_a: user,
            user_b: UserId::new(),
            via_super_like: false,
        }),
    );
    eng.notifier.handle_event(&event, now).await.unwrap();

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    let n = &feed.items[0];
    assert_eq!(n.status_for(Channel::Push), ChannelStatus::Failed);
    assert_eq!(n.status_for(Channel::Email), ChannelStatus::Delivered);
    assert_eq!(n.status_for(Channel::InApp), ChannelStatus::Delivered);
    assert_eq!(n.state, NotificationState::Delivered);
    assert!(n.delivered_at.is_some());
}

#[tokio::test]
async fn test_disabled_kind_is_fully_suppressed() {
    let eng = engine();
    let user = UserId::new();
    let mut prefs = NotificationPreferences::default_for_user(user);
    prefs.likes.enabled = false;
    eng.prefs.put(prefs).await.unwrap();

    let now = at("2024-03-01T12:00:00Z");
    eng.notifier.handle_event(&like_for(user), now).await.unwrap();

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    assert!(feed.items.is_empty());
    assert_eq!(eng.push.sent_count(), 0);
}

#[tokio::test]
async fn test_mark_read_is_monotonic_and_badge_never_negative() {
    let eng = engine();
    let user = UserId::new();

    let now = at("2024-03-01T12:00:00Z");
    eng.notifier
        .handle_event(&message_to(user), now)
        .await
        .unwrap();

    let ctx = RequestContext::new(user);
    assert_eq!(eng.notification_service.unread_count(&ctx).await.unwrap(), 1);

    let feed = eng.store.list(user, &PageRequest::default()).await.unwrap();
    let id = feed.items[0].id;

    eng.notification_service.mark_read(&ctx, id).await.unwrap();
    let first_read_at = eng.store.get(user, id).await.unwrap().unwrap().read_at;
    assert!(first_read_at.is_some());

    // Reading again changes nothing.
    eng.notification_service.mark_read(&ctx, id).await.unwrap();
    assert_eq!(
        eng.store.get(user, id).await.unwrap().unwrap().read_at,
        first_read_at
    );
    assert_eq!(eng.notification_service.unread_count(&ctx).await.unwrap(), 0);

    // Deleting a read notification keeps the badge at zero.
    eng.notification_service
        .delete_notification(&ctx, id)
        .await
        .unwrap();
    assert_eq!(eng.notification_service.unread_count(&ctx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_preferences_applies_default_quiet_window() {
    let eng = engine();
    let user = UserId::new();
    let ctx = RequestContext::new(user);

    let prefs = eng
        .notification_service
        .update_preferences(
            &ctx,
            PreferencesUpdate {
                quiet_hours_enabled: Some(true),
                tz_offset_minutes: Some(60),
                ..PreferencesUpdate::default()
            },
        )
        .await
        .unwrap();

    let window = prefs.quiet_hours.expect("default window applied");
    assert_eq!(window.start, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    assert_eq!(window.end, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(prefs.tz_offset_minutes, 60);

    let disabled = eng
        .notification_service
        .update_preferences(
            &ctx,
            PreferencesUpdate {
                quiet_hours_enabled: Some(false),
                ..PreferencesUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(disabled.quiet_hours.is_none());
}

#[tokio::test]
async fn test_end_to_end_swipe_to_notification() {
    let mut eng = engine();
    let a = UserId::new();
    let b = UserId::new();
    eng.seed_user(a);
    eng.seed_user(b);

    let now = at("2024-03-01T12:00:00Z");
    eng.swipe_service
        .record_swipe(&RequestContext::at(a, now), b, SwipeDecision::Like)
        .await
        .unwrap();
    eng.swipe_service
        .record_swipe(&RequestContext::at(b, now), a, SwipeDecision::Like)
        .await
        .unwrap();
    eng.pump(now).await;

    // b got the one-sided like first, then both got the match.
    let feed_a = eng.store.list(a, &PageRequest::default()).await.unwrap();
    assert!(feed_a.items.iter().any(|n| n.kind == NotificationKind::Match));
    let feed_b = eng.store.list(b, &PageRequest::default()).await.unwrap();
    assert!(feed_b.items.iter().any(|n| n.kind == NotificationKind::Match));
    assert!(feed_b.items.iter().any(|n| n.kind == NotificationKind::Like));

    // Match pushes went out for both users.
    let match_pushes = eng
        .push
        .sent()
        .iter()
        .filter(|n| n.kind == NotificationKind::Match)
        .count();
    assert_eq!(match_pushes, 2);
}
