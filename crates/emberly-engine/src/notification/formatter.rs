//! Turns domain events into notification rows.

use chrono::{DateTime, Utc};

use emberly_core::events::{DomainEvent, EventPayload, MatchEvent, MessageEvent, SwipeEvent};
use emberly_entity::notification::{Notification, NotificationKind, NotificationPriority};

use super::batcher::BatchSummary;

/// Group key for plain like bursts.
pub const GROUP_PROFILE_LIKES: &str = "profile_likes";

/// Build the notifications a domain event fans out to.
///
/// A formed match notifies both users at high priority; a super-like is
/// high priority and never grouped; a plain like and a message are
/// normal priority with a group key so bursts can be digested.
pub fn notifications_for(event: &DomainEvent) -> Vec<Notification> {
    let at = event.occurred_at;
    match &event.payload {
        EventPayload::Match(MatchEvent::Formed {
            match_id,
            user_a,
            user_b,
            via_super_like,
        }) => {
            let payload = |other| {
                serde_json::json!({
                    "match_id": match_id,
                    "matched_user_id": other,
                    "via_super_like": via_super_like,
                })
            };
            vec![
                Notification::new(
                    *user_a,
                    NotificationKind::Match,
                    "It's a match!",
                    "You like each other. Say hello!",
                    payload(user_b),
                    NotificationPriority::High,
                    None,
                    at,
                ),
                Notification::new(
                    *user_b,
                    NotificationKind::Match,
                    "It's a match!",
                    "You like each other. Say hello!",
                    payload(user_a),
                    NotificationPriority::High,
                    None,
                    at,
                ),
            ]
        }
        EventPayload::Swipe(SwipeEvent::LikeReceived {
            actor_id,
            target_id,
            super_like,
        }) => {
            let (title, priority, group_key) = if *super_like {
                ("Someone super-liked you!", NotificationPriority::High, None)
            } else {
                (
                    "Someone likes you",
                    NotificationPriority::Normal,
                    Some(GROUP_PROFILE_LIKES.to_string()),
                )
            };
            vec![Notification::new(
                *target_id,
                NotificationKind::Like,
                title,
                "Open the app to see who",
                serde_json::json!({ "actor_id": actor_id, "super_like": super_like }),
                priority,
                group_key,
                at,
            )]
        }
        EventPayload::Message(MessageEvent::Sent {
            sender_id,
            recipient_id,
            preview,
        }) => vec![Notification::new(
            *recipient_id,
            NotificationKind::Message,
            "New message",
            preview.clone(),
            serde_json::json!({ "sender_id": sender_id }),
            NotificationPriority::Normal,
            // Messages are delivered per conversation turn, never digested.
            None,
            at,
        )],
    }
}

/// Build the single summary notification for a closed batch.
///
/// The summary references its members, which stay individually
/// inspectable in the store.
pub fn summary_notification(summary: &BatchSummary, now: DateTime<Utc>) -> Notification {
    let title = match summary.kind {
        NotificationKind::Like => {
            if summary.count() == 1 {
                "Someone likes you".to_string()
            } else {
                format!("{} people liked your profile", summary.count())
            }
        }
        NotificationKind::Message => {
            if summary.count() == 1 {
                "New message".to_string()
            } else {
                format!("{} new messages", summary.count())
            }
        }
        _ => format!("{} new notifications", summary.count()),
    };

    Notification::new(
        summary.user_id,
        summary.kind,
        title,
        "Open the app to catch up",
        serde_json::json!({
            "group_key": summary.group_key,
            "count": summary.count(),
            "member_ids": summary.member_ids,
        }),
        NotificationPriority::Normal,
        // Summaries are never re-grouped.
        None,
        now,
    )
}
