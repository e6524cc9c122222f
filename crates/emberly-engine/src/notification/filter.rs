//! Preference filter and quiet-hours decision.

use chrono::{DateTime, Utc};

use emberly_entity::notification::{
    Channel, NotificationKind, NotificationPreferences, NotificationPriority,
};

/// What to do with one (notification, channel) pair right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryDecision {
    /// Deliver immediately.
    DeliverNow,
    /// Hold until the given instant (end of quiet hours).
    Defer(DateTime<Utc>),
    /// Do not deliver on this channel.
    Suppress,
}

/// Decide whether a notification may go out on a channel at `now`.
///
/// Pure: consults only the given preferences, so deferred deliveries can
/// re-evaluate with *current* preferences at fire time. The in-app list
/// never defers for quiet hours; only push and email do, and only at
/// normal priority.
pub fn decide(
    prefs: &NotificationPreferences,
    kind: NotificationKind,
    channel: Channel,
    priority: NotificationPriority,
    now: DateTime<Utc>,
) -> DeliveryDecision {
    if !prefs.allows(kind, channel) {
        return DeliveryDecision::Suppress;
    }

    if channel.respects_quiet_hours() && !priority.bypasses_quiet_hours() {
        if let Some(quiet) = &prefs.quiet_hours {
            if quiet.contains(prefs.local_time(now)) {
                return DeliveryDecision::Defer(quiet.end_instant(now, prefs.tz_offset_minutes));
            }
        }
    }

    DeliveryDecision::DeliverNow
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use emberly_core::types::UserId;
    use emberly_entity::notification::QuietHours;

    fn quiet_prefs() -> NotificationPreferences {
        let mut prefs = NotificationPreferences::default_for_user(UserId::new());
        prefs.quiet_hours = Some(QuietHours::new(
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ));
        prefs
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    #[test]
    fn test_disabled_pair_is_suppressed() {
        let mut prefs = quiet_prefs();
        prefs.likes.push = false;
        let d = decide(
            &prefs,
            NotificationKind::Like,
            Channel::Push,
            NotificationPriority::Normal,
            at("2024-03-01T12:00:00Z"),
        );
        assert_eq!(d, DeliveryDecision::Suppress);
    }

    #[test]
    fn test_normal_push_defers_during_quiet_hours() {
        let d = decide(
            &quiet_prefs(),
            NotificationKind::Message,
            Channel::Push,
            NotificationPriority::Normal,
            at("2024-03-01T23:00:00Z"),
        );
        assert_eq!(d, DeliveryDecision::Defer(at("2024-03-02T08:00:00Z")));
    }

    #[test]
    fn test_high_priority_bypasses_quiet_hours() {
        let d = decide(
            &quiet_prefs(),
            NotificationKind::Match,
            Channel::Push,
            NotificationPriority::High,
            at("2024-03-01T23:30:00Z"),
        );
        assert_eq!(d, DeliveryDecision::DeliverNow);
    }

    #[test]
    fn test_in_app_ignores_quiet_hours() {
        let d = decide(
            &quiet_prefs(),
            NotificationKind::Message,
            Channel::InApp,
            NotificationPriority::Normal,
            at("2024-03-01T23:00:00Z"),
        );
        assert_eq!(d, DeliveryDecision::DeliverNow);
    }

    #[test]
    fn test_outside_quiet_hours_delivers() {
        let d = decide(
            &quiet_prefs(),
            NotificationKind::Message,
            Channel::Push,
            NotificationPriority::Normal,
            at("2024-03-01T12:00:00Z"),
        );
        assert_eq!(d, DeliveryDecision::DeliverNow);
    }

    #[test]
    fn test_quiet_hours_follow_user_offset() {
        // 20:30 UTC is 23:30 at +180 minutes: inside the window.
        let mut prefs = quiet_prefs();
        prefs.tz_offset_minutes = 180;
        let d = decide(
            &prefs,
            NotificationKind::Message,
            Channel::Email,
            NotificationPriority::Normal,
            at("2024-03-01T20:30:00Z"),
        );
        assert!(matches!(d, DeliveryDecision::Defer(_)));
    }
}
