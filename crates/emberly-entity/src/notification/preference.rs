//! Per-user notification delivery preferences and the quiet-hours window.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use emberly_core::types::UserId;

use super::channel::Channel;
use super::kind::NotificationKind;

/// A user-local quiet-hours window. May wrap midnight (e.g. 22:00–08:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// Window start, user-local wall clock.
    pub start: NaiveTime,
    /// Window end, user-local wall clock.
    pub end: NaiveTime,
}

impl QuietHours {
    /// Create a window from start and end wall-clock times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether a local wall-clock time falls inside the window.
    pub fn contains(&self, local: NaiveTime) -> bool {
        if self.start <= self.end {
            local >= self.start && local < self.end
        } else {
            // Wraps midnight: inside if after start or before end.
            local >= self.start || local < self.end
        }
    }

    /// The UTC instant at which the window ends, given the current UTC
    /// time and the user's offset. Only meaningful while `contains` holds
    /// for the corresponding local time.
    pub fn end_instant(&self, now: DateTime<Utc>, tz_offset_minutes: i32) -> DateTime<Utc> {
        let offset_secs = i64::from(tz_offset_minutes) * 60;
        let local = now + chrono::Duration::seconds(offset_secs);
        let today_end = local.date_naive().and_time(self.end);
        let end_local = if local.time() < self.end {
            today_end
        } else {
            today_end + chrono::Duration::days(1)
        };
        DateTime::<Utc>::from_naive_utc_and_offset(
            end_local - chrono::Duration::seconds(offset_secs),
            Utc,
        )
    }
}

/// Per-kind delivery toggles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KindPreference {
    /// Master toggle for this kind.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Deliver via push.
    #[serde(default = "default_true")]
    pub push: bool,
    /// Deliver via email.
    #[serde(default = "default_true")]
    pub email: bool,
    /// Record in the in-app list.
    #[serde(default = "default_true")]
    pub in_app: bool,
}

impl Default for KindPreference {
    fn default() -> Self {
        Self {
            enabled: true,
            push: true,
            email: true,
            in_app: true,
        }
    }
}

impl KindPreference {
    /// Whether the given channel is enabled for this kind.
    pub fn allows(&self, channel: Channel) -> bool {
        if !self.enabled {
            return false;
        }
        match channel {
            Channel::Push => self.push,
            Channel::Email => self.email,
            Channel::InApp => self.in_app,
        }
    }
}

/// Per-user notification delivery preferences, owned by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// The user these preferences belong to.
    pub user_id: UserId,
    /// Match notifications.
    #[serde(default)]
    pub matches: KindPreference,
    /// Message notifications.
    #[serde(default)]
    pub messages: KindPreference,
    /// Like notifications.
    #[serde(default)]
    pub likes: KindPreference,
    /// System notifications.
    #[serde(default)]
    pub system: KindPreference,
    /// Quiet-hours window; `None` disables quiet hours.
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
    /// Offset of the user's local time from UTC, in minutes.
    #[serde(default)]
    pub tz_offset_minutes: i32,
    /// Whether bursts of like-events are digested into summaries.
    #[serde(default = "default_true")]
    pub digest_opt_in: bool,
    /// When preferences were last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationPreferences {
    /// Create default preferences for a user: everything enabled, no
    /// quiet hours, digesting on.
    pub fn default_for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            matches: KindPreference::default(),
            messages: KindPreference::default(),
            likes: KindPreference::default(),
            system: KindPreference::default(),
            quiet_hours: None,
            tz_offset_minutes: 0,
            digest_opt_in: true,
            updated_at: None,
        }
    }

    /// The toggle block for a notification kind.
    pub fn for_kind(&self, kind: NotificationKind) -> &KindPreference {
        match kind {
            NotificationKind::Match => &self.matches,
            NotificationKind::Message => &self.messages,
            NotificationKind::Like => &self.likes,
            NotificationKind::System => &self.system,
        }
    }

    /// Whether the (kind, channel) pair is enabled.
    pub fn allows(&self, kind: NotificationKind, channel: Channel) -> bool {
        self.for_kind(kind).allows(channel)
    }

    /// The user's local wall-clock time for a UTC instant.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        now.with_timezone(&offset).time()
    }

    /// The user's local calendar date for a UTC instant. Drives the daily
    /// quota reset at local midnight.
    pub fn local_date(now: DateTime<Utc>, tz_offset_minutes: i32) -> chrono::NaiveDate {
        let offset = FixedOffset::east_opt(tz_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        now.with_timezone(&offset).date_naive()
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    #[test]
    fn test_quiet_hours_same_day_window() {
        let q = QuietHours::new(t(13, 0), t(15, 0));
        assert!(!q.contains(t(12, 59)));
        assert!(q.contains(t(13, 0)));
        assert!(q.contains(t(14, 30)));
        assert!(!q.contains(t(15, 0)));
    }

    #[test]
    fn test_quiet_hours_wraps_midnight() {
        let q = QuietHours::new(t(22, 0), t(8, 0));
        assert!(q.contains(t(23, 0)));
        assert!(q.contains(t(2, 30)));
        assert!(q.contains(t(7, 59)));
        assert!(!q.contains(t(8, 0)));
        assert!(!q.contains(t(12, 0)));
        assert!(q.contains(t(22, 0)));
        assert!(!q.contains(t(21, 59)));
    }

    #[test]
    fn test_end_instant_evening_side() {
        let q = QuietHours::new(t(22, 0), t(8, 0));
        // 23:00 UTC, offset 0 — window ends 08:00 the next day.
        let now = "2024-03-01T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = q.end_instant(now, 0);
        assert_eq!(end, "2024-03-02T08:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_end_instant_morning_side() {
        let q = QuietHours::new(t(22, 0), t(8, 0));
        // 06:00 local — window ends 08:00 the same day.
        let now = "2024-03-02T06:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = q.end_instant(now, 0);
        assert_eq!(end, "2024-03-02T08:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_end_instant_respects_offset() {
        let q = QuietHours::new(t(22, 0), t(8, 0));
        // 21:00 UTC at +120 minutes is 23:00 local; ends 08:00 local,
        // which is 06:00 UTC the next day.
        let now = "2024-03-01T21:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = q.end_instant(now, 120);
        assert_eq!(end, "2024-03-02T06:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_allows_matrix() {
        let mut prefs = NotificationPreferences::default_for_user(UserId::new());
        prefs.likes.push = false;
        assert!(!prefs.allows(NotificationKind::Like, Channel::Push));
        assert!(prefs.allows(NotificationKind::Like, Channel::InApp));
        prefs.likes.enabled = false;
        assert!(!prefs.allows(NotificationKind::Like, Channel::InApp));
    }

    #[test]
    fn test_local_date_shifts_with_offset() {
        let now = "2024-03-01T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let here = NotificationPreferences::local_date(now, 0);
        let ahead = NotificationPreferences::local_date(now, 60);
        assert_eq!(here.to_string(), "2024-03-01");
        assert_eq!(ahead.to_string(), "2024-03-02");
    }
}
