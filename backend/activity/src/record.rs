use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::elapsed::format_elapsed;

/// How long after their last message a user still counts as active.
pub const RECENT_ACTIVITY_WINDOW_SECS: i64 = 600;

/// Tracked state for one user in one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    /// Start of the current join epoch.
    pub joined_at: DateTime<Utc>,
    /// Most recent channel message, `None` until the user speaks.
    pub last_message_at: Option<DateTime<Utc>>,
    /// Whether the "logged in ... ago" note was shown for this join epoch.
    pub announced_join: bool,
}

impl ActivityRecord {
    /// A record for a user whose join was just observed.
    pub fn joined(now: DateTime<Utc>) -> Self {
        Self { joined_at: now, last_message_at: None, announced_join: false }
    }

    /// A record for a user first seen talking. They were present before we
    /// started tracking, so there is nothing to announce.
    pub fn first_message(now: DateTime<Utc>) -> Self {
        Self { joined_at: now, last_message_at: Some(now), announced_join: true }
    }

    /// Start a new join epoch.
    pub fn rejoined(&mut self, now: DateTime<Utc>) {
        self.announced_join = false;
        self.joined_at = now;
    }

    pub fn record_message(&mut self, now: DateTime<Utc>) {
        self.last_message_at = Some(now);
    }

    /// True iff the user spoke at most [`RECENT_ACTIVITY_WINDOW_SECS`] ago.
    pub fn recently_active(&self, now: DateTime<Utc>) -> bool {
        match self.last_message_at {
            Some(last) => now - last <= Duration::seconds(RECENT_ACTIVITY_WINDOW_SECS),
            None => false,
        }
    }

    pub fn time_since_join(&self, now: DateTime<Utc>) -> String {
        format_elapsed(now - self.joined_at)
    }

    /// Latest moment this record saw any activity.
    pub fn last_seen(&self) -> DateTime<Utc> {
        match self.last_message_at {
            Some(last) if last > self.joined_at => last,
            _ => self.joined_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_boundary() {
        let mut record = ActivityRecord::joined(t0());
        record.record_message(t0());
        assert!(record.recently_active(t0() + Duration::seconds(600)));
        assert!(!record.recently_active(t0() + Duration::seconds(601)));
    }

    #[test]
    fn test_join_only_is_never_active() {
        let record = ActivityRecord::joined(t0());
        assert!(!record.recently_active(t0()));
        assert!(!record.recently_active(t0() + Duration::seconds(1)));
    }

    #[test]
    fn test_rejoin_resets_epoch() {
        let mut record = ActivityRecord::first_message(t0());
        assert!(record.announced_join);
        let later = t0() + Duration::hours(2);
        record.rejoined(later);
        assert!(!record.announced_join);
        assert_eq!(record.joined_at, later);
        assert_eq!(record.last_message_at, Some(t0()));
    }

    #[test]
    fn test_time_since_join() {
        let record = ActivityRecord::joined(t0());
        assert_eq!(record.time_since_join(t0() + Duration::seconds(45)), "45 seconds");
    }

    #[test]
    fn test_last_seen_prefers_latest() {
        let mut record = ActivityRecord::first_message(t0());
        assert_eq!(record.last_seen(), t0());
        record.rejoined(t0() + Duration::minutes(5));
        assert_eq!(record.last_seen(), t0() + Duration::minutes(5));
        record.record_message(t0() + Duration::minutes(9));
        assert_eq!(record.last_seen(), t0() + Duration::minutes(9));
    }
}
