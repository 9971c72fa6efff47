//! Eviction policies for the activity store.
//!
//! Records are never dropped by the decision rules; a host schedules
//! [`ActivityStore::sweep`](crate::ActivityStore::sweep) with one of these
//! policies to keep memory bounded.

use chrono::{DateTime, Duration, Utc};

use crate::record::ActivityRecord;

/// Longest idle horizon a config may ask for: ten years.
pub const MAX_HORIZON_SECS: i64 = 10 * 365 * 86_400;

/// Longest gap between maintenance sweeps: thirty days.
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 30 * 86_400;

/// Decides which records a maintenance sweep removes.
pub trait EvictionPolicy: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn should_evict(&self, record: &ActivityRecord, now: DateTime<Utc>) -> bool;
}

/// Evicts records idle for longer than `max_idle`.
///
/// Idle time is measured from the record's last message, or from its join
/// when the user never spoke.
#[derive(Debug, Clone)]
pub struct RetentionHorizon {
    pub max_idle: Duration,
}

impl RetentionHorizon {
    /// One week.
    pub const DEFAULT_SECS: i64 = 7 * 86_400;

    pub fn new(max_idle: Duration) -> Self {
        Self { max_idle }
    }

    /// Horizons too large for a `Duration` saturate to `Duration::MAX`,
    /// which never evicts.
    pub fn from_secs(secs: i64) -> Self {
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }
}

impl Default for RetentionHorizon {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_SECS)
    }
}

impl EvictionPolicy for RetentionHorizon {
    fn name(&self) -> &str {
        "retention_horizon"
    }

    fn should_evict(&self, record: &ActivityRecord, now: DateTime<Utc>) -> bool {
        now - record.last_seen() > self.max_idle
    }
}

/// Never evicts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepForever;

impl EvictionPolicy for KeepForever {
    fn name(&self) -> &str {
        "keep_forever"
    }

    fn should_evict(&self, _record: &ActivityRecord, _now: DateTime<Utc>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_horizon_uses_last_message() {
        let policy = RetentionHorizon::from_secs(3_600);
        let mut record = ActivityRecord::joined(t0());
        record.record_message(t0() + Duration::minutes(50));
        assert!(!policy.should_evict(&record, t0() + Duration::minutes(110)));
        assert!(policy.should_evict(&record, t0() + Duration::minutes(111)));
    }

    #[test]
    fn test_horizon_falls_back_to_join() {
        let policy = RetentionHorizon::from_secs(60);
        let record = ActivityRecord::joined(t0());
        assert!(!policy.should_evict(&record, t0() + Duration::seconds(60)));
        assert!(policy.should_evict(&record, t0() + Duration::seconds(61)));
    }

    #[test]
    fn test_oversized_horizon_saturates() {
        let policy = RetentionHorizon::from_secs(i64::MAX);
        assert_eq!(policy.max_idle, Duration::MAX);
        let record = ActivityRecord::joined(t0());
        assert!(!policy.should_evict(&record, t0() + Duration::days(3650)));

        let capped = RetentionHorizon::from_secs(MAX_HORIZON_SECS);
        assert_eq!(capped.max_idle, Duration::days(3650));
    }

    #[test]
    fn test_keep_forever() {
        let record = ActivityRecord::joined(t0());
        assert!(!KeepForever.should_evict(&record, t0() + Duration::days(3650)));
    }
}
