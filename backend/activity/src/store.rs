use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use churnguard_core::ActivityKey;

use crate::record::ActivityRecord;
use crate::retention::EvictionPolicy;

/// In-memory map of activity records.
///
/// Not synchronised: callers that share a store across tasks wrap it in a
/// single lock (see `FilterPipeline` in the policy crate).
#[derive(Debug, Default)]
pub struct ActivityStore {
    records: HashMap<ActivityKey, ActivityRecord>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ActivityKey) -> Option<&ActivityRecord> {
        self.records.get(key)
    }

    /// Record a join for `key`.
    ///
    /// A fresh record starts unannounced with no messages. An existing record
    /// is treated as a rejoin: the join clock restarts and the annotation is
    /// owed again, while the last message time is kept.
    pub fn get_or_create_on_join(&mut self, key: ActivityKey, now: DateTime<Utc>) -> &mut ActivityRecord {
        match self.records.entry(key) {
            Entry::Occupied(entry) => {
                debug!("[Store] rejoin {}", entry.key());
                let record = entry.into_mut();
                record.rejoined(now);
                record
            }
            Entry::Vacant(entry) => {
                debug!("[Store] tracking {} from join", entry.key());
                entry.insert(ActivityRecord::joined(now))
            }
        }
    }

    /// Fetch the record for a talking user, creating an already-announced one
    /// when the user was never seen joining. Existing records are returned
    /// untouched; the caller refreshes the message time.
    pub fn get_or_create_on_message(&mut self, key: ActivityKey, now: DateTime<Utc>) -> &mut ActivityRecord {
        self.records.entry(key).or_insert_with_key(|key| {
            debug!("[Store] tracking {} from message", key);
            ActivityRecord::first_message(now)
        })
    }

    /// Whether the record for `key` exists and is recently active.
    pub fn recently_active(&self, key: &ActivityKey, now: DateTime<Utc>) -> bool {
        self.get(key).is_some_and(|record| record.recently_active(now))
    }

    /// Remove every record the policy selects. Returns how many were removed.
    pub fn sweep(&mut self, policy: &dyn EvictionPolicy, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !policy.should_evict(record, now));
        let removed = before - self.records.len();
        if removed > 0 {
            info!(
                policy = policy.name(),
                removed,
                remaining = self.records.len(),
                "[Store] Swept idle activity records"
            );
        }
        removed
    }

    /// Count the records the policy would remove, without removing them.
    pub fn count_evictable(&self, policy: &dyn EvictionPolicy, now: DateTime<Utc>) -> usize {
        self.records.values().filter(|record| policy.should_evict(record, now)).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retention::{KeepForever, RetentionHorizon};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn key(host: &str) -> ActivityKey {
        ActivityKey::new("libera", "#rust", "ferris", host)
    }

    #[test]
    fn test_get_is_pure() {
        let store = ActivityStore::new();
        assert!(store.get(&key("a")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_join_creates_unannounced_record() {
        let mut store = ActivityStore::new();
        let record = store.get_or_create_on_join(key("a"), t0());
        assert!(!record.announced_join);
        assert_eq!(record.joined_at, t0());
        assert!(record.last_message_at.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejoin_resets_announcement() {
        let mut store = ActivityStore::new();
        store.get_or_create_on_message(key("a"), t0());
        assert!(store.get(&key("a")).unwrap().announced_join);

        let later = t0() + Duration::minutes(30);
        store.get_or_create_on_join(key("a"), later);
        let record = store.get(&key("a")).unwrap();
        assert!(!record.announced_join);
        assert_eq!(record.joined_at, later);
        assert_eq!(record.last_message_at, Some(t0()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_message_on_unknown_key_is_preannounced() {
        let mut store = ActivityStore::new();
        let record = store.get_or_create_on_message(key("a"), t0());
        assert!(record.announced_join);
        assert_eq!(record.last_message_at, Some(t0()));
    }

    #[test]
    fn test_message_on_known_key_does_not_mutate() {
        let mut store = ActivityStore::new();
        store.get_or_create_on_join(key("a"), t0());
        let record = store.get_or_create_on_message(key("a"), t0() + Duration::seconds(5));
        assert!(!record.announced_join);
        assert!(record.last_message_at.is_none());
        assert_eq!(record.joined_at, t0());
    }

    #[test]
    fn test_recently_active_by_key() {
        let mut store = ActivityStore::new();
        store.get_or_create_on_message(key("a"), t0());
        assert!(store.recently_active(&key("a"), t0() + Duration::seconds(600)));
        assert!(!store.recently_active(&key("a"), t0() + Duration::seconds(601)));
        assert!(!store.recently_active(&key("b"), t0()));
    }

    #[test]
    fn test_sweep_removes_idle_records() {
        let mut store = ActivityStore::new();
        store.get_or_create_on_join(key("old"), t0());
        store.get_or_create_on_message(key("new"), t0() + Duration::hours(5));

        let policy = RetentionHorizon::from_secs(3_600);
        let now = t0() + Duration::hours(5) + Duration::minutes(1);
        assert_eq!(store.count_evictable(&policy, now), 1);
        assert_eq!(store.sweep(&policy, now), 1);
        assert!(store.get(&key("old")).is_none());
        assert!(store.get(&key("new")).is_some());

        assert_eq!(store.sweep(&KeepForever, now + Duration::days(365)), 0);
        assert_eq!(store.len(), 1);
    }
}
