//! Shared, serialised entry point to the presence filter.
//!
//! Hosts that deliver events from several connections or tasks share one
//! `FilterPipeline`. Every call takes the single lock around the policy, so
//! each event is handled to completion before the next one starts.
//! Callers:
//! 1. Host receives an event → `pipeline.handle(&event, &host)` → verdict
//! 2. Host timer fires → `pipeline.sweep()` → idle records evicted

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use churnguard_activity::{EvictionPolicy, RetentionHorizon};
use churnguard_core::{ChannelEvent, HostView, Verdict};

use crate::rules::EventPolicy;

#[derive(Clone)]
pub struct FilterPipeline {
    policy: Arc<Mutex<EventPolicy>>,
    eviction: Arc<dyn EvictionPolicy>,
}

impl FilterPipeline {
    pub fn new(policy: EventPolicy, eviction: Arc<dyn EvictionPolicy>) -> Self {
        Self { policy: Arc::new(Mutex::new(policy)), eviction }
    }

    /// Default rules with the default one-week retention horizon.
    pub fn with_defaults() -> Self {
        Self::new(EventPolicy::default(), Arc::new(RetentionHorizon::default()))
    }

    /// Handle an event observed now.
    pub async fn handle<H: HostView + ?Sized>(&self, event: &ChannelEvent, host: &H) -> Verdict {
        self.handle_at(event, host, Utc::now()).await
    }

    /// Handle an event observed at `now`.
    pub async fn handle_at<H: HostView + ?Sized>(
        &self,
        event: &ChannelEvent,
        host: &H,
        now: DateTime<Utc>,
    ) -> Verdict {
        let mut policy = self.policy.lock().await;
        let verdict = policy.handle(event, host, now);
        debug!(
            "[Pipeline] {} network={} channel={} -> {}",
            event.kind(),
            event.network(),
            event.channel().unwrap_or("-"),
            verdict
        );
        verdict
    }

    /// Evict idle records using the configured eviction policy.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now()).await
    }

    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut policy = self.policy.lock().await;
        policy.store_mut().sweep(self.eviction.as_ref(), now)
    }

    /// Number of records a sweep at `now` would evict.
    pub async fn evictable_at(&self, now: DateTime<Utc>) -> usize {
        let policy = self.policy.lock().await;
        policy.store().count_evictable(self.eviction.as_ref(), now)
    }

    /// Name of the injected eviction policy.
    pub fn eviction_policy(&self) -> &str {
        self.eviction.name()
    }

    /// Number of tracked (user, channel, network) records.
    pub async fn tracked(&self) -> usize {
        self.policy.lock().await.store().len()
    }

    /// Run `f` with read access to the policy.
    pub async fn inspect<R>(&self, f: impl FnOnce(&EventPolicy) -> R) -> R {
        let policy = self.policy.lock().await;
        f(&policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use churnguard_core::{ActivityKey, UserIdentity};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn join(nick: &str, host: &str) -> ChannelEvent {
        ChannelEvent::Join {
            network: "libera".into(),
            channel: "#rust".into(),
            user: UserIdentity::new(nick, nick, host),
        }
    }

    #[tokio::test]
    async fn test_pipeline_handles_events() {
        let pipeline = FilterPipeline::with_defaults();
        let verdict = pipeline.handle_at(&join("ferris", "rust-lang.org"), &(), t0()).await;
        assert_eq!(verdict, Verdict::Suppress);
        assert_eq!(pipeline.tracked().await, 1);

        let key = ActivityKey::new("libera", "#rust", "ferris", "rust-lang.org");
        let announced = pipeline
            .inspect(|p| p.store().get(&key).map(|r| r.announced_join))
            .await;
        assert_eq!(announced, Some(false));
    }

    #[tokio::test]
    async fn test_pipeline_sweep_uses_injected_policy() {
        let pipeline = FilterPipeline::new(
            EventPolicy::default(),
            Arc::new(RetentionHorizon::from_secs(3_600)),
        );
        pipeline.handle_at(&join("a", "a.example"), &(), t0()).await;
        pipeline.handle_at(&join("b", "b.example"), &(), t0() + Duration::hours(2)).await;

        let now = t0() + Duration::hours(2) + Duration::minutes(1);
        assert_eq!(pipeline.eviction_policy(), "retention_horizon");
        assert_eq!(pipeline.evictable_at(now).await, 1);
        assert_eq!(pipeline.sweep_at(now).await, 1);
        assert_eq!(pipeline.tracked().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_delivery_is_serialised() {
        let pipeline = FilterPipeline::with_defaults();
        let mut handles = Vec::new();
        for i in 0..32 {
            let pipeline = pipeline.clone();
            handles.push(tokio::spawn(async move {
                let nick = format!("user{i}");
                pipeline.handle_at(&join(&nick, "example.org"), &(), t0()).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Verdict::Suppress);
        }
        assert_eq!(pipeline.tracked().await, 32);
    }
}
