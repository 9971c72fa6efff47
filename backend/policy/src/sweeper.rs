//! Periodic eviction of idle activity records.
//!
//! Hosts that do not run their own scheduler can spawn this loop next to the
//! pipeline; it sweeps on a fixed interval until told to stop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use churnguard_activity::MAX_SWEEP_INTERVAL_SECS;

use crate::pipeline::FilterPipeline;

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Clamp `every` to a period `tokio::time::interval` accepts, between 1 ms and
/// [`MAX_SWEEP_INTERVAL_SECS`].
pub fn effective_interval(every: Duration) -> Duration {
    let max = Duration::from_secs(MAX_SWEEP_INTERVAL_SECS);
    let clamped = every.clamp(MIN_SWEEP_INTERVAL, max);
    if clamped != every {
        warn!(
            requested_secs = every.as_secs(),
            used_secs = clamped.as_secs(),
            "[Sweeper] Interval out of range; clamped"
        );
    }
    clamped
}

/// Sweep `pipeline` every `every` until `shutdown` becomes `true` or its
/// sender is dropped. The first sweep runs one full interval after start.
pub async fn run_sweep_loop(pipeline: FilterPipeline, every: Duration, mut shutdown: watch::Receiver<bool>) {
    let every = effective_interval(every);
    let now = time::Instant::now();
    let mut interval = time::interval_at(now.checked_add(every).unwrap_or(now), every);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!(interval_secs = every.as_secs(), "[Sweeper] Started");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = pipeline.sweep().await;
                debug!(removed, "[Sweeper] Sweep complete");
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("[Sweeper] Stopped");
}

/// Spawn [`run_sweep_loop`] on the current runtime. Send `true` on the
/// returned sender to stop it.
pub fn spawn_sweeper(pipeline: FilterPipeline, every: Duration) -> (JoinHandle<()>, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(run_sweep_loop(pipeline, every, rx));
    (handle, tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use churnguard_core::{ChannelEvent, UserIdentity};

    #[tokio::test]
    async fn test_sweeper_evicts_and_stops() {
        let pipeline = FilterPipeline::with_defaults();
        let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let join = ChannelEvent::Join {
            network: "libera".into(),
            channel: "#rust".into(),
            user: UserIdentity::new("ferris", "crab", "rust-lang.org"),
        };
        pipeline.handle_at(&join, &(), long_ago).await;
        assert_eq!(pipeline.tracked().await, 1);

        let (handle, stop) = spawn_sweeper(pipeline.clone(), Duration::from_millis(10));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(pipeline.tracked().await, 0);

        stop.send(true).unwrap();
        handle.await.unwrap();
    }

    #[test]
    fn test_effective_interval_bounds() {
        let max = Duration::from_secs(MAX_SWEEP_INTERVAL_SECS);
        assert_eq!(effective_interval(Duration::from_secs(60)), Duration::from_secs(60));
        assert_eq!(effective_interval(Duration::from_secs(u64::MAX)), max);
        assert_eq!(effective_interval(Duration::ZERO), MIN_SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn test_huge_interval_keeps_running() {
        let (handle, stop) = spawn_sweeper(FilterPipeline::with_defaults(), Duration::from_secs(u64::MAX));
        time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        stop.send(true).unwrap();
        time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_sender_dropped() {
        let (handle, stop) = spawn_sweeper(FilterPipeline::with_defaults(), Duration::from_secs(3_600));
        drop(stop);
        time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }
}
