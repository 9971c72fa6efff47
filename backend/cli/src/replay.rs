//! Replays recorded events through the filter.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use churnguard_core::{ChurnError, EventKind, TimedEvent, Verdict};
use churnguard_logging::DecisionLogger;
use churnguard_policy::FilterPipeline;

use crate::host::SimulatedHost;

/// Which timestamp the rules see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayClock {
    /// The `at` field recorded with each event.
    EventTime,
    /// The wall clock at the moment of replay.
    WallClock,
}

#[derive(Debug, Serialize)]
pub struct ReplayOutcome {
    pub line: usize,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[derive(Debug, Default, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub suppressed: usize,
    pub passed: usize,
    pub rewritten: usize,
    pub last_at: Option<DateTime<Utc>>,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &ReplayOutcome) {
        self.events += 1;
        match outcome.verdict {
            Verdict::Suppress => self.suppressed += 1,
            Verdict::Pass => self.passed += 1,
            Verdict::Rewrite(_) => self.rewritten += 1,
        }
        self.last_at = Some(outcome.at);
    }
}

/// Parse an NDJSON event log. Blank lines and lines starting with `#` are
/// skipped; line numbers in errors are 1-based.
pub fn parse_events(input: &str) -> Result<Vec<(usize, TimedEvent)>, ChurnError> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line)
                .map(|event| (line_no, event))
                .map_err(|e| ChurnError::InvalidEvent { line: line_no, message: e.to_string() })
        })
        .collect()
}

/// Read and parse an NDJSON event log from disk.
pub async fn read_events(path: &Path) -> Result<Vec<(usize, TimedEvent)>, ChurnError> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_events(&raw)
}

/// Feed every event through the pipeline in order, keeping the simulated host
/// in step. `on_outcome` sees each result as it is produced.
pub async fn replay(
    pipeline: &FilterPipeline,
    events: &[(usize, TimedEvent)],
    clock: ReplayClock,
    logger: &DecisionLogger,
    mut on_outcome: impl FnMut(&ReplayOutcome),
) -> ReplaySummary {
    let mut host = SimulatedHost::new();
    let mut summary = ReplaySummary::default();

    for (line, timed) in events {
        let at = match clock {
            ReplayClock::EventTime => timed.at,
            ReplayClock::WallClock => Utc::now(),
        };
        let verdict = pipeline.handle_at(&timed.event, &host, at).await;
        logger.log_decision(&timed.event, &verdict, at);
        host.observe(&timed.event);

        let outcome = ReplayOutcome { line: *line, at, kind: timed.event.kind(), verdict };
        summary.record(&outcome);
        on_outcome(&outcome);
    }

    summary
}
