//! Decision Logger
//!
//! One structured record per filter decision, emitted through `tracing`
//! under the `churn_decisions` target so it can be routed separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use churnguard_core::{ChannelEvent, EventKind, Verdict};

use crate::redact::redact_identity;

#[derive(Debug, Serialize)]
pub struct DecisionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub network: String,
    pub channel: Option<String>,
    pub user: Option<String>,
    pub verdict: String,
}

impl DecisionLogEntry {
    pub fn new(event: &ChannelEvent, verdict: &Verdict, at: DateTime<Utc>, redact: bool) -> Self {
        Self {
            timestamp: at,
            kind: event.kind(),
            network: event.network().to_string(),
            channel: event.channel().map(String::from),
            user: event.user().map(|u| redact_identity(u, redact)),
            verdict: verdict.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionLogger {
    redact_hostmasks: bool,
}

impl DecisionLogger {
    pub fn new(redact_hostmasks: bool) -> Self {
        Self { redact_hostmasks }
    }

    /// Build and emit the log record for one decision.
    pub fn log_decision(&self, event: &ChannelEvent, verdict: &Verdict, at: DateTime<Utc>) -> DecisionLogEntry {
        let entry = DecisionLogEntry::new(event, verdict, at, self.redact_hostmasks);
        info!(
            target: "churn_decisions",
            kind = %entry.kind,
            network = %entry.network,
            channel = entry.channel.as_deref().unwrap_or("-"),
            user = entry.user.as_deref().unwrap_or("-"),
            verdict = %entry.verdict,
            "Filter decision"
        );
        entry
    }
}

impl Default for DecisionLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churnguard_core::UserIdentity;

    #[test]
    fn test_entry_redacts_by_default() {
        let event = ChannelEvent::Part {
            network: "libera".into(),
            channel: "#rust".into(),
            user: UserIdentity::new("ferris", "crab", "rust-lang.org"),
            reason: Some("bye".into()),
        };
        let entry = DecisionLogger::default().log_decision(&event, &Verdict::Suppress, Utc::now());
        assert_eq!(entry.kind, EventKind::Part);
        assert_eq!(entry.channel.as_deref(), Some("#rust"));
        assert_eq!(entry.user.as_deref(), Some("ferris!*@[REDACTED]"));
        assert_eq!(entry.verdict, "suppress");
    }

    #[test]
    fn test_entry_for_anonymous_mode_change() {
        let event = ChannelEvent::ModeChange {
            network: "twitch".into(),
            channel: "#stream".into(),
            user: None,
            mode: "-o viewer".into(),
        };
        let entry = DecisionLogEntry::new(&event, &Verdict::Pass, Utc::now(), false);
        assert!(entry.user.is_none());
        assert_eq!(entry.verdict, "pass");
    }
}
