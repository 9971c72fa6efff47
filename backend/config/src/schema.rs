//! churnguard configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills in
//! the gaps and the accessor methods below fall back to the same defaults.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_COLOUR_CODE, DEFAULT_LOG_DIR_NAME, DEFAULT_LOG_LEVEL, DEFAULT_RETENTION_HORIZON_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_UNRELIABLE_NETWORKS,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnGuardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Eviction of idle activity records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<RetentionConfig>,

    /// Network classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<NetworksConfig>,

    /// "logged in ... ago" note appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Mask ident/host in decision logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact_hostmasks: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionConfig {
    /// `false` keeps every record for the lifetime of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Records idle for longer than this are evicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworksConfig {
    /// Case-insensitive substrings of network names whose user identities
    /// cannot be trusted (e.g. `twitch`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_unreliable: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationConfig {
    /// Prefix before the note; empty disables colouring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl ChurnGuardConfig {
    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn log_dir(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.clone())
            .unwrap_or_else(|| {
                crate::io::config_dir().join(DEFAULT_LOG_DIR_NAME).to_string_lossy().into_owned()
            })
    }

    pub fn redact_hostmasks(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.redact_hostmasks).unwrap_or(true)
    }

    pub fn retention_enabled(&self) -> bool {
        self.retention.as_ref().and_then(|r| r.enabled).unwrap_or(true)
    }

    pub fn retention_horizon_secs(&self) -> i64 {
        self.retention
            .as_ref()
            .and_then(|r| r.horizon_secs)
            .unwrap_or(DEFAULT_RETENTION_HORIZON_SECS)
    }

    pub fn sweep_interval_secs(&self) -> u64 {
        self.retention
            .as_ref()
            .and_then(|r| r.sweep_interval_secs)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS)
    }

    pub fn unreliable_networks(&self) -> Vec<String> {
        self.networks
            .as_ref()
            .and_then(|n| n.identity_unreliable.clone())
            .unwrap_or_else(|| DEFAULT_UNRELIABLE_NETWORKS.iter().map(|s| s.to_string()).collect())
    }

    pub fn colour_code(&self) -> Option<String> {
        let code = self
            .annotation
            .as_ref()
            .and_then(|a| a.colour_code.clone())
            .unwrap_or_else(|| DEFAULT_COLOUR_CODE.to_string());
        (!code.is_empty()).then_some(code)
    }
}
