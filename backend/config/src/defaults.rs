//! Config defaults: applies default values to parsed config.

use crate::schema::{
    AnnotationConfig, ChurnGuardConfig, LoggingConfig, NetworksConfig, RetentionConfig,
};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log directory name inside the config directory.
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// One week.
pub const DEFAULT_RETENTION_HORIZON_SECS: i64 = 7 * 86_400;

/// One hour.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3_600;

pub const DEFAULT_UNRELIABLE_NETWORKS: &[&str] = &["twitch"];

/// IRC colour 8 (yellow).
pub const DEFAULT_COLOUR_CODE: &str = "\u{3}8";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ChurnGuardConfig) -> ChurnGuardConfig {
    let config = apply_logging_defaults(config);
    let config = apply_retention_defaults(config);
    let config = apply_network_defaults(config);
    apply_annotation_defaults(config)
}

fn apply_logging_defaults(mut config: ChurnGuardConfig) -> ChurnGuardConfig {
    let dir = config.log_dir();
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert(dir);
    logging.redact_hostmasks.get_or_insert(true);
    config
}

fn apply_retention_defaults(mut config: ChurnGuardConfig) -> ChurnGuardConfig {
    let retention = config.retention.get_or_insert_with(RetentionConfig::default);
    retention.enabled.get_or_insert(true);
    retention.horizon_secs.get_or_insert(DEFAULT_RETENTION_HORIZON_SECS);
    retention.sweep_interval_secs.get_or_insert(DEFAULT_SWEEP_INTERVAL_SECS);
    config
}

fn apply_network_defaults(mut config: ChurnGuardConfig) -> ChurnGuardConfig {
    let networks = config.networks.get_or_insert_with(NetworksConfig::default);
    networks
        .identity_unreliable
        .get_or_insert_with(|| DEFAULT_UNRELIABLE_NETWORKS.iter().map(|s| s.to_string()).collect());
    config
}

fn apply_annotation_defaults(mut config: ChurnGuardConfig) -> ChurnGuardConfig {
    let annotation = config.annotation.get_or_insert_with(AnnotationConfig::default);
    annotation.colour_code.get_or_insert_with(|| DEFAULT_COLOUR_CODE.to_string());
    config
}
