//! Config validation: schema checks with user-friendly error messages.

use crate::schema::ChurnGuardConfig;
use churnguard_activity::{MAX_HORIZON_SECS, MAX_SWEEP_INTERVAL_SECS, RECENT_ACTIVITY_WINDOW_SECS};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ChurnGuardConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_retention(config, &mut report);
    validate_networks(config, &mut report);
    validate_annotation(config, &mut report);
    report
}

fn validate_logging(config: &ChurnGuardConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if logging.level.as_deref().is_some_and(|l| l.trim().is_empty()) {
        report.error("logging.level", "Log level cannot be empty");
    }
    if logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("logging.dir", "Log directory cannot be empty");
    }
}

fn validate_retention(config: &ChurnGuardConfig, report: &mut ValidationReport) {
    let Some(retention) = &config.retention else { return };
    if let Some(horizon) = retention.horizon_secs {
        if horizon <= 0 {
            report.error("retention.horizonSecs", "Retention horizon must be positive");
        } else if horizon > MAX_HORIZON_SECS {
            report.error(
                "retention.horizonSecs",
                format!("Retention horizon cannot exceed {MAX_HORIZON_SECS}s; disable retention to keep records forever"),
            );
        } else if horizon < RECENT_ACTIVITY_WINDOW_SECS {
            report.warn(
                "retention.horizonSecs",
                format!("Horizon shorter than the {RECENT_ACTIVITY_WINDOW_SECS}s activity window evicts active users"),
            );
        }
    }
    match retention.sweep_interval_secs {
        Some(0) => report.error("retention.sweepIntervalSecs", "Sweep interval must be positive"),
        Some(secs) if secs > MAX_SWEEP_INTERVAL_SECS => report.error(
            "retention.sweepIntervalSecs",
            format!("Sweep interval cannot exceed {MAX_SWEEP_INTERVAL_SECS}s"),
        ),
        _ => {}
    }
}

fn validate_networks(config: &ChurnGuardConfig, report: &mut ValidationReport) {
    let Some(patterns) = config.networks.as_ref().and_then(|n| n.identity_unreliable.as_ref()) else {
        return;
    };
    for (i, pattern) in patterns.iter().enumerate() {
        if pattern.trim().is_empty() {
            report.error(
                format!("networks.identityUnreliable[{i}]"),
                "Empty pattern would match every network",
            );
        }
    }
}

fn validate_annotation(config: &ChurnGuardConfig, report: &mut ValidationReport) {
    let Some(code) = config.annotation.as_ref().and_then(|a| a.colour_code.as_deref()) else {
        return;
    };
    if code.contains(['\r', '\n']) {
        report.error("annotation.colourCode", "Colour code cannot contain line breaks");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnnotationConfig, NetworksConfig, RetentionConfig};

    #[test]
    fn test_default_config_is_valid() {
        let report = validate(&crate::apply_all_defaults(ChurnGuardConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_retention_checks() {
        let config = ChurnGuardConfig {
            retention: Some(RetentionConfig {
                enabled: None,
                horizon_secs: Some(0),
                sweep_interval_secs: Some(0),
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert_eq!(report.errors.len(), 2);

        let config = ChurnGuardConfig {
            retention: Some(RetentionConfig { horizon_secs: Some(120), ..Default::default() }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "retention.horizonSecs");
    }

    #[test]
    fn test_retention_upper_bounds() {
        let config = ChurnGuardConfig {
            retention: Some(RetentionConfig {
                enabled: None,
                horizon_secs: Some(i64::MAX),
                sweep_interval_secs: Some(u64::MAX),
            }),
            ..Default::default()
        };
        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["retention.horizonSecs", "retention.sweepIntervalSecs"]);

        let config = ChurnGuardConfig {
            retention: Some(RetentionConfig {
                enabled: None,
                horizon_secs: Some(MAX_HORIZON_SECS),
                sweep_interval_secs: Some(MAX_SWEEP_INTERVAL_SECS),
            }),
            ..Default::default()
        };
        assert!(validate(&config).is_valid());
    }

    #[test]
    fn test_empty_network_pattern_is_error() {
        let config = ChurnGuardConfig {
            networks: Some(NetworksConfig {
                identity_unreliable: Some(vec!["twitch".into(), "  ".into()]),
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert_eq!(report.errors[0].path, "networks.identityUnreliable[1]");
    }

    #[test]
    fn test_colour_code_line_break() {
        let config = ChurnGuardConfig {
            annotation: Some(AnnotationConfig { colour_code: Some("\u{3}8\r\nQUIT".into()) }),
            ..Default::default()
        };
        assert!(!validate(&config).is_valid());
    }
}
