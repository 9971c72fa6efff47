//! `churnguard-config`: runtime configuration for the presence filter.
//!
//! Provides:
//! - Typed config schema (logging, retention, networks, annotation)
//! - YAML read/write with atomic replace
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with warnings and errors

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use schema::ChurnGuardConfig;
pub use io::{config_dir, config_file_path, load_config, load_config_value, write_config};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ValidationReport, ConfigValidationError};

use anyhow::{Context, Result};
use churnguard_core::ChurnError;
use std::path::Path;

/// Load a config file, apply env substitution and defaults, and validate it.
///
/// Returns the effective config together with the full validation report;
/// only read, parse and env errors fail outright.
pub async fn load_with_report(path: &Path) -> Result<(ChurnGuardConfig, ValidationReport)> {
    let value = load_config_value(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: ChurnGuardConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure at: {}", path.display()))?;
    let config = apply_all_defaults(config);
    let report = validate(&config);
    Ok((config, report))
}

/// Load, apply env substitution, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; any validation error aborts the load.
pub async fn load_and_prepare(path: &Path) -> Result<ChurnGuardConfig> {
    let (config, report) = load_with_report(path).await?;
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        return Err(ChurnError::Config(first.to_string()).into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_and_prepare_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "retention:\n  horizonSecs: 3600\n").await.unwrap();

        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.retention_horizon_secs(), 3_600);
        assert_eq!(config.sweep_interval_secs(), defaults::DEFAULT_SWEEP_INTERVAL_SECS);
        assert_eq!(config.unreliable_networks(), vec!["twitch"]);
    }

    #[tokio::test]
    async fn test_load_and_prepare_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "retention:\n  sweepIntervalSecs: 0\n").await.unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ChurnError>(), Some(ChurnError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_with_report_keeps_every_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = "retention:\n  horizonSecs: 9223372036854775807\n  sweepIntervalSecs: 18446744073709551615\n";
        tokio::fs::write(&path, yaml).await.unwrap();

        let (config, report) = load_with_report(&path).await.unwrap();
        assert_eq!(report.errors.len(), 2);
        assert_eq!(config.retention_horizon_secs(), i64::MAX);
        assert!(load_and_prepare(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_env_vars_are_resolved_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "logging:\n  dir: \"${CHURNGUARD_TEST_UNSET_DIR}/logs\"\n")
            .await
            .unwrap();

        let err = load_with_report(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to resolve env vars"));
    }
}
