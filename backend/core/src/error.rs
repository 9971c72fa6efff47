use thiserror::Error;

/// Top-level error type for the churnguard runtime.
///
/// The decision rules themselves never fail; these variants cover the
/// surrounding configuration and replay plumbing.
#[derive(Debug, Error)]
pub enum ChurnError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid event on line {line}: {message}")]
    InvalidEvent { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_display() {
        let err = ChurnError::InvalidEvent { line: 7, message: "missing field `network`".into() };
        assert_eq!(err.to_string(), "invalid event on line 7: missing field `network`");
    }

    #[test]
    fn test_config_display() {
        let err = ChurnError::Config("retention.horizonSecs must be positive".into());
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
