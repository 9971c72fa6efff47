use serde::{Deserialize, Serialize};

/// Decision returned to the host for a single event.
///
/// The host is responsible for withholding the event (`Suppress`),
/// delivering it unchanged (`Pass`), or delivering the replacement text
/// (`Rewrite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "payload", rename_all = "snake_case")]
pub enum Verdict {
    Suppress,
    Pass,
    Rewrite(String),
}

impl Verdict {
    pub fn pass() -> Self {
        Self::Pass
    }

    pub fn suppress() -> Self {
        Self::Suppress
    }

    pub fn rewrite(content: impl Into<String>) -> Self {
        Self::Rewrite(content.into())
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress)
    }

    /// Replacement payload, if the event was rewritten.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Rewrite(content) => Some(content),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suppress => f.write_str("suppress"),
            Self::Pass => f.write_str("pass"),
            Self::Rewrite(_) => f.write_str("rewrite"),
        }
    }
}
