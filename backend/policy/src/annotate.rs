use serde::{Deserialize, Serialize};

/// IRC colour control character followed by colour 8 (yellow).
pub const DEFAULT_COLOUR_CODE: &str = "\u{3}8";

/// How the "logged in ... ago" note is appended to a returning talker's
/// first message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Prefix placed before the note. `None` or empty leaves it uncoloured.
    pub colour_code: Option<String>,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self { colour_code: Some(DEFAULT_COLOUR_CODE.to_string()) }
    }
}

impl AnnotationStyle {
    pub fn plain() -> Self {
        Self { colour_code: None }
    }

    pub fn annotate(&self, text: &str, age: &str) -> String {
        match self.colour_code.as_deref().filter(|c| !c.is_empty()) {
            Some(colour) => format!("{text} {colour}(logged in {age} ago)"),
            None => format!("{text} (logged in {age} ago)"),
        }
    }
}
