/// Network-name pattern matched by default as identity-unreliable.
pub const DEFAULT_UNRELIABLE_PATTERN: &str = "twitch";

/// Classifies networks whose user ident/host fields are frequently absent
/// or stale (for example, mode removals arriving after the user left).
#[derive(Debug, Clone)]
pub struct NetworkClassifier {
    patterns: Vec<String>,
}

impl NetworkClassifier {
    /// Patterns are matched as case-insensitive substrings of the network name.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_identity_unreliable(&self, network: &str) -> bool {
        let network = network.to_lowercase();
        self.patterns.iter().any(|p| network.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for NetworkClassifier {
    fn default() -> Self {
        Self::new([DEFAULT_UNRELIABLE_PATTERN])
    }
}
