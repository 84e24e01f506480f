//! Detection exclusion configuration.

use serde::{Deserialize, Serialize};

/// Controls which symbols detection never flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Function names never flagged as orphaned.
    #[serde(default = "default_excluded_functions")]
    pub excluded_functions: Vec<String>,

    /// Name prefixes never flagged (test harness entry points).
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,

    /// Skip externally visible symbols entirely; callers that want exported
    /// symbols checked use multi-file analysis, where the cross-file
    /// resolver can actually answer the question.
    #[serde(default = "default_true")]
    pub trust_exported: bool,
}

fn default_excluded_functions() -> Vec<String> {
    vec!["main".into(), "init".into(), "__init__".into()]
}

fn default_excluded_prefixes() -> Vec<String> {
    vec!["Test".into(), "Example".into(), "Benchmark".into(), "test_".into()]
}

fn default_true() -> bool {
    true
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            excluded_functions: default_excluded_functions(),
            excluded_prefixes: default_excluded_prefixes(),
            trust_exported: default_true(),
        }
    }
}

impl DetectionConfig {
    /// Whether a function name is excluded from orphaned-code flagging.
    pub fn excludes(&self, name: &str) -> bool {
        self.excluded_functions.iter().any(|f| f == name)
            || self.excluded_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exclusions() {
        let config = DetectionConfig::default();
        assert!(config.excludes("main"));
        assert!(config.excludes("TestHandler"));
        assert!(config.excludes("test_parser"));
        assert!(!config.excludes("handleRequest"));
    }
}
