//! Analysis run statistics and structured warnings.

use serde::{Deserialize, Serialize};

/// What a warning is about. Warnings are how recoverable trouble becomes
/// visible to callers; none of them abort an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The tree contained syntax errors but was still usable.
    PartialParse,
    /// No registered support or no usable tree; regex fallback ran instead.
    FallbackUsed,
    /// One detection module failed and contributed nothing.
    ModuleFailed,
    /// A file in a multi-file request had no resolvable language.
    LanguageUnresolved,
    /// A file exceeded its soft deadline; its findings are partial.
    DeadlineExceeded,
    /// The request was cancelled before all files were processed.
    Cancelled,
}

/// A structured warning record emitted through the stats channel rather
/// than a terminal or log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub kind: WarningKind,

    /// Affected file, when the warning is file-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    pub message: String,
}

impl AnalysisWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: None,
            message: message.into(),
        }
    }

    pub fn for_file(kind: WarningKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: Some(file.into()),
            message: message.into(),
        }
    }
}

/// Performance and degradation metrics for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Total AST nodes visited.
    pub nodes_visited: usize,

    /// Time spent parsing, in milliseconds.
    pub parse_ms: u64,

    /// Time spent in detection modules, in milliseconds.
    pub detect_ms: u64,

    /// Whether the generic text fallback produced the findings.
    #[serde(default)]
    pub used_fallback: bool,

    /// Whether the tree contained syntax errors.
    #[serde(default)]
    pub partial_parse: bool,

    /// Whether a soft deadline cut the run short.
    #[serde(default)]
    pub truncated: bool,

    /// Structured warnings accumulated during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisStats {
    pub fn warn(&mut self, warning: AnalysisWarning) {
        self.warnings.push(warning);
    }

    /// Fold another run's stats into this one (multi-file aggregation).
    pub fn merge(&mut self, other: AnalysisStats) {
        self.nodes_visited += other.nodes_visited;
        self.parse_ms += other.parse_ms;
        self.detect_ms += other.detect_ms;
        self.used_fallback |= other.used_fallback;
        self.partial_parse |= other.partial_parse;
        self.truncated |= other.truncated;
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_combines_flags_and_counts() {
        let mut a = AnalysisStats {
            nodes_visited: 10,
            parse_ms: 2,
            ..Default::default()
        };
        let mut b = AnalysisStats {
            nodes_visited: 5,
            used_fallback: true,
            ..Default::default()
        };
        b.warn(AnalysisWarning::new(WarningKind::FallbackUsed, "no support"));

        a.merge(b);
        assert_eq!(a.nodes_visited, 15);
        assert!(a.used_fallback);
        assert!(!a.partial_parse);
        assert_eq!(a.warnings.len(), 1);
    }
}
