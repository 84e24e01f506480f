//! The finding data model.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// How an auto-fix would be applied, when one is possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// Remove the flagged code.
    Delete,
    /// Restructure the flagged code.
    Refactor,
    /// Leave a review comment only.
    Comment,
}

/// Security extension carried by security findings only.
///
/// Quality findings leave this `None`; security detectors attach a
/// remediation suggestion and a CWE-style category tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityInfo {
    /// Longer description of the vulnerability class.
    pub description: String,

    /// Concrete remediation suggestion.
    pub remediation: String,

    /// CWE-style category tag (e.g. "CWE-89").
    pub category: String,
}

/// A single reported issue, quality or security.
///
/// Immutable once emitted by a detector, except that the validator may
/// overwrite `confidence`, `auto_fix_safe`, and `reasoning` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Finding kind id, e.g. "duplicate_function", "sql_injection".
    pub kind: String,

    pub severity: Severity,

    /// Line number (1-indexed).
    pub line: usize,

    /// Column number (0-indexed).
    pub column: usize,

    /// End line number (1-indexed).
    pub end_line: usize,

    /// End column number (0-indexed).
    pub end_column: usize,

    /// Human-readable message.
    pub message: String,

    /// The offending code snippet.
    #[serde(default)]
    pub code: String,

    /// Suggested fix, free-form.
    #[serde(default)]
    pub suggestion: String,

    /// Probability the finding is real, in [0, 1].
    pub confidence: f64,

    /// Whether the finding is safe to correct mechanically.
    #[serde(default)]
    pub auto_fix_safe: bool,

    /// How a fix would be applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_kind: Option<FixKind>,

    /// Explanation of the confidence and auto-fix decision.
    #[serde(default)]
    pub reasoning: String,

    /// Whether the validator re-checked this finding.
    #[serde(default)]
    pub validated: bool,

    /// Source file, set in multi-file analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Security extension; `Some` exactly for security findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityInfo>,
}

impl Finding {
    /// Construct a quality finding with unvalidated defaults.
    pub fn quality(
        kind: impl Into<String>,
        severity: Severity,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            severity,
            line,
            column,
            end_line: line,
            end_column: column,
            message: message.into(),
            code: String::new(),
            suggestion: String::new(),
            confidence: 0.5,
            auto_fix_safe: false,
            fix_kind: None,
            reasoning: String::new(),
            validated: false,
            file: None,
            security: None,
        }
    }

    /// Construct a security finding. Security findings are never
    /// auto-fix-safe, regardless of confidence.
    pub fn security(
        kind: impl Into<String>,
        severity: Severity,
        line: usize,
        column: usize,
        message: impl Into<String>,
        info: SecurityInfo,
    ) -> Self {
        let mut finding = Self::quality(kind, severity, line, column, message);
        finding.security = Some(info);
        finding
    }

    pub fn with_span(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn is_security(&self) -> bool {
        self.security.is_some()
    }

    /// Clamp confidence into [0, 1]; the invariant every emitted finding
    /// must satisfy.
    pub fn clamp_confidence(&mut self) {
        self.confidence = self.confidence.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn quality_finding_defaults() {
        let f = Finding::quality("unused_variable", Severity::Medium, 3, 0, "unused");
        assert!(!f.is_security());
        assert!(!f.auto_fix_safe);
        assert!(!f.validated);
        assert_eq!(f.end_line, 3);
    }

    #[test]
    fn confidence_is_clamped() {
        let f = Finding::quality("x", Severity::Low, 1, 0, "m").with_confidence(1.7);
        assert_eq!(f.confidence, 1.0);
        let f = Finding::quality("x", Severity::Low, 1, 0, "m").with_confidence(-0.2);
        assert_eq!(f.confidence, 0.0);
    }

    #[test]
    fn security_finding_carries_extension() {
        let f = Finding::security(
            "sql_injection",
            Severity::Critical,
            10,
            4,
            "concatenated query",
            SecurityInfo {
                description: "SQL built via string concatenation".into(),
                remediation: "Use parameterized queries".into(),
                category: "CWE-89".into(),
            },
        );
        assert!(f.is_security());
        assert_eq!(f.security.as_ref().unwrap().category, "CWE-89");
    }

    #[test]
    fn severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
