//! Confidence scoring and auto-fix gating.
//!
//! Scores are hard gates, not smooth blends: "is this actually
//! unreferenced" is a binary question, so a corroborated finding gets the
//! full score and a contradicted one gets zero.

use vet_foundation::Finding;

use crate::validate::ValidationResult;

/// Minimum confidence for a mechanical fix.
pub const AUTO_FIX_THRESHOLD: f64 = 0.85;

/// Kinds mechanical enough to fix without human review. Security findings
/// are excluded by construction regardless of kind.
const AUTO_FIX_KINDS: &[&str] = &[
    "duplicate_function",
    "unused_variable",
    "unused_import",
    "unused_export",
    "orphaned_code",
];

/// Compute the validated confidence for a finding kind, or `None` when
/// validation has nothing to say (pass-through).
pub fn score(kind: &str, result: &ValidationResult) -> Option<f64> {
    match kind {
        "orphaned_code" | "unused_variable" => {
            if result.is_exported || result.found_in_codebase {
                Some(0.0)
            } else {
                Some(0.95)
            }
        }
        "unused_export" => {
            // Exported by definition; only external references matter.
            if result.found_in_codebase {
                Some(0.0)
            } else {
                Some(0.95)
            }
        }
        "empty_catch" => {
            if result.has_intent_comment {
                Some(0.0)
            } else {
                Some(0.85)
            }
        }
        "duplicate_function" | "cross_file_duplicate" => Some(0.9),
        _ => None,
    }
}

/// Whether a finding may be fixed mechanically.
pub fn auto_fix_safe(finding: &Finding) -> bool {
    !finding.is_security()
        && finding.confidence >= AUTO_FIX_THRESHOLD
        && AUTO_FIX_KINDS.contains(&finding.kind.as_str())
}

/// Human-readable explanation of the scoring decision.
pub fn reasoning(kind: &str, result: &ValidationResult, confidence: f64, fix_safe: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    match kind {
        "orphaned_code" | "unused_variable" | "unused_export" => {
            if result.found_in_codebase {
                parts.push(format!(
                    "Referenced {} time(s) in other files",
                    result.reference_count
                ));
            } else if result.is_exported {
                parts.push("Exported; may be used by code outside this request".to_string());
            } else {
                parts.push("No external references found".to_string());
            }
        }
        "empty_catch" => {
            if result.has_intent_comment {
                parts.push("Nearby intent comment suggests this is deliberate".to_string());
            } else {
                parts.push("No intent comment found nearby".to_string());
            }
        }
        "duplicate_function" | "cross_file_duplicate" => {
            parts.push("Bodies are token-identical".to_string());
        }
        _ => parts.push(result.details.clone()),
    }
    parts.push(format!("Confidence: {:.0}%", confidence * 100.0));
    if fix_safe {
        parts.push("Safe for automated fix".to_string());
    } else {
        parts.push("Requires human review".to_string());
    }
    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vet_foundation::{Severity, SecurityInfo};

    fn clean_result() -> ValidationResult {
        ValidationResult {
            found_in_codebase: false,
            reference_count: 0,
            has_intent_comment: false,
            is_exported: false,
            details: String::new(),
        }
    }

    #[test]
    fn unused_variable_hard_gate() {
        assert_eq!(score("unused_variable", &clean_result()), Some(0.95));

        let mut referenced = clean_result();
        referenced.found_in_codebase = true;
        referenced.reference_count = 2;
        assert_eq!(score("unused_variable", &referenced), Some(0.0));

        let mut exported = clean_result();
        exported.is_exported = true;
        assert_eq!(score("unused_variable", &exported), Some(0.0));
    }

    #[test]
    fn unknown_kind_passes_through() {
        assert_eq!(score("sql_injection", &clean_result()), None);
        assert_eq!(score("made_up_kind", &clean_result()), None);
    }

    #[test]
    fn security_is_never_auto_fix_safe() {
        let finding = Finding::security(
            "sql_injection",
            Severity::Critical,
            1,
            0,
            "m",
            SecurityInfo {
                description: "d".into(),
                remediation: "r".into(),
                category: "CWE-89".into(),
            },
        )
        .with_confidence(0.99);
        assert!(!auto_fix_safe(&finding));
    }

    #[test]
    fn quality_auto_fix_requires_threshold_and_kind() {
        let high = Finding::quality("unused_variable", Severity::Medium, 1, 0, "m")
            .with_confidence(0.95);
        assert!(auto_fix_safe(&high));

        let low = Finding::quality("unused_variable", Severity::Medium, 1, 0, "m")
            .with_confidence(0.8);
        assert!(!auto_fix_safe(&low));

        let wrong_kind =
            Finding::quality("unreachable_code", Severity::Medium, 1, 0, "m").with_confidence(0.99);
        assert!(!auto_fix_safe(&wrong_kind));
    }
}
