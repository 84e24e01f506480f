//! Finding validation: re-check each candidate against the live request
//! before trusting its confidence.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use vet_analysis_cross_file::ProjectIndex;
use vet_foundation::Finding;

use crate::confidence;

/// Outcome of re-checking one finding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// The symbol is referenced somewhere other than its own file.
    pub found_in_codebase: bool,

    /// How many external references were found.
    pub reference_count: usize,

    /// A TODO/FIXME/intentional comment sits near the finding.
    pub has_intent_comment: bool,

    /// The symbol is exported / externally visible.
    pub is_exported: bool,

    pub details: String,
}

/// What the validator may consult: the files of the request and, for
/// multi-file runs, the project index.
pub struct ValidationContext<'a> {
    /// (path, content) of every file in the request.
    pub files: &'a [(String, String)],

    /// Path of the file the finding came from.
    pub current_file: &'a str,

    /// Present for multi-file requests.
    pub index: Option<&'a ProjectIndex>,
}

static INTENT_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(todo|fixme|hack|intentional|deliberate|expected|ignored? on purpose)")
        .expect("static regex")
});

static GENERATED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(code generated|do not edit|@generated|autogenerated)").expect("static regex")
});

static REFLECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(reflect\.|getattr\(|globals\(\)|__import__|importlib|window\[|Function\()")
        .expect("static regex")
});

/// Quoted symbol name inside a detector message, e.g. `Variable 'x' is...`.
fn symbol_from_message(message: &str) -> Option<&str> {
    let start = message.find('\'')?;
    let rest = &message[start + 1..];
    let end = rest.find('\'')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn current_content<'a>(ctx: &'a ValidationContext<'_>) -> Option<&'a str> {
    ctx.files
        .iter()
        .find(|(path, _)| path == ctx.current_file)
        .map(|(_, content)| content.as_str())
}

/// Count word-boundary occurrences of `name` in every file except the
/// current one. Used when no project index is available.
fn scan_external_references(ctx: &ValidationContext<'_>, name: &str) -> usize {
    let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else {
        return 0;
    };
    ctx.files
        .iter()
        .filter(|(path, _)| path != ctx.current_file)
        .map(|(_, content)| pattern.find_iter(content).count())
        .sum()
}

fn reference_check(ctx: &ValidationContext<'_>, name: &str) -> (bool, usize, bool) {
    if let Some(index) = ctx.index {
        let count = index
            .symbols
            .external_reference_count(name, ctx.current_file);
        let exported = index
            .symbols
            .symbols(name)
            .iter()
            .any(|s| s.exported && s.file == ctx.current_file);
        (count > 0, count, exported)
    } else {
        let count = scan_external_references(ctx, name);
        (count > 0, count, false)
    }
}

fn intent_comment_near(ctx: &ValidationContext<'_>, line: usize) -> bool {
    let Some(content) = current_content(ctx) else {
        return false;
    };
    let lines: Vec<&str> = content.lines().collect();
    let start = line.saturating_sub(3);
    let end = (line + 2).min(lines.len());
    if start >= end {
        return false;
    }
    lines[start..end].iter().any(|l| INTENT_COMMENT.is_match(l))
}

/// Penalty for signals that make static reference counting unreliable:
/// reflection, dynamic imports, generated code.
fn edge_case_penalty(ctx: &ValidationContext<'_>) -> f64 {
    let Some(content) = current_content(ctx) else {
        return 0.0;
    };
    let mut penalty: f64 = 0.0;
    if REFLECTION_MARKER.is_match(content) {
        penalty += 0.2;
    }
    if GENERATED_MARKER.is_match(content) {
        penalty += 0.3;
    }
    penalty.min(0.5)
}

/// Re-check a finding and overwrite its confidence, auto-fix verdict, and
/// reasoning. Kinds the validator does not understand pass through with
/// their detector confidence intact (deliberately observable, not an
/// error). Security findings keep their confidence but can never become
/// auto-fix-safe.
pub fn validate_finding(finding: &mut Finding, ctx: &ValidationContext<'_>) {
    let result = match finding.kind.as_str() {
        "orphaned_code" | "unused_variable" | "unused_export" => {
            let Some(name) = symbol_from_message(&finding.message) else {
                debug!(kind = %finding.kind, "no symbol name in message; skipping validation");
                return;
            };
            let (found, count, exported) = reference_check(ctx, name);
            ValidationResult {
                found_in_codebase: found,
                reference_count: count,
                has_intent_comment: false,
                is_exported: exported,
                details: format!("Found {count} external reference(s)"),
            }
        }
        "empty_catch" => ValidationResult {
            has_intent_comment: intent_comment_near(ctx, finding.line),
            details: "Checked surrounding lines for intent comments".to_string(),
            ..Default::default()
        },
        "duplicate_function" | "cross_file_duplicate" => ValidationResult {
            found_in_codebase: true,
            reference_count: 1,
            details: "Duplicate group corroborated at detection time".to_string(),
            ..Default::default()
        },
        _ => {
            // Deliberate pass-through: confidence stays at the detector's
            // original (uncorroborated) value.
            finding.reasoning = if finding.reasoning.is_empty() {
                "validation not implemented for this finding kind".to_string()
            } else {
                finding.reasoning.clone()
            };
            finding.auto_fix_safe = confidence::auto_fix_safe(finding);
            return;
        }
    };

    if let Some(score) = confidence::score(&finding.kind, &result) {
        let adjusted = (score - edge_case_penalty(ctx)).max(0.0);
        finding.confidence = adjusted;
    }
    finding.validated = true;
    finding.auto_fix_safe = confidence::auto_fix_safe(finding);
    finding.reasoning = confidence::reasoning(
        &finding.kind,
        &result,
        finding.confidence,
        finding.auto_fix_safe,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use vet_foundation::Severity;

    fn single_file_ctx(files: &[(String, String)]) -> ValidationContext<'_> {
        ValidationContext {
            files,
            current_file: files[0].0.as_str(),
            index: None,
        }
    }

    #[test]
    fn unused_variable_with_no_references_scores_high() {
        let files = vec![(
            "main.go".to_string(),
            "package main\nfunc work() {\n\tunused := 1\n}\n".to_string(),
        )];
        let ctx = single_file_ctx(&files);
        let mut finding = Finding::quality(
            "unused_variable",
            Severity::Medium,
            3,
            1,
            "Variable 'unused' is declared but never used",
        );
        validate_finding(&mut finding, &ctx);

        assert!(finding.validated);
        assert!(finding.confidence >= 0.85, "got {}", finding.confidence);
        assert!(finding.auto_fix_safe);
    }

    #[test]
    fn referenced_symbol_zeroes_confidence() {
        let files = vec![
            ("a.go".to_string(), "func helper() {}\n".to_string()),
            ("b.go".to_string(), "func main() { helper() }\n".to_string()),
        ];
        let ctx = single_file_ctx(&files);
        let mut finding = Finding::quality(
            "orphaned_code",
            Severity::Info,
            1,
            0,
            "Function 'helper' is defined but never called",
        );
        validate_finding(&mut finding, &ctx);

        assert_eq!(finding.confidence, 0.0);
        assert!(!finding.auto_fix_safe);
        assert!(finding.reasoning.contains("Referenced"));
    }

    #[test]
    fn intent_comment_suppresses_empty_catch() {
        let files = vec![(
            "app.js".to_string(),
            "try { risky(); } catch (e) {\n  // intentional: polling errors are expected\n}\n"
                .to_string(),
        )];
        let ctx = single_file_ctx(&files);
        let mut finding =
            Finding::quality("empty_catch", Severity::Medium, 1, 0, "Empty catch block");
        validate_finding(&mut finding, &ctx);
        assert_eq!(finding.confidence, 0.0);
    }

    #[test]
    fn unknown_kind_is_pass_through() {
        let files = vec![("a.js".to_string(), String::new())];
        let ctx = single_file_ctx(&files);
        let mut finding = Finding::quality("brand_new_kind", Severity::Low, 1, 0, "whatever")
            .with_confidence(0.62);
        validate_finding(&mut finding, &ctx);

        assert!(!finding.validated);
        assert_eq!(finding.confidence, 0.62);
        assert!(finding
            .reasoning
            .contains("validation not implemented for this finding kind"));
    }

    #[test]
    fn generated_code_penalty_applies() {
        let files = vec![(
            "gen.go".to_string(),
            "// Code generated by protoc. DO NOT EDIT.\nfunc work() {\n\tunused := 1\n}\n"
                .to_string(),
        )];
        let ctx = single_file_ctx(&files);
        let mut finding = Finding::quality(
            "unused_variable",
            Severity::Medium,
            3,
            1,
            "Variable 'unused' is declared but never used",
        );
        validate_finding(&mut finding, &ctx);
        assert!(finding.confidence < 0.85, "got {}", finding.confidence);
        assert!(!finding.auto_fix_safe);
    }
}
