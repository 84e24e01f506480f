//! Generic text fallback.
//!
//! Used when no language support is registered or parsing produced nothing
//! usable. Operates on raw source with case-insensitive keyword/regex
//! heuristics, independent of any tree. Fallback findings are capped at
//! confidence 0.75 and are never auto-fix-safe.
//!
//! Known limitation, kept deliberately: line attribution points at the
//! first line whose text matches the heuristic, which for a multi-line
//! construct may not be the construct's own line.

use once_cell::sync::Lazy;
use regex::Regex;
use vet_foundation::{Finding, SecurityInfo, Severity};

use crate::passes::Pass;

/// Ceiling for every fallback finding.
pub const FALLBACK_MAX_CONFIDENCE: f64 = 0.75;

static SQL_CONCAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(select|insert|update|delete)\s.*("|'|`).*(\+|\$\{|%s|\{)"#)
        .expect("static regex")
});

static COMMAND_SINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(os\.system|subprocess\.|child_process|execsync|exec\.command|popen)\s*\(")
        .expect("static regex")
});

static WEAK_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(md5|sha-?1)\b").expect("static regex"));

static HARDCODED_SECRET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(password|passwd|secret|api_?key|token|private_key)\s*[:=]\s*["'][^"']{4,}["']"#)
        .expect("static regex")
});

static AUTH_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer|authorization|x-api-key)").expect("static regex"));

static DOM_SINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(innerhtml|outerhtml|document\.write)\s*[=(]").expect("static regex")
});

fn capped(mut finding: Finding, confidence: f64) -> Finding {
    finding.confidence = confidence.min(FALLBACK_MAX_CONFIDENCE);
    finding.auto_fix_safe = false;
    finding.reasoning = "Generic text heuristic; no parse tree available".to_string();
    finding
}

fn scan_lines<'s>(
    source: &'s str,
    regex: &Regex,
) -> impl Iterator<Item = (usize, &'s str)> + 's {
    let regex = regex.clone();
    source
        .lines()
        .enumerate()
        .filter(move |(_, line)| regex.is_match(line))
        .map(|(i, line)| (i + 1, line.trim()))
}

/// Run the text heuristics for the requested passes.
pub fn run(source: &str, passes: &[Pass]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for pass in passes {
        match pass {
            Pass::SqlInjection => {
                for (line, text) in scan_lines(source, &SQL_CONCAT) {
                    findings.push(capped(
                        Finding::security(
                            "sql_injection",
                            Severity::Critical,
                            line,
                            0,
                            "Possible SQL built from string concatenation",
                            SecurityInfo {
                                description: "SQL keywords near string concatenation".to_string(),
                                remediation: "Use parameterized queries".to_string(),
                                category: "CWE-89".to_string(),
                            },
                        )
                        .with_code(text.to_string()),
                        0.7,
                    ));
                }
            }
            Pass::CommandInjection => {
                for (line, text) in scan_lines(source, &COMMAND_SINK) {
                    findings.push(capped(
                        Finding::security(
                            "command_injection",
                            Severity::Critical,
                            line,
                            0,
                            "Possible shell execution of untrusted input",
                            SecurityInfo {
                                description: "Shell execution sink in source".to_string(),
                                remediation: "Pass arguments as a list and validate input"
                                    .to_string(),
                                category: "CWE-78".to_string(),
                            },
                        )
                        .with_code(text.to_string()),
                        0.6,
                    ));
                }
            }
            Pass::WeakCrypto => {
                for (line, text) in scan_lines(source, &WEAK_HASH) {
                    findings.push(capped(
                        Finding::security(
                            "insecure_crypto",
                            Severity::High,
                            line,
                            0,
                            "Weak hash algorithm referenced (MD5/SHA-1)",
                            SecurityInfo {
                                description: "MD5 and SHA-1 are broken".to_string(),
                                remediation: "Use SHA-256 or stronger".to_string(),
                                category: "CWE-327".to_string(),
                            },
                        )
                        .with_code(text.to_string()),
                        0.7,
                    ));
                }
                for (line, text) in scan_lines(source, &HARDCODED_SECRET) {
                    findings.push(capped(
                        Finding::security(
                            "hardcoded_secret",
                            Severity::Critical,
                            line,
                            0,
                            "Possible hardcoded secret",
                            SecurityInfo {
                                description: "Secret-like assignment to a string literal"
                                    .to_string(),
                                remediation: "Load secrets from the environment".to_string(),
                                category: "CWE-798".to_string(),
                            },
                        )
                        .with_code(text.to_string()),
                        0.7,
                    ));
                }
            }
            Pass::Xss => {
                for (line, text) in scan_lines(source, &DOM_SINK) {
                    findings.push(capped(
                        Finding::security(
                            "xss",
                            Severity::High,
                            line,
                            0,
                            "Possible HTML-interpreting sink",
                            SecurityInfo {
                                description: "DOM sink that interprets HTML".to_string(),
                                remediation: "Use textContent or sanitize first".to_string(),
                                category: "CWE-79".to_string(),
                            },
                        )
                        .with_code(text.to_string()),
                        0.6,
                    ));
                }
            }
            Pass::SecurityMiddleware => {
                if let Some((line, text)) = scan_lines(source, &AUTH_HEADER).next() {
                    findings.push(capped(
                        Finding::quality(
                            "jwt_middleware",
                            Severity::Info,
                            line,
                            0,
                            "Authentication header handling detected",
                        )
                        .with_code(text.to_string()),
                        0.6,
                    ));
                }
            }
            // Structural passes need a tree; the fallback has nothing to say.
            _ => {}
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_concatenation_found_without_a_parser() {
        let source = "query = \"SELECT * FROM users WHERE id=\" + user_id\n";
        let findings = run(source, Pass::single_file());
        assert!(findings.iter().any(|f| f.kind == "sql_injection"));
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        let source = "token = \"abcd1234secret\"\nhash = md5(data)\n";
        let findings = run(source, Pass::single_file());
        assert!(!findings.is_empty());
        for finding in &findings {
            assert!(finding.confidence <= FALLBACK_MAX_CONFIDENCE);
            assert!(!finding.auto_fix_safe);
        }
    }

    #[test]
    fn structural_passes_produce_nothing() {
        let source = "func a() {}\nfunc a() {}\n";
        let findings = run(source, &[Pass::Duplicates, Pass::UnusedVariables]);
        assert!(findings.is_empty());
    }

    #[test]
    fn auth_header_detected_once() {
        let source = "if (req.headers.authorization.startsWith('Bearer ')) {}\n";
        let findings = run(source, &[Pass::SecurityMiddleware]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "jwt_middleware");
    }
}
