//! Security detection: SQL injection, XSS, command injection, weak crypto
//! and hardcoded secrets, security-middleware classification.
//!
//! Matching is pattern-based over call/assignment nodes, so a sink name
//! appearing purely inside a string literal or comment never fires: those
//! are not call nodes. The engine's regex fallback has no such guarantee,
//! which is one reason fallback confidence is capped.

use std::collections::BTreeSet;

use tree_sitter::Node;
use vet_foundation::{Finding, SecurityInfo, Severity};
use vet_lang_api::NodeTypeTable;

use crate::node_utils::{callee_name, end_line, node_text, start_column, start_line};
use crate::{traverse, DetectorHooks};

const SQL_KEYWORDS: &[&str] = &["select", "insert", "update", "delete", "where", "from"];

fn security_finding(
    kind: &str,
    severity: Severity,
    node: Node<'_>,
    source: &str,
    message: String,
    description: &str,
    remediation: &str,
    category: &str,
    confidence: f64,
) -> Finding {
    Finding::security(
        kind,
        severity,
        start_line(node),
        start_column(node),
        message,
        SecurityInfo {
            description: description.to_string(),
            remediation: remediation.to_string(),
            category: category.to_string(),
        },
    )
    .with_span(end_line(node), 0)
    .with_code(node_text(node, source).to_string())
    .with_confidence(confidence)
}

fn has_string_building(snippet: &str, hooks: &DetectorHooks) -> bool {
    let concatenated = snippet.contains('+')
        && (snippet.contains('"') || snippet.contains('\'') || snippet.contains('`'));
    concatenated || DetectorHooks::matches_any(hooks.interpolation_markers, snippet)
}

fn is_parameterized(snippet: &str, hooks: &DetectorHooks) -> bool {
    hooks.placeholder_markers.iter().any(|p| snippet.contains(p))
}

/// SQL executed through a known sink with a query built by concatenation
/// or interpolation rather than parameters.
pub(crate) fn detect_sql_injection(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        let kind = node.kind();
        if table.is_call(kind) {
            let snippet = node_text(node, source);
            let snippet_lower = snippet.to_ascii_lowercase();
            let callee = callee_name(node, source).to_ascii_lowercase();

            if !DetectorHooks::matches_any(hooks.sql_sinks, &callee) {
                return true;
            }
            if is_parameterized(snippet, hooks) {
                return true;
            }
            let sql_context = DetectorHooks::matches_any(SQL_KEYWORDS, &snippet_lower)
                || callee.contains("query")
                || callee.contains("sql");
            if sql_context && has_string_building(snippet, hooks) {
                findings.push(security_finding(
                    "sql_injection",
                    Severity::Critical,
                    node,
                    source,
                    format!("Potential SQL injection in '{callee}': query built from string concatenation"),
                    "SQL query constructed from unparameterized user input",
                    hooks.sql_remediation,
                    "CWE-89",
                    0.9,
                ));
            }
        } else if table.is_variable_decl(kind) || table.is_assignment(kind) {
            let snippet = node_text(node, source);
            if is_parameterized(snippet, hooks) {
                return true;
            }
            let snippet_lower = snippet.to_ascii_lowercase();
            let names_query =
                snippet_lower.contains("query") || snippet_lower.contains("sql");
            if names_query
                && snippet.contains('+')
                && DetectorHooks::matches_any(SQL_KEYWORDS, &snippet_lower)
            {
                findings.push(security_finding(
                    "sql_injection",
                    Severity::Critical,
                    node,
                    source,
                    "Potential SQL injection: query variable built from string concatenation".to_string(),
                    "SQL query variable constructed from unparameterized user input",
                    hooks.sql_remediation,
                    "CWE-89",
                    0.88,
                ));
            }
        }
        true
    });
    findings
}

/// User-controlled data reaching a DOM or template sink without a
/// sanitizer in sight.
pub(crate) fn detect_xss(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        let kind = node.kind();
        let is_call = table.is_call(kind);
        if !is_call && !table.is_assignment(kind) {
            return true;
        }
        let snippet = node_text(node, source);
        let snippet_lower = snippet.to_ascii_lowercase();
        if DetectorHooks::matches_any(hooks.sanitizer_markers, &snippet_lower) {
            return true;
        }

        let dom_sink = DetectorHooks::matches_any(hooks.dom_sinks, &snippet_lower);
        let template_sink = is_call
            && DetectorHooks::matches_any(
                hooks.html_sinks,
                &callee_name(node, source).to_ascii_lowercase(),
            );
        if !dom_sink && !template_sink {
            return true;
        }
        if !DetectorHooks::matches_any(hooks.user_input_markers, &snippet_lower) {
            return true;
        }

        let (message, confidence) = if dom_sink {
            (
                "Potential XSS: user input flows into an HTML-interpreting DOM sink".to_string(),
                0.9,
            )
        } else {
            (
                "Potential XSS: unescaped user input rendered into a template".to_string(),
                0.85,
            )
        };
        findings.push(security_finding(
            "xss",
            Severity::High,
            node,
            source,
            message,
            "User input inserted into HTML output without escaping",
            hooks.xss_remediation,
            "CWE-79",
            confidence,
        ));
        // Don't also report nested call nodes for the same expression.
        false
    });
    findings
}

/// User-controlled data reaching a shell-execution sink.
pub(crate) fn detect_command_injection(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        if !table.is_call(node.kind()) {
            return true;
        }
        let snippet = node_text(node, source);
        let snippet_lower = snippet.to_ascii_lowercase();
        let callee = callee_name(node, source).to_ascii_lowercase();

        if !DetectorHooks::matches_any(hooks.command_sinks, &callee) {
            return true;
        }
        if DetectorHooks::matches_any(hooks.sanitizer_markers, &snippet_lower) {
            return true;
        }
        let tainted = DetectorHooks::matches_any(hooks.user_input_markers, &snippet_lower)
            || snippet_lower.contains("shell=true")
            || has_string_building(snippet, hooks);
        if tainted {
            findings.push(security_finding(
                "command_injection",
                Severity::Critical,
                node,
                source,
                format!("Potential command injection in '{callee}': user input in shell command"),
                "Shell command assembled from unvalidated user input",
                hooks.command_remediation,
                "CWE-78",
                0.9,
            ));
            return false;
        }
        true
    });
    findings
}

/// Broken hash algorithms plus hardcoded secrets. One finding per line.
pub(crate) fn detect_weak_crypto(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut reported_lines: BTreeSet<usize> = BTreeSet::new();

    traverse(root, &mut |node| {
        let kind = node.kind();
        let is_relevant = table.is_call(kind) || table.is_import(kind);
        if is_relevant {
            let snippet_lower = node_text(node, source).to_ascii_lowercase();
            if DetectorHooks::matches_any(hooks.weak_hash_markers, &snippet_lower) {
                let line = start_line(node);
                if reported_lines.insert(line) {
                    findings.push(security_finding(
                        "insecure_crypto",
                        Severity::High,
                        node,
                        source,
                        "Insecure hash algorithm (MD5/SHA-1) in use".to_string(),
                        "MD5 and SHA-1 are cryptographically broken",
                        hooks.crypto_remediation,
                        "CWE-327",
                        0.95,
                    ));
                }
                return false;
            }
        }

        if table.is_variable_decl(kind) || table.is_assignment(kind) {
            let snippet = node_text(node, source);
            let snippet_lower = snippet.to_ascii_lowercase();
            let named_like_secret =
                DetectorHooks::matches_any(hooks.secret_markers, &snippet_lower);
            let assigns_literal = snippet.contains('=')
                && (snippet.contains('"') || snippet.contains('\''))
                && !snippet_lower.contains("env")
                && !snippet_lower.contains("getenv")
                && !snippet.contains("\"\"")
                && !snippet.contains("''");
            if named_like_secret && assigns_literal {
                let line = start_line(node);
                if reported_lines.insert(line) {
                    findings.push(security_finding(
                        "hardcoded_secret",
                        Severity::Critical,
                        node,
                        source,
                        "Hardcoded secret or credential in source".to_string(),
                        "Secrets must not be committed to source code",
                        "Load secrets from the environment or a secret manager",
                        "CWE-798",
                        0.9,
                    ));
                }
                return false;
            }
        }
        true
    });
    findings
}

struct MiddlewareClass {
    kind: &'static str,
    label: &'static str,
    is_auth: bool,
    matches: fn(&str) -> bool,
}

const MIDDLEWARE_CLASSES: &[MiddlewareClass] = &[
    MiddlewareClass {
        kind: "jwt_middleware",
        label: "JWT/Bearer authentication",
        is_auth: true,
        matches: |text| text.contains("jwt") || text.contains("bearer"),
    },
    MiddlewareClass {
        kind: "apikey_middleware",
        label: "API key authentication",
        is_auth: true,
        matches: |text| {
            text.contains("api_key") || text.contains("apikey") || text.contains("x-api-key")
        },
    },
    MiddlewareClass {
        kind: "oauth_middleware",
        label: "OAuth authentication",
        is_auth: true,
        matches: |text| text.contains("oauth"),
    },
    MiddlewareClass {
        kind: "rbac_middleware",
        label: "Role-based access control",
        is_auth: false,
        matches: |text| {
            text.contains("rbac") || (text.contains("role") && text.contains("permission"))
        },
    },
    MiddlewareClass {
        kind: "ratelimit_middleware",
        label: "Rate limiting",
        is_auth: false,
        matches: |text| {
            text.contains("ratelimit") || text.contains("rate_limit") || text.contains("throttle")
        },
    },
    MiddlewareClass {
        kind: "cors_middleware",
        label: "CORS handling",
        is_auth: false,
        matches: |text| text.contains("cors"),
    },
];

/// Classify security middleware present in the source, and flag the file
/// when HTTP handlers exist with no recognizable auth middleware at all.
pub(crate) fn detect_security_middleware(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut auth_present = false;

    traverse(root, &mut |node| {
        if !table.is_function_like(node.kind()) {
            return true;
        }
        let name = crate::detect::quality::function_name(table, node, source).unwrap_or_default();
        let haystack = format!(
            "{} {}",
            name.to_ascii_lowercase(),
            node_text(node, source).to_ascii_lowercase()
        );
        for class in MIDDLEWARE_CLASSES {
            if (class.matches)(&haystack) {
                auth_present |= class.is_auth;
                let mut finding = Finding::quality(
                    class.kind,
                    Severity::Info,
                    start_line(node),
                    start_column(node),
                    if name.is_empty() {
                        format!("{} middleware detected", class.label)
                    } else {
                        format!("{} middleware detected: '{}'", class.label, name)
                    },
                )
                .with_confidence(0.85);
                finding.reasoning = "Security middleware pattern matched".to_string();
                findings.push(finding);
            }
        }
        // A middleware function's nested closures would re-match the same
        // text; one classification per top-level function is enough.
        false
    });

    let source_lower = source.to_ascii_lowercase();
    let serves_http = DetectorHooks::matches_any(hooks.http_markers, &source_lower);
    if serves_http && !auth_present {
        findings.push(
            Finding::security(
                "missing_security_middleware",
                Severity::Medium,
                1,
                0,
                "HTTP handlers present but no authentication middleware detected",
                SecurityInfo {
                    description: "Endpoints appear to be served without an auth layer".to_string(),
                    remediation: "Add authentication middleware in front of the handlers"
                        .to_string(),
                    category: "CWE-306".to_string(),
                },
            )
            .with_confidence(0.6),
        );
    }
    findings
}
