//! Per-language pattern lists consumed by the table-driven detector.
//!
//! The defaults are the generic lists; language crates narrow or extend
//! them (e.g. Go adds `exec.Command`, Python adds `os.system`).

/// Security-detection pattern hooks for one language.
#[derive(Debug, Clone, Copy)]
pub struct DetectorHooks {
    /// Call names that execute SQL.
    pub sql_sinks: &'static [&'static str],

    /// Call names that execute shell commands.
    pub command_sinks: &'static [&'static str],

    /// Call names that render HTML/templates.
    pub html_sinks: &'static [&'static str],

    /// DOM properties/calls that interpret HTML.
    pub dom_sinks: &'static [&'static str],

    /// Markers suggesting request/user-controlled data.
    pub user_input_markers: &'static [&'static str],

    /// Markers suggesting input was validated or escaped.
    pub sanitizer_markers: &'static [&'static str],

    /// Parameterized-query placeholders that make a SQL call safe.
    pub placeholder_markers: &'static [&'static str],

    /// String interpolation syntax for this language.
    pub interpolation_markers: &'static [&'static str],

    /// Call-text fragments that suggest a promise/future is involved.
    pub promise_hints: &'static [&'static str],

    /// Broken hash algorithm markers.
    pub weak_hash_markers: &'static [&'static str],

    /// Identifier fragments that suggest a secret.
    pub secret_markers: &'static [&'static str],

    /// Markers that the file defines HTTP handlers/routes.
    pub http_markers: &'static [&'static str],

    /// Remediation strings attached to emitted vulnerabilities.
    pub sql_remediation: &'static str,
    pub command_remediation: &'static str,
    pub xss_remediation: &'static str,
    pub crypto_remediation: &'static str,
}

impl Default for DetectorHooks {
    fn default() -> Self {
        Self {
            sql_sinks: &["query", "queryrow", "exec", "execute", "executemany"],
            command_sinks: &["system", "popen", "exec", "spawn", "command", "call", "run"],
            html_sinks: &["render", "render_template", "render_to_string", "execute", "executetemplate", "template"],
            dom_sinks: &["innerhtml", "outerhtml", "document.write", "document.writeln", "eval("],
            user_input_markers: &[
                "req.", "request.", "params.", "query.", "body.", "form.", "input.", "user.",
                "argv", "user_input", "userinput",
            ],
            sanitizer_markers: &["validate", "sanitize", "escape", "whitelist", "shlex.quote"],
            placeholder_markers: &["?", "$1", "$2"],
            interpolation_markers: &["${", "f\"", "f'", "%s", ".format("],
            promise_hints: &["fetch", ".then", ".catch", "promise"],
            weak_hash_markers: &["md5", "sha1", "sha-1"],
            secret_markers: &[
                "password", "secret", "api_key", "apikey", "token", "private_key", "privatekey",
                "access_key", "accesskey",
            ],
            http_markers: &["listen(", "route", "handler", "endpoint"],
            sql_remediation: "Use parameterized queries instead of string concatenation",
            command_remediation: "Pass arguments as a list and validate or sanitize input",
            xss_remediation: "Escape or sanitize user input before rendering it",
            crypto_remediation: "Use SHA-256 or stronger in place of MD5/SHA-1",
        }
    }
}

impl DetectorHooks {
    /// Case-insensitive containment of any pattern in `text_lower`.
    /// `text_lower` must already be lowercased.
    pub fn matches_any(patterns: &[&str], text_lower: &str) -> bool {
        patterns.iter().any(|p| text_lower.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_cover_common_sinks() {
        let hooks = DetectorHooks::default();
        assert!(DetectorHooks::matches_any(hooks.sql_sinks, "db.query(s)"));
        assert!(DetectorHooks::matches_any(hooks.command_sinks, "os.system(cmd)"));
        assert!(!DetectorHooks::matches_any(hooks.sql_sinks, "println"));
    }
}
