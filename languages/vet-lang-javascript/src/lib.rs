//! JavaScript language support.
//!
//! Uses the shared table-driven detector with one override: async-misuse
//! detection flags promise-returning calls that are neither awaited nor
//! chained inside `async` functions.

use std::sync::Arc;

use tree_sitter::Node;
use vet_foundation::Finding;
use vet_lang_api::{
    LanguageDetector, LanguageMetadata, LanguageSupport, NodeTypeTable,
};
use vet_lang_common::{detect_missing_await, DetectorHooks, TableDetector, TableExtractor};

pub static METADATA: LanguageMetadata = LanguageMetadata {
    name: "javascript",
    aliases: &["js", "jsx"],
    extensions: &["js", "jsx", "mjs", "cjs"],
};

pub static NODE_TYPES: NodeTypeTable = NodeTypeTable {
    function_nodes: &["function_declaration", "generator_function_declaration"],
    method_nodes: &["method_definition"],
    lambda_nodes: &["arrow_function", "function_expression"],
    variable_nodes: &["variable_declarator"],
    assignment_nodes: &["assignment_expression", "augmented_assignment_expression"],
    class_nodes: &["class_declaration"],
    import_nodes: &["import_statement"],
    export_nodes: &["export_statement"],
    call_nodes: &["call_expression"],
    identifier_nodes: &["identifier", "property_identifier", "shorthand_property_identifier"],
    string_nodes: &["string", "template_string"],
    comment_nodes: &["comment"],
    block_nodes: &["statement_block"],
    terminator_nodes: &["return_statement", "throw_statement", "break_statement"],
    catch_nodes: &["catch_clause"],
    parameter_nodes: &["formal_parameters"],
    statement_nodes: &[
        "expression_statement",
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "lexical_declaration",
        "variable_declaration",
        "return_statement",
        "throw_statement",
    ],
};

pub(crate) static HOOKS: DetectorHooks = DetectorHooks {
    sql_sinks: &["query", "execute", "raw"],
    command_sinks: &["exec", "execsync", "execfile", "spawn", "spawnsync"],
    html_sinks: &["render", "send"],
    dom_sinks: &[
        "innerhtml",
        "outerhtml",
        "document.write",
        "document.writeln",
        "insertadjacenthtml",
        "eval(",
    ],
    user_input_markers: &[
        "req.", "request.", "params.", "query.", "body.", "form.", "input.", "user.",
        "process.argv", "location.", "event.",
    ],
    sanitizer_markers: &["validate", "sanitize", "escape", "dompurify", "whitelist"],
    placeholder_markers: &["?", "$1", "$2"],
    interpolation_markers: &["${"],
    promise_hints: &["fetch", ".then", ".catch", "promise", "axios"],
    weak_hash_markers: &["md5", "sha1", "sha-1"],
    secret_markers: &[
        "password", "secret", "api_key", "apikey", "token", "private_key", "privatekey",
        "access_key", "accesskey",
    ],
    http_markers: &["app.get(", "app.post(", "app.use(", "router.", "express(", "listen("],
    sql_remediation: "Use parameterized queries or a query builder instead of template strings",
    command_remediation: "Use spawn with an argument array and validate input",
    xss_remediation: "Use textContent, or sanitize with DOMPurify before inserting HTML",
    crypto_remediation: "Use crypto.subtle.digest or createHash with SHA-256",
};

/// Table detector plus the JS-specific missing-await signal.
struct JsDetector {
    inner: TableDetector,
}

impl JsDetector {
    fn new() -> Self {
        Self {
            inner: TableDetector::new(&NODE_TYPES).with_hooks(HOOKS),
        }
    }
}

impl LanguageDetector for JsDetector {
    fn node_types(&self) -> &'static NodeTypeTable {
        self.inner.node_types()
    }

    fn detect_duplicates(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_duplicates(root, source)
    }

    fn detect_unused_variables(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_unused_variables(root, source)
    }

    fn detect_unreachable(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_unreachable(root, source)
    }

    fn detect_orphaned(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_orphaned(root, source)
    }

    fn detect_empty_catch(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_empty_catch(root, source)
    }

    fn detect_async_misuse(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        detect_missing_await(&NODE_TYPES, self.inner.hooks(), root, source)
    }

    fn detect_sql_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_sql_injection(root, source)
    }

    fn detect_xss(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_xss(root, source)
    }

    fn detect_command_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_command_injection(root, source)
    }

    fn detect_weak_crypto(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_weak_crypto(root, source)
    }

    fn detect_security_middleware(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        self.inner.detect_security_middleware(root, source)
    }
}

/// Build the JavaScript [`LanguageSupport`] for registration.
pub fn support() -> LanguageSupport {
    LanguageSupport {
        metadata: &METADATA,
        grammar: || tree_sitter_javascript::LANGUAGE.into(),
        node_types: &NODE_TYPES,
        detector: Arc::new(JsDetector::new()),
        extractor: Arc::new(TableExtractor::new(&NODE_TYPES, "javascript")),
    }
}
