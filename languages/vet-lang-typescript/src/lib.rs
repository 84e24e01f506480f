//! TypeScript language support.
//!
//! Shares the JavaScript detection profile (same grammar family, same
//! async-misuse override) with TypeScript's extra declaration forms in the
//! node table. The `tsx` alias routes through the plain TypeScript grammar,
//! mirroring how variant extensions collapse to one canonical id.

use std::sync::Arc;

use tree_sitter::Node;
use vet_foundation::Finding;
use vet_lang_api::{
    LanguageDetector, LanguageMetadata, LanguageSupport, NodeTypeTable,
};
use vet_lang_common::{detect_missing_await, DetectorHooks, TableDetector, TableExtractor};

pub static METADATA: LanguageMetadata = LanguageMetadata {
    name: "typescript",
    aliases: &["ts", "tsx"],
    extensions: &["ts", "tsx", "mts", "cts"],
};

pub static NODE_TYPES: NodeTypeTable = NodeTypeTable {
    function_nodes: &["function_declaration", "generator_function_declaration"],
    method_nodes: &["method_definition"],
    lambda_nodes: &["arrow_function", "function_expression"],
    variable_nodes: &["variable_declarator"],
    assignment_nodes: &["assignment_expression", "augmented_assignment_expression"],
    class_nodes: &[
        "class_declaration",
        "abstract_class_declaration",
        "interface_declaration",
        "enum_declaration",
    ],
    import_nodes: &["import_statement"],
    export_nodes: &["export_statement"],
    call_nodes: &["call_expression"],
    identifier_nodes: &[
        "identifier",
        "property_identifier",
        "shorthand_property_identifier",
        "type_identifier",
    ],
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

static HOOKS: DetectorHooks = DetectorHooks {
    sql_sinks: &["query", "execute", "raw", "$queryraw"],
    command_sinks: &["exec", "execsync", "execfile", "spawn", "spawnsync"],
    html_sinks: &["render", "send"],
    dom_sinks: &[
        "innerhtml",
        "outerhtml",
        "document.write",
        "document.writeln",
        "insertadjacenthtml",
        "dangerouslysetinnerhtml",
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
    sql_remediation: "Use parameterized queries or a typed query builder",
    command_remediation: "Use spawn with an argument array and validate input",
    xss_remediation: "Use textContent, or sanitize with DOMPurify before inserting HTML",
    crypto_remediation: "Use crypto.subtle.digest or createHash with SHA-256",
};

struct TsDetector {
    inner: TableDetector,
}

impl TsDetector {
    fn new() -> Self {
        Self {
            inner: TableDetector::new(&NODE_TYPES).with_hooks(HOOKS),
        }
    }
}

impl LanguageDetector for TsDetector {
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

/// Build the TypeScript [`LanguageSupport`] for registration.
pub fn support() -> LanguageSupport {
    LanguageSupport {
        metadata: &METADATA,
        grammar: || tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        node_types: &NODE_TYPES,
        detector: Arc::new(TsDetector::new()),
        extractor: Arc::new(TableExtractor::new(&NODE_TYPES, "typescript")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use vet_lang_api::{LanguageDetector as _, LanguageExtractor, Visibility};

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .expect("load typescript grammar");
        parser.parse(source, None).expect("parse")
    }

    #[test]
    fn typed_function_extraction() {
        let source = r#"
export function area(width: number, height: number): number {
  return width * height;
}
"#;
        let support = support();
        let tree = parse(source);
        let functions = support.extractor.extract_functions(tree.root_node(), source);

        assert_eq!(functions.len(), 1);
        let area = &functions[0];
        assert_eq!(area.name, "area");
        assert_eq!(area.visibility, Visibility::Exported);
        assert_eq!(area.parameters.len(), 2);
        assert_eq!(area.parameters[0].type_name.as_deref(), Some("number"));
        assert_eq!(area.return_type.as_deref(), Some("number"));
    }

    #[test]
    fn unawaited_promise_in_async_function() {
        let source = r#"
async function sync(): Promise<void> {
  fetch("/api/refresh");
}
"#;
        let support = support();
        let tree = parse(source);
        let findings = support
            .detector
            .detect_async_misuse(tree.root_node(), source);

        assert_eq!(findings.len(), 1, "got {findings:?}");
        assert_eq!(findings[0].kind, "missing_await");
    }

    #[test]
    fn interface_symbols_extracted() {
        let source = "export interface Shape { area(): number; }\n";
        let support = support();
        let tree = parse(source);
        let symbols = support.extractor.extract_symbols(tree.root_node(), source);
        assert!(symbols.iter().any(|s| s.name == "Shape" && s.exported));
    }
}
