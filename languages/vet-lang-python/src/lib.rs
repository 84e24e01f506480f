//! Python language support.
//!
//! Python has no explicit exports; the underscore prefix convention marks
//! private symbols. Async-misuse detection flags bare calls to locally
//! defined coroutines that are neither awaited nor handed to the event
//! loop.

use std::sync::Arc;

use tree_sitter::Node;
use vet_foundation::Finding;
use vet_lang_api::{
    LanguageDetector, LanguageMetadata, LanguageSupport, NodeTypeTable,
};
use vet_lang_common::{detect_unawaited_coroutines, DetectorHooks, TableDetector, TableExtractor};

pub static METADATA: LanguageMetadata = LanguageMetadata {
    name: "python",
    aliases: &["py"],
    extensions: &["py", "pyi"],
};

pub static NODE_TYPES: NodeTypeTable = NodeTypeTable {
    function_nodes: &["function_definition"],
    method_nodes: &[],
    lambda_nodes: &["lambda"],
    variable_nodes: &["assignment"],
    assignment_nodes: &["augmented_assignment"],
    class_nodes: &["class_definition"],
    import_nodes: &["import_statement", "import_from_statement"],
    export_nodes: &[],
    call_nodes: &["call"],
    identifier_nodes: &["identifier"],
    string_nodes: &["string"],
    comment_nodes: &["comment"],
    block_nodes: &["block"],
    terminator_nodes: &["return_statement", "raise_statement", "break_statement"],
    catch_nodes: &["except_clause"],
    parameter_nodes: &["parameters"],
    statement_nodes: &[
        "expression_statement",
        "if_statement",
        "for_statement",
        "while_statement",
        "assignment",
        "return_statement",
        "raise_statement",
    ],
};

static HOOKS: DetectorHooks = DetectorHooks {
    sql_sinks: &["execute", "executemany", "executescript", "raw"],
    command_sinks: &["os.system", "system", "popen", "subprocess.call", "subprocess.run", "subprocess.popen", "check_output"],
    html_sinks: &["render_template_string", "render_template", "render_to_string", "render", "markup"],
    dom_sinks: &[],
    user_input_markers: &[
        "request.", "params.", "form.", "args.", "input(", "sys.argv", "user_input", "userinput",
    ],
    sanitizer_markers: &["validate", "sanitize", "escape", "whitelist", "shlex.quote"],
    placeholder_markers: &["?"],
    interpolation_markers: &["f\"", "f'", ".format(", "% "],
    promise_hints: &[],
    weak_hash_markers: &["md5", "sha1", "sha-1"],
    secret_markers: &[
        "password", "secret", "api_key", "apikey", "token", "private_key", "privatekey",
        "access_key", "accesskey",
    ],
    http_markers: &["@app.route", "@router.", "fastapi", "flask", "add_url_rule"],
    sql_remediation: "Use cursor.execute with a parameter tuple instead of string formatting",
    command_remediation: "Use subprocess.run with a list argument and shell=False",
    xss_remediation: "Rely on template auto-escaping; never mark untrusted content safe",
    crypto_remediation: "Use hashlib.sha256 or hashlib.sha512",
};

struct PyDetector {
    inner: TableDetector,
}

impl PyDetector {
    fn new() -> Self {
        Self {
            inner: TableDetector::new(&NODE_TYPES).with_hooks(HOOKS),
        }
    }
}

impl LanguageDetector for PyDetector {
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
        detect_unawaited_coroutines(&NODE_TYPES, root, source)
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

/// Build the Python [`LanguageSupport`] for registration.
pub fn support() -> LanguageSupport {
    LanguageSupport {
        metadata: &METADATA,
        grammar: || tree_sitter_python::LANGUAGE.into(),
        node_types: &NODE_TYPES,
        detector: Arc::new(PyDetector::new()),
        extractor: Arc::new(TableExtractor::new(&NODE_TYPES, "python")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use vet_lang_api::{LanguageExtractor, SymbolKind, Visibility};

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("load python grammar");
        parser.parse(source, None).expect("parse")
    }

    #[test]
    fn docstring_and_visibility() {
        let source = r#"
def fetch_user(user_id):
    """Load a user by id."""
    return db.get(user_id)

def _internal():
    return None
"#;
        let support = support();
        let tree = parse(source);
        let functions = support.extractor.extract_functions(tree.root_node(), source);

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "fetch_user");
        assert_eq!(functions[0].visibility, Visibility::Public);
        assert!(functions[0]
            .documentation
            .as_deref()
            .unwrap_or("")
            .contains("Load a user"));
        assert_eq!(functions[1].visibility, Visibility::Private);
    }

    #[test]
    fn from_import_extraction() {
        let source = "from os import path\nimport json\nfrom .local import helper\n";
        let support = support();
        let tree = parse(source);
        let imports = support.extractor.extract_imports(tree.root_node(), source);

        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].module, "os");
        assert_eq!(imports[0].imported_names, vec!["path"]);
        assert_eq!(imports[1].module, "json");
        assert!(imports[2].is_relative);
    }

    #[test]
    fn fstring_sql_execute_is_flagged() {
        let source = "cursor.execute(f\"SELECT * FROM users WHERE id = {user_id}\")\n";
        let support = support();
        let tree = parse(source);
        let findings = support
            .detector
            .detect_sql_injection(tree.root_node(), source);

        assert_eq!(findings.len(), 1, "got {findings:?}");
        assert_eq!(findings[0].kind, "sql_injection");
    }

    #[test]
    fn parameter_tuple_execute_is_clean() {
        let source = "cursor.execute(\"SELECT * FROM users WHERE id = ?\", (user_id,))\n";
        let support = support();
        let tree = parse(source);
        let findings = support
            .detector
            .detect_sql_injection(tree.root_node(), source);
        assert!(findings.is_empty(), "got {findings:?}");
    }

    #[test]
    fn except_with_pass_is_empty_catch() {
        let source = "try:\n    risky()\nexcept ValueError:\n    pass\n";
        let support = support();
        let tree = parse(source);
        let findings = support.detector.detect_empty_catch(tree.root_node(), source);

        assert_eq!(findings.len(), 1, "got {findings:?}");
    }

    #[test]
    fn class_symbols() {
        let source = "class Repository:\n    def load(self):\n        return 1\n";
        let support = support();
        let tree = parse(source);
        let symbols = support.extractor.extract_symbols(tree.root_node(), source);

        assert!(symbols
            .iter()
            .any(|s| s.name == "Repository" && s.kind == SymbolKind::Class));
        assert!(symbols
            .iter()
            .any(|s| s.name == "load" && s.kind == SymbolKind::Function));
    }

    #[test]
    fn unawaited_coroutine_flagged() {
        let source = r#"
async def refresh():
    return 1

def trigger():
    refresh()
"#;
        let support = support();
        let tree = parse(source);
        let findings = support
            .detector
            .detect_async_misuse(tree.root_node(), source);

        assert_eq!(findings.len(), 1, "got {findings:?}");
        assert!(findings[0].message.contains("refresh"));
    }
}
