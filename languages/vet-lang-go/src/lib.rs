//! Go language support: metadata, node kind table, grammar handle, and the
//! uppercase-means-exported visibility rule. Detection and extraction are
//! the shared table-driven implementations; Go adds no async-misuse signal
//! (the category only has teeth in await-capable languages).

use std::sync::Arc;

use tree_sitter::Node;
use vet_lang_api::{LanguageMetadata, LanguageSupport, NodeTypeTable, Visibility};
use vet_lang_common::{TableDetector, TableExtractor};

pub static METADATA: LanguageMetadata = LanguageMetadata {
    name: "go",
    aliases: &["golang"],
    extensions: &["go"],
};

pub static NODE_TYPES: NodeTypeTable = NodeTypeTable {
    function_nodes: &["function_declaration"],
    method_nodes: &["method_declaration"],
    lambda_nodes: &["func_literal"],
    variable_nodes: &["short_var_declaration", "var_declaration", "const_declaration"],
    assignment_nodes: &["assignment_statement"],
    class_nodes: &["type_declaration"],
    import_nodes: &["import_spec"],
    export_nodes: &[],
    call_nodes: &["call_expression"],
    identifier_nodes: &["identifier", "field_identifier", "type_identifier"],
    string_nodes: &["interpreted_string_literal", "raw_string_literal"],
    comment_nodes: &["comment"],
    block_nodes: &["block"],
    terminator_nodes: &["return_statement", "break_statement"],
    catch_nodes: &[],
    parameter_nodes: &["parameter_list"],
    statement_nodes: &[
        "expression_statement",
        "if_statement",
        "for_statement",
        "short_var_declaration",
        "var_declaration",
        "assignment_statement",
        "call_expression",
        "return_statement",
        "go_statement",
        "defer_statement",
    ],
};

/// Go visibility: uppercase first rune is exported, everything else is
/// package-private.
fn go_visibility(name: &str, _node: Node<'_>, _table: &NodeTypeTable) -> Visibility {
    match name.chars().next() {
        Some(first) if first.is_uppercase() => Visibility::Exported,
        _ => Visibility::Private,
    }
}

/// Build the Go [`LanguageSupport`] for registration.
pub fn support() -> LanguageSupport {
    LanguageSupport {
        metadata: &METADATA,
        grammar: || tree_sitter_go::LANGUAGE.into(),
        node_types: &NODE_TYPES,
        detector: Arc::new(TableDetector::new(&NODE_TYPES).with_visibility(go_visibility)),
        extractor: Arc::new(TableExtractor::new(&NODE_TYPES, "go").with_visibility(go_visibility)),
    }
}
