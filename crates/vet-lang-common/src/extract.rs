//! The table-driven [`LanguageExtractor`] implementation.

use tree_sitter::Node;
use vet_lang_api::{
    FunctionInfo, ImportInfo, LanguageExtractor, NodeTypeTable, ParameterInfo, SymbolInfo,
    SymbolKind,
};

use crate::detect::quality::function_name;
use crate::node_utils::{
    default_visibility, end_line, find_child_of_kinds, first_identifier, node_text,
    preceding_comment, start_column, start_line, VisibilityFn,
};
use crate::traverse;

/// Function/import/symbol extraction driven by a [`NodeTypeTable`].
pub struct TableExtractor {
    table: &'static NodeTypeTable,
    language: &'static str,
    visibility: VisibilityFn,
}

impl TableExtractor {
    pub fn new(table: &'static NodeTypeTable, language: &'static str) -> Self {
        Self {
            table,
            language,
            visibility: default_visibility,
        }
    }

    pub fn with_visibility(mut self, visibility: VisibilityFn) -> Self {
        self.visibility = visibility;
        self
    }

    fn extract_parameters(&self, node: Node<'_>, source: &str) -> Vec<ParameterInfo> {
        let Some(params) = find_child_of_kinds(node, self.table.parameter_nodes) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if self.table.is_comment(param.kind()) {
                continue;
            }
            let name = if self.table.is_identifier(param.kind()) {
                node_text(param, source).to_string()
            } else {
                match first_identifier(self.table, param, 2) {
                    Some(id) => node_text(id, source).to_string(),
                    None => continue,
                }
            };
            let type_name = param
                .child_by_field_name("type")
                .map(|t| node_text(t, source).trim().trim_start_matches(':').trim().to_string())
                .filter(|t| !t.is_empty());
            out.push(ParameterInfo { name, type_name });
        }
        out
    }

    fn extract_return_type(&self, node: Node<'_>, source: &str) -> Option<String> {
        // Grammar field names differ per language; try the common ones.
        for field in ["return_type", "result", "type"] {
            if let Some(ret) = node.child_by_field_name(field) {
                let text = node_text(ret, source).trim().trim_start_matches(':').trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
        None
    }

    fn extract_documentation(&self, node: Node<'_>, source: &str) -> Option<String> {
        if let Some(comment) = preceding_comment(self.table, node, source) {
            return Some(comment);
        }
        // Docstring convention: first statement of the body is a bare string.
        let body = find_child_of_kinds(node, self.table.block_nodes)?;
        let first = body.named_child(0)?;
        let candidate = if self.table.is_string(first.kind()) {
            Some(first)
        } else if first.kind() == "expression_statement" {
            first
                .named_child(0)
                .filter(|c| self.table.is_string(c.kind()))
        } else {
            None
        };
        candidate.map(|string_node| {
            node_text(string_node, source)
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
    }
}

impl LanguageExtractor for TableExtractor {
    fn extract_functions(&self, root: Node<'_>, source: &str) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();
        traverse(root, &mut |node| {
            if !self.table.is_function(node.kind()) {
                return true;
            }
            let Some(name) = function_name(self.table, node, source) else {
                return true;
            };
            functions.push(FunctionInfo {
                visibility: (self.visibility)(&name, node, self.table),
                name,
                language: self.language.to_string(),
                start_line: start_line(node),
                end_line: end_line(node),
                parameters: self.extract_parameters(node, source),
                return_type: self.extract_return_type(node, source),
                code: node_text(node, source).to_string(),
                documentation: self.extract_documentation(node, source),
            });
            true
        });
        functions
    }

    fn extract_imports(&self, root: Node<'_>, source: &str) -> Vec<ImportInfo> {
        let mut imports = Vec::new();
        traverse(root, &mut |node| {
            if !self.table.is_import(node.kind()) {
                return true;
            }
            let mut module = String::new();
            let mut names: Vec<String> = Vec::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                let kind = child.kind();
                if self.table.is_string(kind) && module.is_empty() {
                    module = node_text(child, source)
                        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
                        .to_string();
                } else if kind == "dotted_name" || kind == "relative_import" {
                    if module.is_empty() {
                        module = node_text(child, source).to_string();
                    } else {
                        names.push(node_text(child, source).to_string());
                    }
                } else if kind == "import_clause" {
                    // Named, default, and namespace imports all nest
                    // identifiers at varying depths; collect them all.
                    traverse(child, &mut |n| {
                        if self.table.is_identifier(n.kind()) {
                            names.push(node_text(n, source).to_string());
                        }
                        true
                    });
                } else if self.table.is_identifier(kind) {
                    names.push(node_text(child, source).to_string());
                }
            }
            if !module.is_empty() {
                let is_relative = module.starts_with('.') || module.starts_with("./")
                    || module.starts_with("../");
                imports.push(ImportInfo {
                    module,
                    imported_names: names,
                    is_relative,
                    line: start_line(node),
                });
            }
            // Import statements don't nest.
            false
        });
        imports
    }

    fn extract_symbols(&self, root: Node<'_>, source: &str) -> Vec<SymbolInfo> {
        let mut symbols = Vec::new();
        traverse(root, &mut |node| {
            let kind = node.kind();
            let symbol_kind = if self.table.is_function(kind) {
                Some(SymbolKind::Function)
            } else if self.table.is_class(kind) {
                Some(SymbolKind::Class)
            } else if self.table.is_variable_decl(kind) {
                Some(SymbolKind::Variable)
            } else {
                None
            };
            let Some(symbol_kind) = symbol_kind else {
                return true;
            };
            let name = if symbol_kind == SymbolKind::Variable {
                first_identifier(self.table, node, 3).map(|id| node_text(id, source).to_string())
            } else {
                function_name(self.table, node, source)
            };
            if let Some(name) = name {
                let exported =
                    (self.visibility)(&name, node, self.table).is_externally_visible();
                symbols.push(SymbolInfo {
                    name,
                    kind: symbol_kind,
                    line: start_line(node),
                    column: start_column(node),
                    exported,
                });
            }
            // Nested declarations (closures, inner classes) still matter
            // for reference resolution, so keep descending.
            true
        });
        symbols
    }
}
