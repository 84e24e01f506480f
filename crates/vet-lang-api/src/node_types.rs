//! Grammar node kind tables.
//!
//! Each language contributes one table mapping semantic roles ("function
//! declaration", "import", "terminator statement") to the concrete
//! tree-sitter node kinds of its grammar. Detection and extraction code
//! consults the table instead of branching on the language id, which keeps
//! the languages × detectors matrix down to one table per language.

/// Node kinds for one language, grouped by semantic role.
///
/// Empty slices mean the language has no construct in that role (e.g. Go
/// has no catch clauses).
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTypeTable {
    /// Free function declarations/definitions.
    pub function_nodes: &'static [&'static str],

    /// Method declarations/definitions.
    pub method_nodes: &'static [&'static str],

    /// Anonymous function forms (arrow functions, lambdas, closures).
    pub lambda_nodes: &'static [&'static str],

    /// Variable declaration statements.
    pub variable_nodes: &'static [&'static str],

    /// Assignment expressions/statements (re-assignment, not declaration).
    pub assignment_nodes: &'static [&'static str],

    /// Class-like declarations.
    pub class_nodes: &'static [&'static str],

    /// Import statements.
    pub import_nodes: &'static [&'static str],

    /// Export statements (empty for languages without explicit exports).
    pub export_nodes: &'static [&'static str],

    /// Call expressions.
    pub call_nodes: &'static [&'static str],

    /// Identifier-like leaves.
    pub identifier_nodes: &'static [&'static str],

    /// String literal forms.
    pub string_nodes: &'static [&'static str],

    /// Comment forms.
    pub comment_nodes: &'static [&'static str],

    /// Statement blocks / suites.
    pub block_nodes: &'static [&'static str],

    /// Statements after which code in the same block is unreachable
    /// (return / throw / raise / break).
    pub terminator_nodes: &'static [&'static str],

    /// Catch / except clauses.
    pub catch_nodes: &'static [&'static str],

    /// Formal parameter lists.
    pub parameter_nodes: &'static [&'static str],

    /// Statement node kinds, used for unreachable-code checks.
    pub statement_nodes: &'static [&'static str],
}

impl NodeTypeTable {
    pub fn is_function(&self, kind: &str) -> bool {
        self.function_nodes.contains(&kind) || self.method_nodes.contains(&kind)
    }

    pub fn is_function_like(&self, kind: &str) -> bool {
        self.is_function(kind) || self.lambda_nodes.contains(&kind)
    }

    pub fn is_variable_decl(&self, kind: &str) -> bool {
        self.variable_nodes.contains(&kind)
    }

    pub fn is_assignment(&self, kind: &str) -> bool {
        self.assignment_nodes.contains(&kind)
    }

    pub fn is_import(&self, kind: &str) -> bool {
        self.import_nodes.contains(&kind)
    }

    pub fn is_export(&self, kind: &str) -> bool {
        self.export_nodes.contains(&kind)
    }

    pub fn is_call(&self, kind: &str) -> bool {
        self.call_nodes.contains(&kind)
    }

    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifier_nodes.contains(&kind)
    }

    pub fn is_string(&self, kind: &str) -> bool {
        self.string_nodes.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comment_nodes.contains(&kind)
    }

    pub fn is_block(&self, kind: &str) -> bool {
        self.block_nodes.contains(&kind)
    }

    pub fn is_terminator(&self, kind: &str) -> bool {
        self.terminator_nodes.contains(&kind)
    }

    pub fn is_catch(&self, kind: &str) -> bool {
        self.catch_nodes.contains(&kind)
    }

    pub fn is_statement(&self, kind: &str) -> bool {
        self.statement_nodes.contains(&kind)
    }

    pub fn is_class(&self, kind: &str) -> bool {
        self.class_nodes.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_lookups() {
        let table = NodeTypeTable {
            function_nodes: &["function_declaration"],
            method_nodes: &["method_declaration"],
            terminator_nodes: &["return_statement"],
            ..Default::default()
        };
        assert!(table.is_function("function_declaration"));
        assert!(table.is_function("method_declaration"));
        assert!(!table.is_function("call_expression"));
        assert!(table.is_terminator("return_statement"));
        assert!(!table.is_catch("catch_clause"));
    }
}
