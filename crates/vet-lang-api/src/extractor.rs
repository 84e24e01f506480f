//! The per-language extraction trait.

use tree_sitter::Node;

use crate::{FunctionInfo, ImportInfo, SymbolInfo};

/// Language-specific extraction of functions, imports, and symbols.
///
/// Like detection, extraction is a pure function of (tree, source). The
/// cross-file resolver builds symbol tables and dependency graphs from
/// these outputs.
pub trait LanguageExtractor: Send + Sync {
    /// All function/method definitions with signature and documentation.
    fn extract_functions(&self, root: Node<'_>, source: &str) -> Vec<FunctionInfo>;

    /// One entry per import statement.
    fn extract_imports(&self, root: Node<'_>, source: &str) -> Vec<ImportInfo>;

    /// Declared symbols (functions, classes, variables) with export status.
    fn extract_symbols(&self, root: Node<'_>, source: &str) -> Vec<SymbolInfo>;

    /// The first function whose name matches, if any.
    fn extract_function_by_name(
        &self,
        root: Node<'_>,
        source: &str,
        name: &str,
    ) -> Option<FunctionInfo> {
        self.extract_functions(root, source)
            .into_iter()
            .find(|f| f.name == name)
    }
}
