//! Extraction output types.

use serde::{Deserialize, Serialize};

/// Visibility of an extracted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Exported,
}

impl Visibility {
    /// Whether the symbol is reachable from outside its file.
    pub fn is_externally_visible(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::Exported)
    }
}

/// Kind of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Type,
    Constant,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Constant => write!(f, "constant"),
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,

    /// Declared type, when the language has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// Extracted function information.
///
/// Created fresh per analysis call and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub language: String,

    /// Start line (1-indexed).
    pub start_line: usize,

    /// End line (1-indexed).
    pub end_line: usize,

    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    pub visibility: Visibility,

    /// Full function source text.
    pub code: String,

    /// Doc comment / docstring, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// One import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Module path or package name as written.
    pub module: String,

    /// Named imports, when the syntax has them.
    #[serde(default)]
    pub imported_names: Vec<String>,

    /// Whether the path is relative to the importing file.
    pub is_relative: bool,

    /// Line of the import statement (1-indexed).
    pub line: usize,
}

/// A declared symbol, before it is placed in a file's symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,

    /// Declaration line (1-indexed).
    pub line: usize,

    /// Declaration column (0-indexed).
    pub column: usize,

    pub exported: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_reachability() {
        assert!(Visibility::Exported.is_externally_visible());
        assert!(Visibility::Public.is_externally_visible());
        assert!(!Visibility::Private.is_externally_visible());
    }

    #[test]
    fn symbol_kind_display() {
        assert_eq!(SymbolKind::Function.to_string(), "function");
        assert_eq!(SymbolKind::Class.to_string(), "class");
    }
}
