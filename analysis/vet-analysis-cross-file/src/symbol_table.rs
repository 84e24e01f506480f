//! Per-file and project-wide symbol tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vet_foundation::{VetError, VetResult};
use vet_lang_api::SymbolKind;

/// A symbol declared in a specific file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,

    /// Declaration line (1-indexed).
    pub line: usize,

    /// Declaration column (0-indexed).
    pub column: usize,

    pub exported: bool,
    pub language: String,
}

/// One occurrence of a name outside its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReference {
    pub name: String,
    pub file: String,

    /// Line of the occurrence (1-indexed).
    pub line: usize,
}

/// Symbols and references across all files of one request.
///
/// Backed by ordered maps so iteration (and therefore finding output) is
/// deterministic. Built once per multi-file request, then discarded.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SymbolTable {
    by_name: BTreeMap<String, Vec<FileSymbol>>,
    by_file: BTreeMap<String, Vec<FileSymbol>>,
    references: BTreeMap<String, Vec<SymbolReference>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, symbol: FileSymbol) -> VetResult<()> {
        if symbol.name.is_empty() {
            return Err(VetError::invalid_request("symbol name must not be empty"));
        }
        self.by_name
            .entry(symbol.name.clone())
            .or_default()
            .push(symbol.clone());
        self.by_file.entry(symbol.file.clone()).or_default().push(symbol);
        Ok(())
    }

    pub fn add_reference(&mut self, reference: SymbolReference) {
        if reference.name.is_empty() {
            return;
        }
        self.references
            .entry(reference.name.clone())
            .or_default()
            .push(reference);
    }

    /// All definitions of a name, across files.
    pub fn symbols(&self, name: &str) -> &[FileSymbol] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All symbols declared in one file, in declaration order.
    pub fn file_symbols(&self, file: &str) -> &[FileSymbol] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn references(&self, name: &str) -> &[SymbolReference] {
        self.references.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn symbol_count(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &String> {
        self.by_file.keys()
    }

    /// Count references to `name` that occur outside `excluding_file` and
    /// away from the declaration line.
    pub fn external_reference_count(&self, name: &str, excluding_file: &str) -> usize {
        self.references(name)
            .iter()
            .filter(|r| r.file != excluding_file)
            .count()
    }

    /// Whether `name` is mentioned anywhere outside `excluding_file`.
    pub fn is_referenced_outside(&self, name: &str, excluding_file: &str) -> bool {
        self.external_reference_count(name, excluding_file) > 0
    }

    /// Exported symbols that no other file references. Sorted by
    /// (file, line) for stable output.
    pub fn find_unused_exports(&self) -> Vec<&FileSymbol> {
        let mut unused: Vec<&FileSymbol> = self
            .by_name
            .values()
            .flatten()
            .filter(|symbol| symbol.exported)
            .filter(|symbol| !self.is_referenced_outside(&symbol.name, &symbol.file))
            .collect();
        unused.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
        unused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str, file: &str, line: usize, exported: bool) -> FileSymbol {
        FileSymbol {
            name: name.into(),
            kind: SymbolKind::Function,
            file: file.into(),
            line,
            column: 0,
            exported,
            language: "go".into(),
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.add_symbol(symbol("", "a.go", 1, false)).is_err());
    }

    #[test]
    fn referenced_export_is_not_unused() {
        let mut table = SymbolTable::new();
        table.add_symbol(symbol("Foo", "a.go", 3, true)).unwrap();
        table.add_symbol(symbol("Bar", "a.go", 9, true)).unwrap();
        table.add_reference(SymbolReference {
            name: "Foo".into(),
            file: "b.go".into(),
            line: 12,
        });

        let unused = table.find_unused_exports();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].name, "Bar");
    }

    #[test]
    fn same_file_references_do_not_count() {
        let mut table = SymbolTable::new();
        table.add_symbol(symbol("Foo", "a.go", 3, true)).unwrap();
        table.add_reference(SymbolReference {
            name: "Foo".into(),
            file: "a.go".into(),
            line: 20,
        });

        assert!(!table.is_referenced_outside("Foo", "a.go"));
        assert_eq!(table.find_unused_exports().len(), 1);
    }

    #[test]
    fn file_symbols_are_per_file() {
        let mut table = SymbolTable::new();
        table.add_symbol(symbol("a", "x.go", 1, false)).unwrap();
        table.add_symbol(symbol("b", "y.go", 1, false)).unwrap();
        assert_eq!(table.file_symbols("x.go").len(), 1);
        assert_eq!(table.file_symbols("missing.go").len(), 0);
        assert_eq!(table.symbol_count(), 2);
    }
}
