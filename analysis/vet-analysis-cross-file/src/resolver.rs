//! Builds the project index from per-file extraction output and answers
//! the cross-file questions detectors need.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;
use vet_foundation::{Finding, FixKind, Severity};
use vet_lang_api::{FunctionInfo, ImportInfo, SymbolInfo};
use vet_lang_common::normalized_body_hash;

use crate::{DependencyGraph, FileProvider, FileSymbol, SymbolReference, SymbolTable};

/// Extraction output for one file, produced by the engine with the
/// language extractors before the resolver runs.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: String,
    pub language: String,
    pub symbols: Vec<SymbolInfo>,
    pub imports: Vec<ImportInfo>,

    /// Every identifier occurrence in the file, with its line.
    pub identifiers: Vec<(String, usize)>,

    pub functions: Vec<FunctionInfo>,
}

/// The symbol table and dependency graph for one multi-file request.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    pub symbols: SymbolTable,
    pub graph: DependencyGraph,
}

impl ProjectIndex {
    /// Whether `name` is referenced from any file other than
    /// `excluding_file`.
    pub fn is_referenced(&self, name: &str, excluding_file: &str) -> bool {
        self.symbols.is_referenced_outside(name, excluding_file)
    }

    /// Exported symbols nobody else references, as findings.
    pub fn unused_export_findings(&self) -> Vec<Finding> {
        self.symbols
            .find_unused_exports()
            .into_iter()
            .map(|symbol| {
                let mut finding = Finding::quality(
                    "unused_export",
                    Severity::Medium,
                    symbol.line,
                    symbol.column,
                    format!(
                        "Exported {} '{}' is never used outside {}",
                        symbol.kind, symbol.name, symbol.file
                    ),
                )
                .with_suggestion(format!(
                    "Remove the export or delete '{}' if it is dead",
                    symbol.name
                ))
                .with_confidence(0.9);
                finding.fix_kind = Some(FixKind::Delete);
                finding.reasoning = "No external references found in the request".to_string();
                finding.file = Some(symbol.file.clone());
                finding
            })
            .collect()
    }

    /// Names imported via resolved relative imports that the target file
    /// never declares.
    pub fn import_mismatch_findings(&self, records: &[FileRecord]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for record in records {
            for import in &record.imports {
                if !import.is_relative {
                    continue;
                }
                // Only check imports we managed to resolve to a file in
                // the request; anything else might legitimately live in
                // files we can't see.
                let targets = self.graph.dependencies_of(&record.path);
                if targets.is_empty() {
                    continue;
                }
                for name in &import.imported_names {
                    let defined_somewhere = self
                        .symbols
                        .symbols(name)
                        .iter()
                        .any(|s| targets.contains(&s.file));
                    if !defined_somewhere && !self.symbols.symbols(name).is_empty() {
                        continue; // defined elsewhere; path resolution was just fuzzy
                    }
                    if !defined_somewhere {
                        let mut finding = Finding::quality(
                            "undefined_reference",
                            Severity::High,
                            import.line,
                            0,
                            format!(
                                "'{}' is imported from a project file that does not define it",
                                name
                            ),
                        )
                        .with_suggestion(format!(
                            "Export '{}' from the target module or remove the import",
                            name
                        ))
                        .with_confidence(0.95);
                        finding.file = Some(record.path.clone());
                        findings.push(finding);
                    }
                }
            }
        }
        findings
    }

    /// Functions with identical normalized bodies in different files.
    pub fn cross_file_duplicate_findings(&self, records: &[FileRecord]) -> Vec<Finding> {
        struct Member {
            name: String,
            file: String,
            line: usize,
        }

        let mut order: Vec<u64> = Vec::new();
        let mut groups: FxHashMap<u64, Vec<Member>> = FxHashMap::default();
        for record in records {
            for function in &record.functions {
                let hash = normalized_body_hash(&function.code);
                if function.code.trim().len() < 24 {
                    continue;
                }
                let entry = groups.entry(hash).or_insert_with(|| {
                    order.push(hash);
                    Vec::new()
                });
                entry.push(Member {
                    name: function.name.clone(),
                    file: record.path.clone(),
                    line: function.start_line,
                });
            }
        }

        let mut findings = Vec::new();
        for hash in order {
            let members = &groups[&hash];
            if members.len() < 2 {
                continue;
            }
            let distinct_files: std::collections::BTreeSet<&str> =
                members.iter().map(|m| m.file.as_str()).collect();
            if distinct_files.len() < 2 {
                continue; // same-file duplicates are the single-file pass's job
            }
            let locations: Vec<String> = members
                .iter()
                .map(|m| format!("'{}' ({}:{})", m.name, m.file, m.line))
                .collect();
            let first = &members[0];
            let mut finding = Finding::quality(
                "cross_file_duplicate",
                Severity::Medium,
                first.line,
                0,
                format!(
                    "Function duplicated across files: {}",
                    locations.join(", ")
                ),
            )
            .with_suggestion("Consolidate the copies into one shared implementation")
            .with_confidence(0.8);
            finding.fix_kind = Some(FixKind::Refactor);
            finding.file = Some(first.file.clone());
            findings.push(finding);
        }
        findings
    }

    /// Circular dependency chains, one finding each.
    pub fn circular_dependency_findings(&self) -> Vec<Finding> {
        self.graph
            .find_cycles()
            .into_iter()
            .map(|cycle| {
                let mut finding = Finding::quality(
                    "circular_dependency",
                    Severity::High,
                    1,
                    0,
                    format!("Circular dependency: {}", cycle.join(" -> ")),
                )
                .with_suggestion("Break the cycle by extracting the shared pieces")
                .with_confidence(1.0);
                finding.fix_kind = Some(FixKind::Refactor);
                finding.reasoning = "Import graph contains a strongly connected component".to_string();
                finding.file = cycle.first().cloned();
                finding
            })
            .collect()
    }
}

/// Build the symbol table and dependency graph in one pass over the
/// supplied records.
pub fn build_index(records: &[FileRecord], provider: &dyn FileProvider) -> ProjectIndex {
    let mut index = ProjectIndex::default();
    let known: BTreeMap<&str, &FileRecord> =
        records.iter().map(|r| (r.path.as_str(), r)).collect();

    for record in records {
        index.graph.add_file(&record.path);

        for symbol in &record.symbols {
            // Extraction already validated names; an empty one here is a
            // bug worth surfacing in debug logs, not a request failure.
            if index
                .symbols
                .add_symbol(FileSymbol {
                    name: symbol.name.clone(),
                    kind: symbol.kind,
                    file: record.path.clone(),
                    line: symbol.line,
                    column: symbol.column,
                    exported: symbol.exported,
                    language: record.language.clone(),
                })
                .is_err()
            {
                debug!(file = %record.path, "skipped symbol with empty name");
            }
        }

        for (name, line) in &record.identifiers {
            index.symbols.add_reference(SymbolReference {
                name: name.clone(),
                file: record.path.clone(),
                line: *line,
            });
        }

        for import in &record.imports {
            match resolve_import(&record.path, import, &known, provider) {
                Some(target) => index.graph.add_edge(&record.path, &target, import.line),
                None => index.graph.add_external(&record.path, &import.module),
            }
        }
    }

    debug!(
        files = index.graph.file_count(),
        symbols = index.symbols.symbol_count(),
        edges = index.graph.edge_count(),
        "built project index"
    );
    index
}

/// Candidate extensions tried when an import path has none.
const EXTENSION_CANDIDATES: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "py", "go"];

fn normalize(path: PathBuf) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            other => parts.push(other.as_os_str().to_string_lossy().to_string()),
        }
    }
    parts.join("/")
}

/// Resolve a relative import against the importing file's directory,
/// preferring files in the request, then the provider. External package
/// imports resolve to `None`.
fn resolve_import(
    from: &str,
    import: &ImportInfo,
    known: &BTreeMap<&str, &FileRecord>,
    provider: &dyn FileProvider,
) -> Option<String> {
    if !import.is_relative {
        return None;
    }
    let base = Path::new(from).parent().unwrap_or_else(|| Path::new(""));

    // Python spells relative imports with dots: ".sibling", "..pkg.mod".
    let relative_path = if import.module.starts_with('.') && !import.module.starts_with("./")
        && !import.module.starts_with("../")
    {
        let dots = import.module.chars().take_while(|&c| c == '.').count();
        let rest = import.module[dots..].replace('.', "/");
        let mut prefix = String::new();
        for _ in 1..dots {
            prefix.push_str("../");
        }
        format!("{prefix}{rest}")
    } else {
        import.module.clone()
    };

    let joined = normalize(base.join(&relative_path));
    let mut candidates: Vec<String> = vec![joined.clone()];
    if Path::new(&joined).extension().is_none() {
        for ext in EXTENSION_CANDIDATES {
            candidates.push(format!("{joined}.{ext}"));
        }
        candidates.push(format!("{joined}/index.ts"));
        candidates.push(format!("{joined}/index.js"));
        candidates.push(format!("{joined}/__init__.py"));
    }

    candidates
        .iter()
        .find(|c| known.contains_key(c.as_str()))
        .cloned()
        .or_else(|| {
            candidates
                .iter()
                .find(|c| provider.exists(Path::new(c)))
                .cloned()
        })
}
