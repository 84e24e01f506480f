//! Multi-file analysis: bounded per-file fan-out, cross-file resolution,
//! and validation of every candidate finding against the project index.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use vet_analysis_cross_file::{build_index, FileProvider, FileRecord, NullFileProvider, ProjectIndex};
use vet_analysis_cross_file::{DependencyGraph, SymbolTable};
use vet_foundation::{
    AnalysisStats, AnalysisWarning, CancelFlag, Finding, VetResult, WarningKind,
};

use crate::analyze::{finalize_findings, run_single_file, Analyzer};
use crate::languages::detect_language;
use crate::passes::{resolve_passes, Pass};
use crate::validate::{validate_finding, ValidationContext};

/// One file of a multi-file request.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,

    /// Explicit language id; when `None` the engine resolves it from the
    /// file extension or content heuristics.
    pub language: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Options for a multi-file run.
#[derive(Clone)]
pub struct MultiFileOptions {
    /// Pass allow-list shared by the per-file and cross-file stages.
    pub passes: Vec<String>,

    /// Observed at file boundaries and between detection modules.
    pub cancel: CancelFlag,

    /// Backs relative-import resolution for files outside the request.
    pub provider: Arc<dyn FileProvider>,
}

impl Default for MultiFileOptions {
    fn default() -> Self {
        Self {
            passes: Vec::new(),
            cancel: CancelFlag::new(),
            provider: Arc::new(NullFileProvider),
        }
    }
}

/// Result of a multi-file analysis.
pub struct MultiFileAnalysis {
    pub index: ProjectIndex,
    pub findings: Vec<Finding>,
    pub stats: AnalysisStats,
}

impl MultiFileAnalysis {
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.index.symbols
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.index.graph
    }
}

enum FileOutcome {
    Analyzed {
        findings: Vec<Finding>,
        stats: AnalysisStats,
        record: Option<FileRecord>,
    },
    Skipped(AnalysisWarning),
}

impl Analyzer {
    /// Analyze several files together. Empty input yields empty results,
    /// not an error.
    pub async fn analyze_multi_file(&self, files: Vec<SourceFile>) -> VetResult<MultiFileAnalysis> {
        self.analyze_multi_file_with(files, MultiFileOptions::default())
            .await
    }

    pub async fn analyze_multi_file_with(
        &self,
        files: Vec<SourceFile>,
        options: MultiFileOptions,
    ) -> VetResult<MultiFileAnalysis> {
        if files.is_empty() {
            return Ok(MultiFileAnalysis {
                index: ProjectIndex::default(),
                findings: Vec::new(),
                stats: AnalysisStats::default(),
            });
        }

        let worker_limit = self.config().max_workers.max(1);
        info!(files = files.len(), workers = worker_limit, "multi-file analysis start");

        let tasks = files.iter().enumerate().map(|(index, file)| {
            let registry = Arc::clone(self.registry());
            let config = self.config().clone();
            let cancel = options.cancel.clone();
            let passes = options.passes.clone();
            let file = file.clone();
            async move {
                let outcome = tokio::task::spawn_blocking(move || {
                    process_file(&registry, &config, &file, &passes, &cancel)
                })
                .await
                .unwrap_or_else(|join_error| {
                    FileOutcome::Skipped(AnalysisWarning::new(
                        WarningKind::ModuleFailed,
                        format!("worker task failed: {join_error}"),
                    ))
                });
                (index, outcome)
            }
        });

        let mut outcomes: Vec<(usize, FileOutcome)> = stream::iter(tasks)
            .buffer_unordered(worker_limit)
            .collect()
            .await;
        // Join order is nondeterministic; output order must not be.
        outcomes.sort_by_key(|(index, _)| *index);

        let mut stats = AnalysisStats::default();
        let mut findings: Vec<Finding> = Vec::new();
        let mut records: Vec<FileRecord> = Vec::new();
        for ((_, outcome), file) in outcomes.into_iter().zip(files.iter()) {
            match outcome {
                FileOutcome::Analyzed {
                    findings: mut file_findings,
                    stats: file_stats,
                    record,
                } => {
                    for finding in &mut file_findings {
                        finding.file = Some(file.path.clone());
                    }
                    findings.append(&mut file_findings);
                    stats.merge(file_stats);
                    if let Some(record) = record {
                        records.push(record);
                    }
                }
                FileOutcome::Skipped(warning) => stats.warn(warning),
            }
        }

        if options.cancel.is_cancelled() {
            stats.warn(AnalysisWarning::new(
                WarningKind::Cancelled,
                "request cancelled; results cover completed files only",
            ));
        }

        let index = build_index(&records, options.provider.as_ref());

        let cross_passes = resolve_passes(&options.passes, Pass::cross_file());
        for pass in cross_passes {
            if options.cancel.is_cancelled() {
                break;
            }
            match pass {
                Pass::UnusedExports => {
                    findings.extend(index.unused_export_findings());
                    findings.extend(index.import_mismatch_findings(&records));
                }
                Pass::CrossFileDuplicates => {
                    findings.extend(index.cross_file_duplicate_findings(&records));
                }
                Pass::CircularDependencies => {
                    findings.extend(index.circular_dependency_findings());
                }
                _ => {}
            }
        }

        let contents: Vec<(String, String)> = files
            .iter()
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect();
        for finding in &mut findings {
            let current = finding
                .file
                .clone()
                .unwrap_or_else(|| contents[0].0.clone());
            let ctx = ValidationContext {
                files: &contents,
                current_file: &current,
                index: Some(&index),
            };
            validate_finding(finding, &ctx);
            finding.clamp_confidence();
        }
        finalize_findings(&mut findings, self.config().min_confidence);

        info!(
            findings = findings.len(),
            symbols = index.symbols.symbol_count(),
            edges = index.graph.edge_count(),
            "multi-file analysis complete"
        );
        Ok(MultiFileAnalysis {
            index,
            findings,
            stats,
        })
    }
}

fn process_file(
    registry: &Arc<vet_lang_api::SupportRegistry>,
    config: &crate::analyze::EngineConfig,
    file: &SourceFile,
    passes: &[String],
    cancel: &CancelFlag,
) -> FileOutcome {
    if cancel.is_cancelled() {
        return FileOutcome::Skipped(AnalysisWarning::for_file(
            WarningKind::Cancelled,
            &file.path,
            "cancelled before analysis",
        ));
    }

    let language = file
        .language
        .clone()
        .or_else(|| detect_language(registry, &file.content, Some(&file.path)));
    let Some(language) = language else {
        warn!(file = %file.path, "no resolvable language; skipping file");
        return FileOutcome::Skipped(AnalysisWarning::for_file(
            WarningKind::LanguageUnresolved,
            &file.path,
            "no resolvable language for file",
        ));
    };

    match run_single_file(
        registry,
        config,
        &file.content,
        &language,
        passes,
        &file.path,
        true,
        Some(cancel),
    ) {
        Ok(run) => FileOutcome::Analyzed {
            findings: run.findings,
            stats: run.stats,
            record: run.record,
        },
        Err(e) => FileOutcome::Skipped(AnalysisWarning::for_file(
            WarningKind::ModuleFailed,
            &file.path,
            e.to_string(),
        )),
    }
}
