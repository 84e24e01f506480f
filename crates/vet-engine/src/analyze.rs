//! The analysis orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vet_analysis_cross_file::FileRecord;
use vet_foundation::{
    AnalysisStats, AnalysisWarning, CancelFlag, Finding, VetResult, WarningKind,
};
use vet_lang_api::SupportRegistry;
use vet_lang_common::{count_nodes, node_text, traverse};

use crate::detect::run_pass;
use crate::fallback;
use crate::languages::default_registry;
use crate::parser::ParserFactory;
use crate::passes::{resolve_passes, supported_passes, Pass};
use crate::validate::{validate_finding, ValidationContext};

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(4)
}

fn default_file_deadline_ms() -> u64 {
    2_000
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bound on concurrent per-file workers in multi-file analysis.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Soft per-file deadline in milliseconds; exceeding it truncates that
    /// file's remaining passes and sets `stats.truncated`.
    #[serde(default = "default_file_deadline_ms")]
    pub file_deadline_ms: u64,

    /// Drop findings below this confidence (0 disables the filter).
    #[serde(default)]
    pub min_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            file_deadline_ms: default_file_deadline_ms(),
            min_confidence: 0.0,
        }
    }
}

/// Result of a single-unit analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub findings: Vec<Finding>,
    pub stats: AnalysisStats,
}

/// The façade the service layer calls.
///
/// Stateless per call: symbol tables, trees, and parsers live only for the
/// duration of a request. The registry is the only shared (read-only)
/// state.
pub struct Analyzer {
    registry: Arc<SupportRegistry>,
    config: EngineConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer over the default registry (go, javascript, typescript,
    /// python).
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_registry(registry: Arc<SupportRegistry>) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<SupportRegistry> {
        &self.registry
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Canonical ids of registered languages, sorted.
    pub fn supported_languages(&self) -> Vec<String> {
        self.registry.supported_languages()
    }

    /// All pass ids, sorted.
    pub fn supported_passes(&self) -> Vec<&'static str> {
        supported_passes()
    }

    /// Analyze one unit of source.
    ///
    /// `passes` is an allow-list of detection categories; unknown names
    /// are ignored and an empty list runs the default set. Returns partial
    /// findings with `err = None` even when individual modules fail; the
    /// only hard errors are a missing language and a total
    /// parse-plus-fallback failure.
    pub async fn analyze(
        &self,
        code: &str,
        language: &str,
        passes: &[String],
    ) -> VetResult<AnalysisOutput> {
        let run = run_single_file(
            &self.registry,
            &self.config,
            code,
            language,
            passes,
            "<input>",
            false,
            None,
        )?;

        let files = vec![("<input>".to_string(), code.to_string())];
        let ctx = ValidationContext {
            files: &files,
            current_file: "<input>",
            index: None,
        };
        let mut findings = run.findings;
        for finding in &mut findings {
            validate_finding(finding, &ctx);
            finding.clamp_confidence();
        }
        finalize_findings(&mut findings, self.config.min_confidence);

        info!(
            language,
            findings = findings.len(),
            fallback = run.stats.used_fallback,
            partial = run.stats.partial_parse,
            "analysis complete"
        );
        Ok(AnalysisOutput {
            findings,
            stats: run.stats,
        })
    }
}

/// Drop contradicted findings, apply the confidence floor, and order
/// output deterministically.
pub(crate) fn finalize_findings(findings: &mut Vec<Finding>, min_confidence: f64) {
    findings.retain(|f| !(f.validated && f.confidence == 0.0));
    if min_confidence > 0.0 {
        findings.retain(|f| f.confidence >= min_confidence);
    }
    findings.sort_by(|a, b| {
        (&a.file, a.line, a.column, &a.kind).cmp(&(&b.file, b.line, b.column, &b.kind))
    });
}

/// Output of the per-file pipeline, before validation.
pub(crate) struct SingleFileRun {
    pub findings: Vec<Finding>,
    pub stats: AnalysisStats,

    /// Extraction output for the cross-file resolver; `None` when the
    /// fallback ran (nothing to extract) or the caller didn't ask.
    pub record: Option<FileRecord>,
}

/// Parse one file and run the per-file passes, degrading to the text
/// fallback when there is no usable tree.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_single_file(
    registry: &Arc<SupportRegistry>,
    config: &EngineConfig,
    code: &str,
    language: &str,
    requested_passes: &[String],
    path: &str,
    want_record: bool,
    cancel: Option<&CancelFlag>,
) -> VetResult<SingleFileRun> {
    if language.trim().is_empty() {
        return Err(vet_foundation::VetError::LanguageRequired);
    }

    let passes = resolve_passes(requested_passes, Pass::single_file());
    let factory = ParserFactory::new(Arc::clone(registry));
    let mut stats = AnalysisStats::default();
    let deadline = Duration::from_millis(config.file_deadline_ms);

    let parse_start = Instant::now();
    let parsed = match factory.parse(code, language) {
        Ok(parsed) => parsed,
        Err(e) if e.is_recoverable() => {
            stats.used_fallback = true;
            stats.warn(AnalysisWarning::for_file(
                WarningKind::FallbackUsed,
                path,
                e.to_string(),
            ));
            warn!(language, file = path, error = %e, "falling back to text heuristics");
            let findings = fallback::run(code, &passes);
            return Ok(SingleFileRun {
                findings,
                stats,
                record: None,
            });
        }
        Err(e) => return Err(e),
    };
    stats.parse_ms = parse_start.elapsed().as_millis() as u64;
    stats.partial_parse = parsed.partial;
    if parsed.partial {
        stats.warn(AnalysisWarning::for_file(
            WarningKind::PartialParse,
            path,
            "syntax errors present; analyzing the partial tree",
        ));
    }

    let root = parsed.tree.root_node();
    stats.nodes_visited = count_nodes(root);

    let detector = registry
        .detector(&parsed.language)
        .ok_or_else(|| vet_foundation::VetError::internal("parsed without registered detector"))?;

    let detect_start = Instant::now();
    let mut findings: Vec<Finding> = Vec::new();
    for pass in &passes {
        if let Some(flag) = cancel {
            if flag.is_cancelled() {
                stats.warn(AnalysisWarning::for_file(
                    WarningKind::Cancelled,
                    path,
                    "cancelled between detection modules",
                ));
                break;
            }
        }
        if parse_start.elapsed() > deadline {
            stats.truncated = true;
            stats.warn(AnalysisWarning::for_file(
                WarningKind::DeadlineExceeded,
                path,
                format!("soft deadline of {}ms exceeded", config.file_deadline_ms),
            ));
            break;
        }
        match run_pass(*pass, detector.as_ref(), root, code) {
            Ok(mut batch) => findings.append(&mut batch),
            Err(e) => {
                warn!(file = path, error = %e, "detection module failed; continuing");
                stats.warn(AnalysisWarning::for_file(
                    WarningKind::ModuleFailed,
                    path,
                    e.to_string(),
                ));
            }
        }
    }
    stats.detect_ms = detect_start.elapsed().as_millis() as u64;

    let record = if want_record {
        let support = registry.get(&parsed.language);
        support.map(|support| {
            let extractor = &support.extractor;
            let table = support.node_types;
            let mut identifiers: Vec<(String, usize)> = Vec::new();
            traverse(root, &mut |node| {
                if table.is_identifier(node.kind()) {
                    identifiers.push((
                        node_text(node, code).to_string(),
                        node.start_position().row + 1,
                    ));
                }
                true
            });
            FileRecord {
                path: path.to_string(),
                language: parsed.language.clone(),
                symbols: extractor.extract_symbols(root, code),
                imports: extractor.extract_imports(root, code),
                identifiers,
                functions: extractor.extract_functions(root, code),
            }
        })
    } else {
        None
    };

    Ok(SingleFileRun {
        findings,
        stats,
        record,
    })
}
