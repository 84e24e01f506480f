//! The codevet analysis engine.
//!
//! Given source code in one of several languages, the engine builds a
//! concrete syntax tree, runs pluggable detection passes (code quality and
//! security), correlates findings across files via a symbol/dependency
//! graph, and emits each finding with a calibrated confidence score and an
//! auto-fix-safety verdict.
//!
//! # Entry points
//!
//! ```ignore
//! use vet_engine::Analyzer;
//!
//! let analyzer = Analyzer::new();
//! let output = analyzer
//!     .analyze(code, "go", &["duplicates".into()])
//!     .await?;
//! for finding in &output.findings {
//!     println!("{}:{} {} ({:.0}%)", finding.line, finding.column, finding.kind,
//!         finding.confidence * 100.0);
//! }
//! ```
//!
//! Degradation over failure: malformed input yields a partial tree
//! (`stats.partial_parse`), unknown languages and hopeless parses route to
//! a text fallback (`stats.used_fallback`), and a failing detection module
//! is isolated to its own empty result. Callers read `stats` to judge how
//! much to trust a response.

mod analyze;
mod confidence;
mod detect;
mod fallback;
mod languages;
mod multi_file;
mod parser;
mod passes;
mod validate;

pub use analyze::{AnalysisOutput, Analyzer, EngineConfig};
pub use confidence::AUTO_FIX_THRESHOLD;
pub use fallback::FALLBACK_MAX_CONFIDENCE;
pub use languages::{default_registry, detect_language};
pub use multi_file::{MultiFileAnalysis, MultiFileOptions, SourceFile};
pub use parser::{ParsedSource, ParserFactory};
pub use passes::{resolve_passes, supported_passes, Pass};
pub use validate::{ValidationContext, ValidationResult};

// Re-export the shared data model so embedders need only this crate.
pub use vet_analysis_cross_file::{
    DependencyGraph, FileProvider, FileRecord, InMemoryFileProvider, NullFileProvider,
    ProjectIndex, SymbolTable,
};
pub use vet_foundation::{
    AnalysisStats, AnalysisWarning, CancelFlag, Finding, FixKind, SecurityInfo, Severity,
    VetError, VetResult, WarningKind,
};
