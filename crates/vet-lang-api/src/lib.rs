//! Language Support API for the codevet analysis engine.
//!
//! This crate defines the traits and types each supported programming
//! language implements to plug into the engine:
//!
//! - [`LanguageDetector`] — one method per detection category
//! - [`LanguageExtractor`] — function / import / symbol extraction
//! - [`NodeTypeTable`] — the grammar node kinds that mean "function",
//!   "variable declaration", "import", etc. for a language, so detection
//!   logic stays language-agnostic
//! - [`LanguageSupport`] — the composite registered per language
//! - [`SupportRegistry`] — thread-safe id → support map with alias
//!   normalization
//!
//! Lookups on the registry return `Option`; `None` tells the engine to use
//! its generic text fallback instead of failing the request.

mod detector;
mod extractor;
mod metadata;
mod node_types;
mod registry;
mod types;

pub use detector::LanguageDetector;
pub use extractor::LanguageExtractor;
pub use metadata::LanguageMetadata;
pub use node_types::NodeTypeTable;
pub use registry::{LanguageSupport, SupportRegistry};
pub use types::{FunctionInfo, ImportInfo, ParameterInfo, SymbolInfo, SymbolKind, Visibility};

/// Grammar constructor, e.g. `|| tree_sitter_go::LANGUAGE.into()`.
///
/// Grammar definitions are immutable and safe to share; parser instances
/// built from them are not, which is why supports hand out a constructor
/// rather than a parser.
pub type GrammarFn = fn() -> tree_sitter::Language;
