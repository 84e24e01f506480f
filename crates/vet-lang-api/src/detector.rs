//! The per-language detection trait.

use tree_sitter::Node;
use vet_foundation::Finding;

use crate::NodeTypeTable;

/// Language-specific detection, one method per finding category.
///
/// Every method is a pure function of (tree, source): no I/O, no shared
/// state, so the engine may run categories in any order or in parallel over
/// the same read-only tree. Implementations are expected to delegate
/// node-kind decisions to [`NodeTypeTable`] so the logic itself stays
/// language-agnostic; overriding a method is reserved for genuinely
/// language-specific signals (e.g. `await` handling).
pub trait LanguageDetector: Send + Sync {
    /// The node kind table backing this detector.
    fn node_types(&self) -> &'static NodeTypeTable;

    /// Functions with identical normalized bodies.
    fn detect_duplicates(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Declared-but-never-read variables.
    fn detect_unused_variables(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Statements after an unconditional return/throw/break in the same block.
    fn detect_unreachable(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Functions never called within the analyzed source.
    fn detect_orphaned(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Empty catch/except bodies.
    fn detect_empty_catch(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Async/concurrency misuse. Intentionally shallow and pattern-based;
    /// languages without a meaningful signal return nothing.
    fn detect_async_misuse(&self, _root: Node<'_>, _source: &str) -> Vec<Finding> {
        Vec::new()
    }

    /// SQL built by concatenation/interpolation reaching a query sink.
    fn detect_sql_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Unsanitized input reaching HTML/DOM sinks.
    fn detect_xss(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Unsanitized input reaching shell-execution sinks.
    fn detect_command_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Broken hash algorithms and hardcoded secrets.
    fn detect_weak_crypto(&self, root: Node<'_>, source: &str) -> Vec<Finding>;

    /// Security middleware presence/absence classification.
    fn detect_security_middleware(&self, root: Node<'_>, source: &str) -> Vec<Finding>;
}
