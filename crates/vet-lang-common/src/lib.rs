//! Shared machinery for language support crates.
//!
//! Everything a language crate needs that is not language-specific lives
//! here: the single tree traversal utility, node/text helpers, normalized
//! body hashing, and the table-driven [`TableDetector`] / [`TableExtractor`]
//! that implement the `vet-lang-api` traits from a [`NodeTypeTable`] plus a
//! small set of per-language pattern hooks.
//!
//! Language crates compose these rather than reimplementing detection:
//! a typical language crate supplies its metadata, node table, grammar
//! handle, and hooks, then wraps `TableDetector` only when it has a
//! genuinely language-specific signal to add (e.g. `await` analysis).

mod body_hash;
mod config;
mod detect;
mod extract;
mod hooks;
mod node_utils;
mod table_detector;
mod traverse;

pub use body_hash::normalized_body_hash;
pub use config::DetectionConfig;
pub use detect::async_misuse::{detect_missing_await, detect_unawaited_coroutines};
pub use extract::TableExtractor;
pub use hooks::DetectorHooks;
pub use node_utils::{
    callee_name, default_visibility, end_line, find_child_of_kinds, first_identifier,
    has_ancestor_of_kinds, node_text, preceding_comment, start_column, start_line, VisibilityFn,
};
pub use table_detector::TableDetector;
pub use traverse::{count_nodes, traverse};
