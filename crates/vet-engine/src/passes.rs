//! Detection pass identifiers.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One detection category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Duplicates,
    UnusedVariables,
    Unreachable,
    Orphaned,
    EmptyCatch,
    AsyncMisuse,
    SqlInjection,
    Xss,
    CommandInjection,
    WeakCrypto,
    SecurityMiddleware,
    // Cross-file only.
    UnusedExports,
    CrossFileDuplicates,
    CircularDependencies,
}

impl Pass {
    /// Stable pass id, as callers spell it.
    pub fn name(&self) -> &'static str {
        match self {
            Pass::Duplicates => "duplicates",
            Pass::UnusedVariables => "unused",
            Pass::Unreachable => "unreachable",
            Pass::Orphaned => "orphaned",
            Pass::EmptyCatch => "empty_catch",
            Pass::AsyncMisuse => "async_misuse",
            Pass::SqlInjection => "sql_injection",
            Pass::Xss => "xss",
            Pass::CommandInjection => "command_injection",
            Pass::WeakCrypto => "weak_crypto",
            Pass::SecurityMiddleware => "security_middleware",
            Pass::UnusedExports => "unused_exports",
            Pass::CrossFileDuplicates => "cross_file_duplicates",
            Pass::CircularDependencies => "circular_deps",
        }
    }

    /// Parse a caller-supplied pass name, accepting the historical aliases.
    pub fn from_name(name: &str) -> Option<Pass> {
        match name.trim().to_ascii_lowercase().as_str() {
            "duplicates" | "duplicate_functions" => Some(Pass::Duplicates),
            "unused" | "unused_variables" => Some(Pass::UnusedVariables),
            "unreachable" | "unreachable_code" => Some(Pass::Unreachable),
            "orphaned" | "orphaned_code" => Some(Pass::Orphaned),
            "empty_catch" => Some(Pass::EmptyCatch),
            "async_misuse" | "async" | "missing_await" => Some(Pass::AsyncMisuse),
            "sql_injection" => Some(Pass::SqlInjection),
            "xss" => Some(Pass::Xss),
            "command_injection" => Some(Pass::CommandInjection),
            "weak_crypto" | "insecure_crypto" => Some(Pass::WeakCrypto),
            "security_middleware" => Some(Pass::SecurityMiddleware),
            "unused_exports" => Some(Pass::UnusedExports),
            "cross_file_duplicates" => Some(Pass::CrossFileDuplicates),
            "circular_deps" | "circular_dependencies" => Some(Pass::CircularDependencies),
            _ => None,
        }
    }

    /// Per-file passes, in execution order.
    pub fn single_file() -> &'static [Pass] {
        &[
            Pass::Duplicates,
            Pass::UnusedVariables,
            Pass::Unreachable,
            Pass::Orphaned,
            Pass::EmptyCatch,
            Pass::AsyncMisuse,
            Pass::SqlInjection,
            Pass::Xss,
            Pass::CommandInjection,
            Pass::WeakCrypto,
            Pass::SecurityMiddleware,
        ]
    }

    /// Cross-file passes, in execution order.
    pub fn cross_file() -> &'static [Pass] {
        &[
            Pass::UnusedExports,
            Pass::CrossFileDuplicates,
            Pass::CircularDependencies,
        ]
    }

    pub fn is_cross_file(&self) -> bool {
        Self::cross_file().contains(self)
    }
}

/// Resolve requested pass names to the subset of `available`, preserving
/// execution order. Unknown names are ignored (logged), and an empty
/// request means "run everything available".
pub fn resolve_passes(requested: &[String], available: &'static [Pass]) -> Vec<Pass> {
    if requested.is_empty() {
        return available.to_vec();
    }
    let mut selected: Vec<Pass> = Vec::new();
    for name in requested {
        match Pass::from_name(name) {
            Some(pass) => {
                if available.contains(&pass) && !selected.contains(&pass) {
                    selected.push(pass);
                }
            }
            None => debug!(pass = %name, "ignoring unknown pass name"),
        }
    }
    // Execution order is the canonical order, not request order.
    selected.sort_by_key(|p| available.iter().position(|a| a == p));
    selected
}

/// All pass ids, sorted, for caller introspection.
pub fn supported_passes() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Pass::single_file()
        .iter()
        .chain(Pass::cross_file())
        .map(Pass::name)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_ignored() {
        let requested = vec!["duplicates".to_string(), "astrology".to_string()];
        let passes = resolve_passes(&requested, Pass::single_file());
        assert_eq!(passes, vec![Pass::Duplicates]);
    }

    #[test]
    fn empty_request_runs_all() {
        let passes = resolve_passes(&[], Pass::single_file());
        assert_eq!(passes.len(), Pass::single_file().len());
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(Pass::from_name("missing_await"), Some(Pass::AsyncMisuse));
        assert_eq!(Pass::from_name("insecure_crypto"), Some(Pass::WeakCrypto));
        assert_eq!(Pass::from_name("SQL_INJECTION"), Some(Pass::SqlInjection));
    }

    #[test]
    fn order_is_canonical_not_request_order() {
        let requested = vec!["xss".to_string(), "duplicates".to_string()];
        let passes = resolve_passes(&requested, Pass::single_file());
        assert_eq!(passes, vec![Pass::Duplicates, Pass::Xss]);
    }

    #[test]
    fn cross_file_passes_not_available_single_file() {
        let requested = vec!["unused_exports".to_string()];
        let passes = resolve_passes(&requested, Pass::single_file());
        assert!(passes.is_empty());
    }
}
