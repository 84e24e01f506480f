//! Parser lifecycle management.
//!
//! The native parser object is not safe to share across concurrent
//! operations, so the factory constructs a fresh `tree_sitter::Parser` for
//! every call. Grammar definitions (the `Language` values) are immutable
//! and cheap to hand out; they are the only shared parser state.

use std::sync::Arc;

use tracing::warn;
use tree_sitter::{Parser, Tree};
use vet_foundation::{VetError, VetResult};
use vet_lang_api::SupportRegistry;

/// A parsed source file, possibly with syntax errors.
pub struct ParsedSource {
    pub tree: Tree,

    /// Canonical language id after alias normalization.
    pub language: String,

    /// True when the tree contains ERROR nodes but is still usable.
    pub partial: bool,
}

/// Builds one parser per parse call, never caching instances.
pub struct ParserFactory {
    registry: Arc<SupportRegistry>,
}

impl ParserFactory {
    pub fn new(registry: Arc<SupportRegistry>) -> Self {
        Self { registry }
    }

    /// A fresh parser for `language`, plus the canonical language id.
    ///
    /// Distinct concurrent calls always receive distinct parser instances,
    /// even for the same language.
    pub fn parser_for(&self, language: &str) -> VetResult<(Parser, String)> {
        if language.trim().is_empty() {
            return Err(VetError::LanguageRequired);
        }
        let support = self
            .registry
            .get(language)
            .ok_or_else(|| VetError::unsupported_language(language))?;

        let mut parser = Parser::new();
        parser
            .set_language(&(support.grammar)())
            .map_err(|e| VetError::internal(format!("grammar rejected by parser: {e}")))?;
        Ok((parser, support.metadata.name.to_string()))
    }

    /// Parse `code`, accepting partial trees.
    ///
    /// A tree whose root has at least one child is usable even when it
    /// contains syntax errors; only a rootless/childless parse of
    /// non-empty input is a hard failure (the caller then falls back to
    /// text heuristics).
    pub fn parse(&self, code: &str, language: &str) -> VetResult<ParsedSource> {
        let (mut parser, canonical) = self.parser_for(language)?;
        let tree = parser
            .parse(code, None)
            .ok_or_else(|| VetError::parse_failure(&canonical, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.child_count() == 0 && !code.trim().is_empty() {
            return Err(VetError::parse_failure(&canonical, "no usable root node"));
        }

        let partial = root.has_error();
        if partial {
            warn!(language = %canonical, "parse produced a partial tree; continuing");
        }
        Ok(ParsedSource {
            tree,
            language: canonical,
            partial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::default_registry;

    fn factory() -> ParserFactory {
        ParserFactory::new(default_registry())
    }

    #[test]
    fn fresh_parser_per_call() {
        let factory = factory();
        let (first, _) = factory.parser_for("go").unwrap();
        let (second, _) = factory.parser_for("go").unwrap();
        // Two independent instances; dropping one must not affect the other.
        drop(first);
        drop(second);
    }

    #[test]
    fn aliases_normalize() {
        let factory = factory();
        let (_, canonical) = factory.parser_for("golang").unwrap();
        assert_eq!(canonical, "go");
        let (_, canonical) = factory.parser_for("TSX").unwrap();
        assert_eq!(canonical, "typescript");
    }

    #[test]
    fn unknown_language_is_typed_error() {
        let factory = factory();
        match factory.parser_for("cobol") {
            Err(VetError::UnsupportedLanguage { language }) => assert_eq!(language, "cobol"),
            Ok(_) => panic!("expected UnsupportedLanguage, got Ok"),
            Err(other) => panic!("expected UnsupportedLanguage, got {other:?}"),
        }
    }

    #[test]
    fn empty_language_is_required_error() {
        let factory = factory();
        assert!(matches!(
            factory.parser_for("  "),
            Err(VetError::LanguageRequired)
        ));
    }

    #[test]
    fn malformed_input_yields_partial_tree() {
        let factory = factory();
        let source = "package main\n\nfunc broken() {\n\tx := 1\n\n func ok() {}\n";
        let parsed = factory.parse(source, "go").unwrap();
        assert!(parsed.partial);
        assert!(parsed.tree.root_node().child_count() > 0);
    }

    #[test]
    fn clean_input_is_not_partial() {
        let factory = factory();
        let parsed = factory.parse("package main\nfunc main() {}\n", "go").unwrap();
        assert!(!parsed.partial);
    }
}
