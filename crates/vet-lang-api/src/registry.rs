//! The language support registry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use vet_foundation::{VetError, VetResult};

use crate::{GrammarFn, LanguageDetector, LanguageExtractor, LanguageMetadata, NodeTypeTable};

/// Everything the engine needs for one language: metadata, the grammar
/// constructor, the node kind table, and the detector/extractor pair.
#[derive(Clone)]
pub struct LanguageSupport {
    pub metadata: &'static LanguageMetadata,
    pub grammar: GrammarFn,
    pub node_types: &'static NodeTypeTable,
    pub detector: Arc<dyn LanguageDetector>,
    pub extractor: Arc<dyn LanguageExtractor>,
}

impl std::fmt::Debug for LanguageSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageSupport")
            .field("language", &self.metadata.name)
            .finish()
    }
}

/// Thread-safe map from language id to [`LanguageSupport`].
///
/// Canonical ids and aliases are both resolvable; lookups normalize to
/// lowercase first. Absent ids yield `None`, which callers interpret as
/// "use the generic fallback", never as a fatal failure.
#[derive(Default)]
pub struct SupportRegistry {
    supports: DashMap<String, Arc<LanguageSupport>>,
    aliases: DashMap<String, String>,
}

impl SupportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language. Fails if the canonical id is empty or already
    /// registered; alias collisions with existing canonical ids also fail.
    pub fn register(&self, support: LanguageSupport) -> VetResult<()> {
        let name = support.metadata.name;
        if name.is_empty() {
            return Err(VetError::registry("language id must not be empty"));
        }
        if self.supports.contains_key(name) {
            return Err(VetError::registry(format!(
                "language '{name}' is already registered"
            )));
        }
        for alias in support.metadata.aliases {
            if self.supports.contains_key(*alias) || self.aliases.contains_key(*alias) {
                return Err(VetError::registry(format!(
                    "alias '{alias}' for '{name}' is already taken"
                )));
            }
        }

        for alias in support.metadata.aliases {
            self.aliases.insert((*alias).to_string(), name.to_string());
        }
        self.supports.insert(name.to_string(), Arc::new(support));
        debug!(language = name, "registered language support");
        Ok(())
    }

    /// Collapse an id or alias to its canonical language id. Unknown ids
    /// are returned lowercased but otherwise untouched.
    pub fn normalize(&self, language: &str) -> String {
        let lowered = language.trim().to_ascii_lowercase();
        match self.aliases.get(&lowered) {
            Some(canonical) => canonical.clone(),
            None => lowered,
        }
    }

    pub fn get(&self, language: &str) -> Option<Arc<LanguageSupport>> {
        let canonical = self.normalize(language);
        self.supports.get(&canonical).map(|s| Arc::clone(&s))
    }

    pub fn detector(&self, language: &str) -> Option<Arc<dyn LanguageDetector>> {
        self.get(language).map(|s| Arc::clone(&s.detector))
    }

    pub fn extractor(&self, language: &str) -> Option<Arc<dyn LanguageExtractor>> {
        self.get(language).map(|s| Arc::clone(&s.extractor))
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.supports.contains_key(&self.normalize(language))
    }

    /// Canonical ids of all registered languages, sorted for stable output.
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.supports.iter().map(|e| e.key().clone()).collect();
        languages.sort();
        languages
    }

    /// The language registered for a file extension, if any.
    pub fn for_extension(&self, extension: &str) -> Option<Arc<LanguageSupport>> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let mut matches: Vec<Arc<LanguageSupport>> = self
            .supports
            .iter()
            .filter(|e| e.value().metadata.handles_extension(&ext))
            .map(|e| Arc::clone(e.value()))
            .collect();
        // Deterministic pick when two languages claim the same extension.
        matches.sort_by_key(|s| s.metadata.name);
        matches.into_iter().next()
    }
}
