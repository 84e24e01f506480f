//! The table-driven [`LanguageDetector`] implementation.

use tree_sitter::Node;
use vet_foundation::Finding;
use vet_lang_api::{LanguageDetector, NodeTypeTable};

use crate::detect::{quality, security};
use crate::node_utils::default_visibility;
use crate::{DetectionConfig, DetectorHooks, VisibilityFn};

/// A complete detector built from a node kind table plus pattern hooks.
///
/// Language crates use this directly when the defaults fit, or wrap it and
/// override individual categories (JS/TS and Python override
/// `detect_async_misuse`; Go overrides visibility).
pub struct TableDetector {
    table: &'static NodeTypeTable,
    hooks: DetectorHooks,
    config: DetectionConfig,
    visibility: VisibilityFn,
}

impl TableDetector {
    pub fn new(table: &'static NodeTypeTable) -> Self {
        Self {
            table,
            hooks: DetectorHooks::default(),
            config: DetectionConfig::default(),
            visibility: default_visibility,
        }
    }

    pub fn with_hooks(mut self, hooks: DetectorHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_visibility(mut self, visibility: VisibilityFn) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn hooks(&self) -> &DetectorHooks {
        &self.hooks
    }
}

impl LanguageDetector for TableDetector {
    fn node_types(&self) -> &'static NodeTypeTable {
        self.table
    }

    fn detect_duplicates(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        quality::detect_duplicates(self.table, root, source)
    }

    fn detect_unused_variables(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        quality::detect_unused_variables(self.table, self.visibility, root, source)
    }

    fn detect_unreachable(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        quality::detect_unreachable(self.table, root, source)
    }

    fn detect_orphaned(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        quality::detect_orphaned(self.table, &self.config, self.visibility, root, source)
    }

    fn detect_empty_catch(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        quality::detect_empty_catch(self.table, root, source)
    }

    fn detect_sql_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        security::detect_sql_injection(self.table, &self.hooks, root, source)
    }

    fn detect_xss(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        security::detect_xss(self.table, &self.hooks, root, source)
    }

    fn detect_command_injection(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        security::detect_command_injection(self.table, &self.hooks, root, source)
    }

    fn detect_weak_crypto(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        security::detect_weak_crypto(self.table, &self.hooks, root, source)
    }

    fn detect_security_middleware(&self, root: Node<'_>, source: &str) -> Vec<Finding> {
        security::detect_security_middleware(self.table, &self.hooks, root, source)
    }
}
