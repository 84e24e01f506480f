//! Default language registrations and language detection.

use std::path::Path;
use std::sync::Arc;

use tracing::error;
use vet_lang_api::SupportRegistry;

/// Registry with the built-in languages: go, javascript, typescript,
/// python.
pub fn default_registry() -> Arc<SupportRegistry> {
    let registry = SupportRegistry::new();
    for support in [
        vet_lang_go::support(),
        vet_lang_javascript::support(),
        vet_lang_typescript::support(),
        vet_lang_python::support(),
    ] {
        let language = support.metadata.name;
        if let Err(e) = registry.register(support) {
            // Unreachable with the static metadata above; a collision here
            // is a programming error worth shouting about, not a panic.
            error!(language, error = %e, "failed to register built-in language");
        }
    }
    Arc::new(registry)
}

/// Best-effort language detection: file extension first (most reliable),
/// then content patterns. Returns a canonical id registered in
/// `registry`, or `None`.
pub fn detect_language(
    registry: &SupportRegistry,
    code: &str,
    path: Option<&str>,
) -> Option<String> {
    if let Some(path) = path {
        if let Some(extension) = Path::new(path).extension().and_then(|e| e.to_str()) {
            if let Some(support) = registry.for_extension(extension) {
                return Some(support.metadata.name.to_string());
            }
        }
    }

    let trimmed = code.trim_start();

    // Go: package clause or func keyword.
    if trimmed.starts_with("package ") || code.contains("\nfunc ") || code.starts_with("func ") {
        return registry.is_supported("go").then(|| "go".to_string());
    }

    // Python: shebang, def/class with colon.
    if trimmed.starts_with("#!/usr/bin/env python")
        || trimmed.starts_with("#!/usr/bin/python")
        || code.contains("def ") && code.contains(':')
    {
        return registry.is_supported("python").then(|| "python".to_string());
    }

    // JS/TS: function/const/let/arrow; type annotations tip it to TS.
    if code.contains("function ")
        || code.contains("const ")
        || code.contains("let ")
        || code.contains("=>")
    {
        let typed = code.contains("interface ")
            || code.contains(": string")
            || code.contains(": number")
            || code.contains("export type ");
        let id = if typed { "typescript" } else { "javascript" };
        return registry.is_supported(id).then(|| id.to_string());
    }

    None
}
