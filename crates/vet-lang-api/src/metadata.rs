//! Static language metadata.

/// Static metadata describing a supported language.
///
/// `name` is the canonical grammar id; `aliases` are the variant ids that
/// normalize to it (file-extension spellings, alternate names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageMetadata {
    /// Canonical language id, e.g. "typescript".
    pub name: &'static str,

    /// Alternate ids that collapse to `name`, e.g. `["ts", "tsx"]`.
    pub aliases: &'static [&'static str],

    /// File extensions handled, without the dot.
    pub extensions: &'static [&'static str],
}

impl LanguageMetadata {
    /// Whether `id` (already lowercased) names this language.
    pub fn matches(&self, id: &str) -> bool {
        self.name == id || self.aliases.contains(&id)
    }

    /// Whether this language handles the given file extension.
    pub fn handles_extension(&self, extension: &str) -> bool {
        self.extensions.contains(&extension)
    }
}
