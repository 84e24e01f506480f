//! The file-content collaborator interface.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Supplies file contents to the resolver when an import points at a file
/// that wasn't part of the request. Implemented outside the engine (the
/// service layer owns the filesystem); tests use [`InMemoryFileProvider`].
pub trait FileProvider: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool {
        self.read(path).is_ok()
    }
}

/// A provider that knows nothing. Relative imports that don't land on a
/// request file stay unresolved (recorded, not expanded).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFileProvider;

impl FileProvider for NullFileProvider {
    fn read(&self, path: &Path) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no provider backing for {}", path.display()),
        ))
    }
}

/// Path → content map, for tests and embedders that pre-load sources.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFileProvider {
    files: BTreeMap<String, String>,
}

impl InMemoryFileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileProvider for InMemoryFileProvider {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&path.to_string_lossy().to_string())
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not in memory map"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_roundtrip() {
        let mut provider = InMemoryFileProvider::new();
        provider.insert("src/a.ts", "export const A = 1;");
        assert!(provider.exists(Path::new("src/a.ts")));
        assert!(!provider.exists(Path::new("src/b.ts")));
    }
}
