//! Error handling for the codevet engine.

use thiserror::Error;

/// Result type alias used across the workspace.
pub type VetResult<T> = Result<T, VetError>;

/// Core error type used throughout the codevet system.
///
/// Only `LanguageRequired` and `InvalidRequest` ever surface to callers of
/// the public entry points; every other variant is handled internally by
/// degrading to partial results or the generic fallback.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VetError {
    /// No language was supplied with an analysis request.
    #[error("language is required")]
    LanguageRequired,

    /// The request itself is malformed.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// No language support is registered for this id. Recoverable: callers
    /// route to the generic fallback.
    #[error("unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    /// Parsing produced no usable tree. Recoverable via fallback.
    #[error("parse failure for {language}: {message}")]
    ParseFailure { language: String, message: String },

    /// A single detection module failed; isolated to that module.
    #[error("detection module '{pass}' failed: {message}")]
    ModuleFailure { pass: String, message: String },

    /// Language support registration was rejected.
    #[error("registry error: {message}")]
    Registry { message: String },

    /// Internal invariant violation.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl VetError {
    /// Create a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new unsupported language error.
    pub fn unsupported_language(language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
        }
    }

    /// Create a new parse failure error.
    pub fn parse_failure(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Create a new module failure error.
    pub fn module_failure(pass: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleFailure {
            pass: pass.into(),
            message: message.into(),
        }
    }

    /// Create a new registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the engine can continue by degrading (fallback, partial
    /// results) instead of returning this error to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage { .. } | Self::ParseFailure { .. } | Self::ModuleFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(VetError::unsupported_language("cobol").is_recoverable());
        assert!(VetError::parse_failure("go", "no root").is_recoverable());
        assert!(VetError::module_failure("xss", "boom").is_recoverable());
        assert!(!VetError::LanguageRequired.is_recoverable());
        assert!(!VetError::invalid_request("missing field").is_recoverable());
    }

    #[test]
    fn display_includes_context() {
        let err = VetError::parse_failure("python", "empty tree");
        assert_eq!(err.to_string(), "parse failure for python: empty tree");
    }
}
