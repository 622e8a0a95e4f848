//! Registry error taxonomy with clear, actionable messages

use thiserror::Error;

/// Errors surfaced while validating or verifying registry entries
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An entry does not conform to the tool-entry schema
    #[error("Schema violation in {file} at {field}: {message}")]
    SchemaViolation {
        file: String,
        field: String,
        message: String,
    },

    /// Two entries claim the same slug or repository
    #[error("Duplicate {kind} '{value}'\n  first:  {first}\n  second: {second}\n\nSlugs and repository URLs must be unique registry-wide.")]
    DuplicateEntry {
        kind: DuplicateKind,
        value: String,
        first: String,
        second: String,
    },

    /// A URL probe failed (unreachable, timeout, non-success status)
    #[error("Network failure for {url}: {reason}")]
    NetworkFailure { url: String, reason: String },

    /// A descriptive field matched the forbidden-word list (warning only)
    #[error("Content policy: {field} contains forbidden word '{word}'")]
    ContentPolicyViolation { field: String, word: String },
}

/// Which uniqueness constraint a duplicate entry violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Slug,
    Repository,
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKind::Slug => write!(f, "slug"),
            DuplicateKind::Repository => write!(f, "repository"),
        }
    }
}
