use std::path::PathBuf;

use thiserror::Error;

use crate::version::FormatError;

/// A document that does not have the expected structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    pub path: PathBuf,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema violation in {0}")]
    Schema(#[from] SchemaViolation),

    #[error("Invalid version in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl SourceError {
    /// Whether a failure on a single add-on document may be skipped
    ///
    /// Filesystem failures are never skippable.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            SourceError::Json { .. } | SourceError::Schema(_) | SourceError::Format { .. }
        )
    }
}
