//! Error types for progress persistence
//!
//! The state machine itself never fails: out-of-range requests are clamped.
//! Only the key-value collaborator can report errors, and sessions log them
//! instead of propagating.

use std::path::PathBuf;

/// Errors from a progress store
#[derive(Debug, thiserror::Error)]
pub enum ProgressStoreError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Records could not be encoded
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Anything else
    #[error("progress store failure: {0}")]
    Unknown(String),
}

impl ProgressStoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for progress store operations
pub type ProgressStoreResult<T> = Result<T, ProgressStoreError>;
