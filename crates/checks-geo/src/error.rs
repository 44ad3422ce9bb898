//! Error types for the geo layer

use std::path::PathBuf;

/// Errors from the flight log
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error on the log file
    #[error("io error on {path}: {source}")]
    Io {
        /// Log file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Log file not accessible
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Entry index past the end of the log
    #[error("entry {index} out of range (log has {len} entries)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Entries in the log
        len: usize,
    },

    /// Line is not a log record
    #[error("malformed log line: {0}")]
    Malformed(String),
}

impl LogError {
    /// Classify an IO error for path
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Create malformed-line error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

/// Result type alias for flight log operations
pub type LogResult<T> = Result<T, LogError>;
