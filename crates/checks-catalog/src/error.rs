//! Error types for the catalog layer
//!
//! Provides error handling for:
//! - Parse operations (bytes → Catalog), hard failures only
//! - Per-entry skips (soft, collected as warnings, never returned as `Err`)
//! - Write operations (Catalog → bytes)
//! - Store operations (named documents on durable storage)

use std::fmt;
use std::path::PathBuf;

/// Why the top-level document shape was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Document is empty or holds only a null value
    Empty,
    /// Root value is not a key-value mapping
    NotAMapping,
    /// Root mapping has no `checklists` key
    MissingCollection,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty document"),
            Self::NotAMapping => f.write_str("expected a mapping at the document root"),
            Self::MissingCollection => f.write_str("missing 'checklists' collection"),
        }
    }
}

/// Hard parse failures; the whole document is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Top-level document shape is invalid
    #[error("malformed document: {0}")]
    MalformedDocument(MalformedReason),

    /// Underlying decode failure
    #[error("syntax error: {0}")]
    SyntaxError(String),

    /// Type mismatch at a point that cannot be recovered from
    #[error("unexpected type for '{field}': expected {expected}, found {found}")]
    UnexpectedType {
        /// Offending field
        field: String,
        /// Expected kind
        expected: &'static str,
        /// Actual kind
        found: &'static str,
    },
}

impl ParseError {
    /// Create unexpected type error
    pub fn unexpected_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::UnexpectedType {
            field: field.into(),
            expected,
            found,
        }
    }
}

/// Why a single checklist or step was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry is not a mapping
    NotAMapping,
    /// Mandatory field missing, null or non-scalar
    MissingField(&'static str),
    /// Mandatory field present but blank
    BlankField(&'static str),
    /// Collection field has the wrong type
    InvalidCollection(&'static str),
    /// Identifier already used by an earlier entry
    DuplicateId(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAMapping => f.write_str("not a mapping"),
            Self::MissingField(field) => write!(f, "missing '{field}'"),
            Self::BlankField(field) => write!(f, "blank '{field}'"),
            Self::InvalidCollection(field) => write!(f, "'{field}' is not a list"),
            Self::DuplicateId(id) => write!(f, "duplicate id '{id}'"),
        }
    }
}

/// Soft, per-entry parse issue; collected into the warning list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySkipped {
    /// Zero-based position of the checklist entry in the document
    pub checklist_index: usize,
    /// Id of the owning checklist, for step skips
    pub checklist_id: Option<String>,
    /// Zero-based position of the step within its checklist, for step skips
    pub step_index: Option<usize>,
    /// Reason
    pub reason: SkipReason,
}

impl EntrySkipped {
    /// Skip of a whole checklist entry
    #[must_use]
    pub fn checklist(index: usize, reason: SkipReason) -> Self {
        Self {
            checklist_index: index,
            checklist_id: None,
            step_index: None,
            reason,
        }
    }

    /// Skip of one step inside a surviving checklist
    #[must_use]
    pub fn step(checklist_index: usize, checklist_id: &str, step_index: usize, reason: SkipReason) -> Self {
        Self {
            checklist_index,
            checklist_id: Some(checklist_id.to_string()),
            step_index: Some(step_index),
            reason,
        }
    }

    /// Whether this warning refers to a step
    #[inline]
    #[must_use]
    pub fn is_step(&self) -> bool {
        self.step_index.is_some()
    }
}

impl fmt::Display for EntrySkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.step_index, &self.checklist_id) {
            (Some(step), Some(id)) => {
                write!(f, "Checklist '{id}' step #{step} skipped: {}", self.reason)
            }
            _ => write!(f, "Checklist #{} skipped: {}", self.checklist_index, self.reason),
        }
    }
}

/// Errors during catalog serialization
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Encoding failed below the model level
    #[error("failed to encode document: {0}")]
    Encoding(String),
}

/// Errors from the catalog store boundary
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on a named document
    #[error("io error on {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Storage refused access
    #[error("permission denied on {0}")]
    PermissionDenied(PathBuf),

    /// Document could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Document could not be written
    #[error("write error: {0}")]
    Write(#[from] WriteError),

    /// Name is not a plain document file name
    #[error("invalid document name: '{0}'")]
    InvalidName(String),

    /// Anything else
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Classify an IO error for path
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_distinguishes_reasons() {
        let empty = ParseError::MalformedDocument(MalformedReason::Empty);
        let not_map = ParseError::MalformedDocument(MalformedReason::NotAMapping);
        let missing = ParseError::MalformedDocument(MalformedReason::MissingCollection);

        assert_eq!(empty.to_string(), "malformed document: empty document");
        assert!(not_map.to_string().contains("mapping"));
        assert!(missing.to_string().contains("'checklists'"));
    }

    #[test]
    fn entry_skipped_display() {
        let checklist = EntrySkipped::checklist(2, SkipReason::MissingField("id"));
        assert_eq!(checklist.to_string(), "Checklist #2 skipped: missing 'id'");
        assert!(!checklist.is_step());

        let step = EntrySkipped::step(0, "a", 1, SkipReason::BlankField("texto"));
        assert_eq!(step.to_string(), "Checklist 'a' step #1 skipped: blank 'texto'");
        assert!(step.is_step());
    }

    #[test]
    fn store_error_classifies_permission() {
        let err = StoreError::from_io(
            "x.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, StoreError::PermissionDenied(_)));

        let err = StoreError::from_io("x.yaml", std::io::Error::other("disk"));
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn error_conversions() {
        let parse_err = ParseError::SyntaxError("bad".to_string());
        let store_err: StoreError = parse_err.into();
        assert!(matches!(store_err, StoreError::Parse(_)));
    }
}
