//! Error types for poprako-interchange
//!
//! Parsing and validation failures are raised before any database access;
//! infrastructure failures abort the running transaction.

use thiserror::Error;

/// Interchange error type
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// A LabelPlus header line did not match its fixed content
    #[error("invalid header at line {line}: expected '{expected}', got '{found}'")]
    Header {
        line: usize,
        expected: String,
        found: String,
    },

    /// The stream ended inside the LabelPlus header
    #[error("unexpected end of file at header line {line}")]
    TruncatedHeader { line: usize },

    /// A LabelPlus body line could not be interpreted
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The project file is not valid JSON
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level JSON field is absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required top-level JSON field is null
    #[error("{0} must not be null")]
    NullField(&'static str),

    /// A top-level JSON field has the wrong shape
    #[error("invalid {field} field: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Decoded project content violates a validation rule
    #[error("{0}")]
    Validation(String),

    /// File and database disagree on the number of pages
    #[error("page count mismatch: file has {file} pages, database has {database} pages")]
    PageCountMismatch { file: usize, database: usize },

    /// Uploaded file extension has no import path
    #[error("unsupported project file extension: '{0}'")]
    UnsupportedExtension(String),

    /// Comic does not exist
    #[error("comic not found: {0}")]
    ComicNotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad error classes, used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed LabelPlus text
    Format,
    /// JSON decode or content validation failure
    Validation,
    /// Page count disagreement between file and database
    Structural,
    /// File type not accepted
    UnsupportedFormat,
    /// Target comic missing
    NotFound,
    /// Database or filesystem failure
    Infrastructure,
}

impl InterchangeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Header { .. } | Self::TruncatedHeader { .. } | Self::Syntax { .. } => {
                ErrorCategory::Format
            }
            Self::Json(_)
            | Self::MissingField(_)
            | Self::NullField(_)
            | Self::InvalidField { .. }
            | Self::Validation(_) => ErrorCategory::Validation,
            Self::PageCountMismatch { .. } => ErrorCategory::Structural,
            Self::UnsupportedExtension(_) => ErrorCategory::UnsupportedFormat,
            Self::ComicNotFound(_) => ErrorCategory::NotFound,
            Self::Database(_) | Self::Io(_) => ErrorCategory::Infrastructure,
        }
    }

    /// True when the uploaded project data itself was rejected
    pub fn is_invalid_project(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Format | ErrorCategory::Validation | ErrorCategory::Structural
        )
    }
}

/// Result type for interchange operations
pub type Result<T> = std::result::Result<T, InterchangeError>;
