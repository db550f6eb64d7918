use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Coarse classification of a failure, used by callers to decide how the
/// outcome is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A path could not be read or written, or it does not hold a usable workbook.
    FileAccess,
    /// The input rows do not match the selected retailer layout.
    Format,
    /// The input parsed but violates a record-level rule.
    Validation,
    /// The operation was cancelled before it committed anything.
    Cancelled,
    /// A failure of the engine's own plumbing (logging, summary output),
    /// unrelated to the files being processed.
    Internal,
}

/// Error type covering the different failure cases that can occur while a
/// report is parsed, merged, or written.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a file exists but cannot be opened as a spreadsheet.
    #[error("invalid workbook {}: {message}", path.display())]
    InvalidWorkbook { path: PathBuf, message: String },

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when the caller refuses to overwrite an existing destination.
    #[error("output file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Raised when a path carries an extension the engine does not handle.
    #[error("unsupported file type for {}: expected {expected}", path.display())]
    UnsupportedExtension {
        path: PathBuf,
        expected: &'static str,
    },

    /// Raised when a data row is narrower than the selected layout requires.
    #[error("row {row}: {message}")]
    Format { row: usize, message: String },

    /// Raised when an input workbook has no worksheet to read.
    #[error("workbook {} contains no worksheet", .0.display())]
    NoWorksheet(PathBuf),

    /// Raised when an input file lists the same key twice under the reject policy.
    #[error("duplicate key '{key}' on row {row} (first seen on row {first_row})")]
    DuplicateKey {
        key: String,
        row: usize,
        first_row: usize,
    },

    /// Raised when cancellation is observed before the destination is replaced.
    #[error("operation cancelled")]
    Cancelled,

    /// Raised when JSON serialization of a summary fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ReportError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_workbook(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidWorkbook {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns the classification surfaced to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Format { .. } | ReportError::NoWorksheet(_) => ErrorKind::Format,
            ReportError::DuplicateKey { .. } => ErrorKind::Validation,
            ReportError::Cancelled => ErrorKind::Cancelled,
            ReportError::FileAccess { .. }
            | ReportError::InvalidWorkbook { .. }
            | ReportError::ExcelWrite(_)
            | ReportError::AlreadyExists(_)
            | ReportError::UnsupportedExtension { .. } => ErrorKind::FileAccess,
            ReportError::Json(_) | ReportError::Logging(_) => ErrorKind::Internal,
        }
    }
}
