use serde::Serialize;
use thiserror::Error;

use crate::ingestion::IngestionFormat;

/// Convenience result type for ingestion and profiling operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by parsing and summarization.
///
/// Every variant is recoverable: a failure for one upload never affects another.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (only from the path-based helpers).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload contained zero bytes.
    #[error("empty input: the uploaded file contains no bytes")]
    EmptyInput,

    /// No strategy could determine or parse the input format.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// The chosen parser rejected the input as structurally invalid.
    #[error("failed to parse {format} input: {source}")]
    Parse {
        format: IngestionFormat,
        #[source]
        source: ParseFailure,
    },

    /// One JSON-Lines record is not valid JSON.
    #[error("malformed record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Parsing succeeded but produced no rows.
    #[error("empty result: the uploaded file contains no rows after parsing")]
    EmptyResult,

    /// Writing a record set back out failed.
    #[error("export error: {0}")]
    Export(#[source] csv::Error),
}

/// Underlying decoder error carried by [`IngestionError::Parse`].
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// Delimited-text decoder error.
    #[error("{0}")]
    Csv(#[from] csv::Error),
    /// JSON decoder error.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The delimited strategy could not find a usable delimiter.
    #[error("{0}")]
    Delimiter(String),
}

/// Stable classification of an [`IngestionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Io,
    EmptyInput,
    UnsupportedFormat,
    ParseError,
    MalformedRecord,
    EmptyResult,
    ExportError,
}

impl ErrorKind {
    /// Name of the kind as reported to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Io => "Io",
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::MalformedRecord => "MalformedRecord",
            ErrorKind::EmptyResult => "EmptyResult",
            ErrorKind::ExportError => "ExportError",
        }
    }
}

impl IngestionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestionError::Io(_) => ErrorKind::Io,
            IngestionError::EmptyInput => ErrorKind::EmptyInput,
            IngestionError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            IngestionError::Parse { .. } => ErrorKind::ParseError,
            IngestionError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            IngestionError::EmptyResult => ErrorKind::EmptyResult,
            IngestionError::Export(_) => ErrorKind::ExportError,
        }
    }

    /// Structured `{kind, message}` payload for transport layers.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serializable failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}
