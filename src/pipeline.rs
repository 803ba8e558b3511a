//! Core entry point: raw upload bytes in, summary report out.
//!
//! [`parse_and_summarize`] runs format detection, parsing, optional cleaning and profiling, and
//! slices a preview of the first rows. Every call is independent; nothing is cached or shared.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::unified::{parse_records_unobserved, report_outcome};
use crate::ingestion::{IngestionFormat, IngestionOptions};
use crate::processing::{clean, CleanOptions};
use crate::profiling::{summarize_records, DatasetSummary, ProfileOptions};
use crate::types::{RecordSet, Row};

/// Default number of preview rows.
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Options for [`parse_and_summarize`].
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Parsing options.
    pub ingestion: IngestionOptions,
    /// Profiling options.
    pub profile: ProfileOptions,
    /// Maximum number of rows copied into the preview.
    pub preview_rows: usize,
    /// Cleaning applied between parsing and profiling; `None` profiles the rows as parsed.
    pub clean: Option<CleanOptions>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            ingestion: IngestionOptions::default(),
            profile: ProfileOptions::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            clean: None,
        }
    }
}

/// Successful result for one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Client-supplied file name.
    pub filename: String,
    /// Format the upload was parsed with.
    pub format: IngestionFormat,
    /// Total row count.
    pub rows: usize,
    /// Total column count.
    pub columns: usize,
    /// Per-column profiles and dataset-level figures.
    pub summary: DatasetSummary,
    /// First rows, verbatim.
    pub preview: Vec<Row>,
}

/// Parse an upload and summarize it.
///
/// Fails with [`IngestionError::EmptyInput`] for a zero-byte buffer and with
/// [`IngestionError::EmptyResult`] when parsing (and cleaning) leaves no rows. The ingestion
/// observer hears about the upload once, after the empty-rows check, so an upload rejected as
/// empty is reported as a failure rather than a success.
///
/// # Examples
///
/// ```rust
/// use tabular_profile::{parse_and_summarize, SummaryOptions};
///
/// let opts = SummaryOptions::default();
/// let report = parse_and_summarize(b"v\n1\n2\n3\n4\n", "v.csv", Some("text/csv"), &opts)?;
/// let v = report.summary.column("v").unwrap();
/// assert_eq!(v.stats.unwrap().median, Some(2.5));
/// # Ok::<(), tabular_profile::IngestionError>(())
/// ```
pub fn parse_and_summarize(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
    options: &SummaryOptions,
) -> IngestionResult<SummaryReport> {
    let ingestion = &options.ingestion;
    let (format, parsed) = parse_records_unobserved(bytes, filename, content_type, ingestion);
    let prepared = parsed.and_then(|records| prepare(records, options));
    report_outcome(ingestion, filename, bytes.len(), format, &prepared);
    Ok(build_report(prepared?, filename, options))
}

/// Summarize already-parsed records.
pub fn summarize(
    records: RecordSet,
    filename: &str,
    options: &SummaryOptions,
) -> IngestionResult<SummaryReport> {
    let records = prepare(records, options)?;
    Ok(build_report(records, filename, options))
}

/// Apply optional cleaning and reject record sets without rows.
fn prepare(records: RecordSet, options: &SummaryOptions) -> IngestionResult<RecordSet> {
    let records = match &options.clean {
        Some(clean_opts) => clean(&records, clean_opts),
        None => records,
    };
    if records.rows.is_empty() {
        return Err(IngestionError::EmptyResult);
    }
    Ok(records)
}

fn build_report(records: RecordSet, filename: &str, options: &SummaryOptions) -> SummaryReport {
    let summary = summarize_records(&records, &options.profile);
    let preview = records.rows.iter().take(options.preview_rows).cloned().collect();

    SummaryReport {
        filename: filename.to_string(),
        format: records.format,
        rows: records.row_count(),
        columns: records.column_count(),
        summary,
        preview,
    }
}

/// Read a file and summarize it, using its file name for format detection.
pub fn summarize_path(
    path: impl AsRef<Path>,
    options: &SummaryOptions,
) -> IngestionResult<SummaryReport> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_and_summarize(&bytes, &filename, None, options)
}

/// An owned upload, e.g. for queueing or batch execution.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Client-supplied file name (may be empty).
    pub filename: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("bytes_len", &self.bytes.len())
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl Upload {
    /// Create an upload without a declared content type.
    pub fn new(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            content_type: None,
        }
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Execute the upload by calling [`parse_and_summarize`].
    pub fn run(&self, options: &SummaryOptions) -> IngestionResult<SummaryReport> {
        parse_and_summarize(&self.bytes, &self.filename, self.content_type.as_deref(), options)
    }
}
