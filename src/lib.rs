//! `tabular-profile` turns loosely-typed tabular uploads into a uniform in-memory
//! [`types::RecordSet`] and profiles every column.
//!
//! The primary entrypoint is [`parse_and_summarize`], which takes the raw bytes of an upload, its
//! client-supplied filename and an optional declared content type, and returns a
//! [`SummaryReport`]: per-column profiles, missing counts, an approximate memory figure and a
//! preview of the first rows.
//!
//! ## What you can upload
//!
//! **Formats (detected by extension, then content type, then content):**
//!
//! - **CSV**: `.csv`, `text/csv`
//! - **TSV**: `.tsv`, `text/tab-separated-values`
//! - **JSON**: `.json`, `application/json` (array of objects, single object, or scalars)
//! - **JSON-Lines**: `.jsonl`, or JSON content whose first lines each start with `{`
//! - unknown names: the delimiter (`,` `\t` `;` `|`) is sniffed, then JSON is tried
//!
//! **Row model:**
//!
//! Each row is an ordered mapping from column name to [`types::Value`]. Delimited cells are always
//! text; JSON keeps its native types, including nested arrays and objects. A column's value is
//! *missing* when it is `null`, the empty string, or the row has no such key.
//!
//! ## Quick example
//!
//! ```rust
//! use tabular_profile::{parse_and_summarize, SummaryOptions};
//! use tabular_profile::types::ColumnKind;
//!
//! let csv = b"city,temp\nOslo,4.5\nRome,18\nOslo,n/a\nLima,\n";
//! let report = parse_and_summarize(csv, "weather.csv", None, &SummaryOptions::default())?;
//!
//! assert_eq!(report.rows, 4);
//! let city = report.summary.column("city").unwrap();
//! assert_eq!(city.dtype, ColumnKind::String);
//! assert_eq!(city.top_values.as_ref().unwrap()[0].value, "Oslo");
//!
//! // Two of the three present temperatures parse; 2/3 is below the 70% rule.
//! let temp = report.summary.column("temp").unwrap();
//! assert_eq!(temp.dtype, ColumnKind::String);
//! assert_eq!(temp.missing, 1);
//! # Ok::<(), tabular_profile::IngestionError>(())
//! ```
//!
//! Failures carry a stable [`ErrorKind`] so transport layers can map them to responses:
//!
//! ```rust
//! use tabular_profile::{parse_and_summarize, ErrorKind, SummaryOptions};
//!
//! let err = parse_and_summarize(b"", "empty.csv", None, &SummaryOptions::default()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::EmptyInput);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection and parsers, plus observer hooks
//! - [`profiling`]: type inference, numeric statistics, categorical counts
//! - [`pipeline`]: the end-to-end entrypoints
//! - [`processing`]: filter/map and optional cleaning of parsed rows
//! - [`execution`]: summarizing many uploads in parallel
//! - [`export`]: writing parsed rows back out as delimited text
//! - [`types`]: the row model
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod profiling;
pub mod types;

pub use error::{ErrorKind, ErrorReport, IngestionError, IngestionResult};
pub use pipeline::{parse_and_summarize, summarize_path, SummaryOptions, SummaryReport, Upload};
