//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`parse_records`] (from [`unified`]) which:
//!
//! - detects the format from filename, content type, or content (see [`detect`])
//! - parses the upload into an in-memory [`crate::types::RecordSet`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`delimited`]
//! - [`json`]

pub mod delimited;
pub mod detect;
pub mod json;
pub mod observability;
pub mod unified;

pub use detect::{detect_format, IngestionFormat, Strategy};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionStats, LogObserver, StdErrObserver,
};
pub use unified::{parse_records, parse_text, IngestionOptions};
