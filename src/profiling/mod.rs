//! Column-level profiling of parsed uploads.
//!
//! The profiling layer turns a [`crate::types::RecordSet`] into a [`DatasetSummary`]. It tolerates
//! dirty data: missing, malformed and mixed-type values are expected input, not errors.
//!
//! - [`infer`]: numeric vs string inference (70% rule by default)
//! - [`numeric`]: mean, population std, min/max and interpolated quartiles
//! - [`categorical`]: distinct counts and top values
//! - [`summary`]: per-column profiles and the dataset summary
//!
//! ## Example
//!
//! ```rust
//! use tabular_profile::ingestion::{parse_records, IngestionOptions};
//! use tabular_profile::profiling::{summarize_records, ProfileOptions};
//! use tabular_profile::types::ColumnKind;
//!
//! let input = b"x,y\n1,A\n2,B\n,A\n4,A\n";
//! let rs = parse_records(input, "t.csv", None, &IngestionOptions::default())?;
//! let summary = summarize_records(&rs, &ProfileOptions::default());
//!
//! let x = summary.column("x").unwrap();
//! assert_eq!(x.dtype, ColumnKind::Number);
//! assert_eq!(x.missing, 1);
//! assert!(x.stats.is_some());
//! # Ok::<(), tabular_profile::IngestionError>(())
//! ```

pub mod categorical;
pub mod infer;
pub mod numeric;
pub mod summary;

pub use categorical::{count_unique, top_values, UniqueKey, ValueCount};
pub use infer::{coerce_number, infer_column, Inference};
pub use numeric::{percentile, NumericStats};
pub use summary::{
    profile_column, summarize_records, ColumnProfile, DatasetSummary, MissingByColumn,
    ProfileOptions,
};
