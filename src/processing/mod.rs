//! In-memory record transformations.
//!
//! The processing layer operates on [`crate::types::RecordSet`] values produced by ingestion.
//!
//! Currently implemented:
//!
//! - [`filter()`]: row filtering by predicate
//! - [`map()`]: row mapping by user function
//! - [`clean()`]: optional trimming / blank-row removal before profiling
//!
//! ## Example: filter → clean
//!
//! ```rust
//! use tabular_profile::ingestion::{parse_records, IngestionOptions};
//! use tabular_profile::processing::{clean, filter, CleanOptions};
//! use tabular_profile::types::Value;
//!
//! let input = b"id,city\n1, Oslo \n2,Rome\n";
//! let rs = parse_records(input, "c.csv", None, &IngestionOptions::default())?;
//!
//! // Keep rows whose id is not "2".
//! let kept = filter(&rs, |row| row.get("id") != Some(&Value::Utf8("2".to_string())));
//! let cleaned = clean(&kept, &CleanOptions::default());
//!
//! assert_eq!(cleaned.row_count(), 1);
//! assert_eq!(cleaned.rows[0].get("city"), Some(&Value::Utf8("Oslo".to_string())));
//! # Ok::<(), tabular_profile::IngestionError>(())
//! ```

pub mod clean;
pub mod filter;
pub mod map;

pub use clean::{clean, CleanOptions};
pub use filter::filter;
pub use map::map;
