//! Optional, conservative pre-processing applied before profiling.
//!
//! Nothing here imputes values: missing stays missing, numbers are never rewritten.

use crate::types::{RecordSet, Row, Value};

use super::{filter, map};

/// Which cleaning steps to run. Every step defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Strip surrounding whitespace from column names.
    pub trim_column_names: bool,
    /// Strip surrounding whitespace from string values.
    pub trim_strings: bool,
    /// Drop rows where every value is missing (after trimming).
    pub drop_empty_rows: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            trim_column_names: true,
            trim_strings: true,
            drop_empty_rows: true,
        }
    }
}

/// Apply the configured cleaning steps, returning a new record set.
pub fn clean(records: &RecordSet, options: &CleanOptions) -> RecordSet {
    let opts = *options;
    let trimmed = map(records, |row| clean_row(row, &opts));
    if opts.drop_empty_rows {
        filter(&trimmed, |row| row.iter().any(|(_, v)| !v.is_missing()))
    } else {
        trimmed
    }
}

fn clean_row(row: &Row, options: &CleanOptions) -> Row {
    row.iter()
        .map(|(name, value)| {
            let name = if options.trim_column_names { name.trim() } else { name };
            let value = match value {
                Value::Utf8(s) if options.trim_strings => Value::Utf8(s.trim().to_string()),
                other => other.clone(),
            };
            (name.to_string(), value)
        })
        .collect()
}
