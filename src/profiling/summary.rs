//! Column profiles and the dataset summary.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::{ColumnKind, RecordSet, Value};

use super::categorical::{count_unique, top_values, ValueCount};
use super::infer::{infer_column, DEFAULT_NUMERIC_MIN_PERCENT};
use super::numeric::NumericStats;

/// Options controlling profiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Share of coercible values, in percent, required for a numeric column.
    pub numeric_min_percent: u32,
    /// Number of sample values kept per column.
    pub sample_size: usize,
    /// Number of top values reported for string columns.
    pub top_k: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            numeric_min_percent: DEFAULT_NUMERIC_MIN_PERCENT,
            sample_size: 5,
            top_k: 5,
        }
    }
}

/// Derived statistics for one column.
///
/// Numeric columns carry `stats`; string columns carry `top_values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: ColumnKind,
    pub non_null: usize,
    pub missing: usize,
    pub unique: usize,
    /// First observed values, verbatim.
    pub sample: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<ValueCount>>,
}

/// Missing count per column, serialized as a JSON object in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingByColumn(pub Vec<(String, usize)>);

impl MissingByColumn {
    /// Missing count for `column`.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, n)| *n)
    }
}

impl Serialize for MissingByColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, missing) in &self.0 {
            map.serialize_entry(column, missing)?;
        }
        map.end()
    }
}

/// Summary of every column in a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Column profiles in discovery order.
    pub columns: Vec<ColumnProfile>,
    pub missing_by_column: MissingByColumn,
    /// Sum of UTF-8 byte lengths of the text form of every non-missing value.
    pub memory_usage_bytes: usize,
}

impl DatasetSummary {
    /// Profile for `name`, if the column exists.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Profile every column of `records`.
///
/// A row without a key counts as missing for that column, as do `null` and `""`.
pub fn summarize_records(records: &RecordSet, options: &ProfileOptions) -> DatasetSummary {
    let total_rows = records.row_count();
    let observed = observed_values(records);

    let mut columns = Vec::with_capacity(records.columns.len());
    let mut missing_by_column = Vec::with_capacity(records.columns.len());
    let mut memory_usage_bytes = 0;

    for (name, values) in records.columns.iter().zip(observed.iter()) {
        memory_usage_bytes += values.iter().map(|v| v.to_text().len()).sum::<usize>();
        let profile = profile_column(name, values, total_rows, options);
        log::trace!(
            "column={name:?} dtype={} non_null={} unique={}",
            profile.dtype,
            profile.non_null,
            profile.unique
        );
        missing_by_column.push((name.clone(), profile.missing));
        columns.push(profile);
    }

    DatasetSummary {
        columns,
        missing_by_column: MissingByColumn(missing_by_column),
        memory_usage_bytes,
    }
}

/// Profile one column from its observed (non-missing) values.
pub fn profile_column(
    name: &str,
    observed: &[&Value],
    total_rows: usize,
    options: &ProfileOptions,
) -> ColumnProfile {
    let non_null = observed.len();
    let inference = infer_column(observed, options.numeric_min_percent);

    let (stats, top) = match inference.kind {
        ColumnKind::Number => (Some(NumericStats::from_values(&inference.numeric_values)), None),
        ColumnKind::String => (None, Some(top_values(observed, options.top_k))),
    };

    ColumnProfile {
        name: name.to_string(),
        dtype: inference.kind,
        non_null,
        missing: total_rows.saturating_sub(non_null),
        unique: count_unique(observed),
        sample: observed.iter().take(options.sample_size).map(|v| (*v).clone()).collect(),
        stats,
        top_values: top,
    }
}

/// Non-missing values per column, aligned with `records.columns`, in row order.
fn observed_values(records: &RecordSet) -> Vec<Vec<&Value>> {
    let index: HashMap<&str, usize> = records
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut observed: Vec<Vec<&Value>> = vec![Vec::new(); records.columns.len()];
    for row in &records.rows {
        for (key, value) in row.iter() {
            if value.is_missing() {
                continue;
            }
            if let Some(&i) = index.get(key) {
                observed[i].push(value);
            }
        }
    }
    observed
}
