//! Row filtering for [`crate::types::RecordSet`].

use crate::types::{RecordSet, Row};

/// Returns a new [`RecordSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`RecordSet::filter_rows`].
pub fn filter<F>(records: &RecordSet, predicate: F) -> RecordSet
where
    F: FnMut(&Row) -> bool,
{
    records.filter_rows(predicate)
}
