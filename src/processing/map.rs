//! Row mapping for [`crate::types::RecordSet`].

use crate::types::{RecordSet, Row};

/// Returns a new [`RecordSet`] by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`RecordSet::map_rows`].
pub fn map<F>(records: &RecordSet, mapper: F) -> RecordSet
where
    F: FnMut(&Row) -> Row,
{
    records.map_rows(mapper)
}
