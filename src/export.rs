//! Write a [`RecordSet`] back out as delimited text.
//!
//! The header is the discovered column order. Missing fields and nulls become empty cells;
//! every other value is written in its [`Value::to_text`] form.

use std::io::Write;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RecordSet, Value};

/// Write `records` to `writer` using `delimiter`.
pub fn write_delimited<W: Write>(
    records: &RecordSet,
    writer: W,
    delimiter: u8,
) -> IngestionResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(&records.columns).map_err(IngestionError::Export)?;
    for row in &records.rows {
        let cells = records
            .columns
            .iter()
            .map(|c| row.get(c).map(Value::to_text).unwrap_or_default());
        wtr.write_record(cells).map_err(IngestionError::Export)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` as comma-separated values to a new file at `path`.
pub fn write_csv_to_path(records: &RecordSet, path: impl AsRef<Path>) -> IngestionResult<()> {
    let file = std::fs::File::create(path)?;
    write_delimited(records, std::io::BufWriter::new(file), b',')
}
