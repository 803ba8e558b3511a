//! Delimited-text (CSV/TSV) parsing.
//!
//! Rules:
//!
//! - The first record is the header; every later record becomes one [`Row`] keyed by header name.
//! - All values are kept as strings ([`Value::Utf8`]); typing happens during profiling.
//! - A record shorter than the header gets `null` for the trailing columns, so every header
//!   column exists even when no record reaches it.
//! - Fields beyond the header are collected into a list under the overflow key.
//! - Duplicate header names keep the first position and the last value.

use crate::error::{IngestionError, IngestionResult, ParseFailure};
use crate::types::{Row, Value};

use super::IngestionFormat;

/// Delimiters considered by [`sniff_delimiter`], in preference order.
pub const SNIFF_CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

const SNIFF_SAMPLE_LINES: usize = 10;

/// Parse delimited text into rows.
pub fn parse_delimited_str(
    input: &str,
    delimiter: u8,
    overflow_key: &str,
) -> IngestionResult<Vec<Row>> {
    let format = IngestionFormat::for_delimiter(delimiter);
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());
    parse_delimited_from_reader(&mut rdr, overflow_key).map_err(|e| IngestionError::Parse {
        format,
        source: ParseFailure::Csv(e),
    })
}

/// Parse rows from an existing CSV reader configured with `has_headers(false)`.
///
/// The reader should be `flexible`; otherwise ragged records surface as errors.
pub fn parse_delimited_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    overflow_key: &str,
) -> Result<Vec<Row>, csv::Error> {
    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_owned).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        let mut row = Row::new();
        let mut extra = Vec::new();
        for (idx, field) in record.iter().enumerate() {
            match headers.get(idx) {
                Some(name) => row.insert(name.as_str(), Value::Utf8(field.to_owned())),
                None => extra.push(Value::Utf8(field.to_owned())),
            }
        }
        for name in headers.iter().skip(record.len()) {
            if row.get(name).is_none() {
                row.insert(name.as_str(), Value::Null);
            }
        }
        if !extra.is_empty() {
            row.insert(overflow_key, Value::List(extra));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Best-effort delimiter detection.
///
/// Picks the candidate that appears on the header line and the same number of times on every
/// sampled line (counting outside double quotes). Ties go to the higher per-line count, then to
/// [`SNIFF_CANDIDATES`] order. Input that opens with `{` or `[` is rejected as JSON-shaped.
pub fn sniff_delimiter(input: &str) -> Result<u8, String> {
    if input.trim().is_empty() {
        return Err("input is blank".to_string());
    }
    if looks_like_json(input) {
        return Err("input looks like JSON, not delimited text".to_string());
    }

    let sample: Vec<&str> = input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_SAMPLE_LINES)
        .collect();

    let mut best: Option<(u8, usize)> = None;
    for &candidate in &SNIFF_CANDIDATES {
        let header_count = count_unquoted(sample[0], candidate);
        if header_count == 0 {
            continue;
        }
        if sample[1..].iter().any(|line| count_unquoted(line, candidate) != header_count) {
            continue;
        }
        if best.is_none_or(|(_, n)| header_count > n) {
            best = Some((candidate, header_count));
        }
    }

    best.map(|(d, _)| d)
        .ok_or_else(|| "could not determine a consistent delimiter".to_string())
}

/// Returns `true` when the first non-whitespace character opens a JSON array or object.
pub fn looks_like_json(input: &str) -> bool {
    matches!(input.trim_start().chars().next(), Some('{') | Some('['))
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
