//! JSON and JSON-Lines parsing.
//!
//! Supported inputs:
//! - A JSON array: `[{"a":1}, {"a":2}]` (one row per element)
//! - A single JSON object: `{"a":1}` (exactly one row)
//! - A bare scalar: `42` (one row)
//! - JSON-Lines: `{"a":1}\n{"a":2}\n` (one row per non-empty line)
//!
//! Non-object values are wrapped into a one-field row under the sentinel key. Nested values are
//! kept as-is; only the top level is flattened into columns.

use crate::error::{IngestionError, IngestionResult, ParseFailure};
use crate::types::{Row, Value};

use super::IngestionFormat;

const LINES_PROBE: usize = 5;

/// Parse JSON text, detecting JSON-Lines from content.
///
/// Blank input yields zero rows. The text is treated as JSON-Lines when it has more than one
/// non-empty line and each of the first five starts with `{`.
pub fn parse_json_str(input: &str, sentinel_key: &str) -> IngestionResult<Vec<Row>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if looks_like_json_lines(trimmed) {
        return parse_json_lines_str(input, sentinel_key);
    }

    let value =
        serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| IngestionError::Parse {
            format: IngestionFormat::Json,
            source: ParseFailure::Json(e),
        })?;

    let rows = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| json_value_to_row(item, sentinel_key))
            .collect(),
        other => vec![json_value_to_row(other, sentinel_key)],
    };
    Ok(rows)
}

/// Parse JSON-Lines text: every non-empty line is one JSON value.
///
/// Any line that is not valid JSON fails the whole parse with
/// [`IngestionError::MalformedRecord`], reporting its 1-based line number.
pub fn parse_json_lines_str(input: &str, sentinel_key: &str) -> IngestionResult<Vec<Row>> {
    let mut rows = Vec::new();
    for (idx0, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = serde_json::from_str::<serde_json::Value>(line).map_err(|source| {
            IngestionError::MalformedRecord {
                line: idx0 + 1,
                source,
            }
        })?;
        rows.push(json_value_to_row(value, sentinel_key));
    }
    Ok(rows)
}

fn looks_like_json_lines(text: &str) -> bool {
    let probe: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(LINES_PROBE)
        .collect();
    probe.len() > 1 && probe.iter().all(|l| l.starts_with('{'))
}

/// Convert one top-level JSON value into a row.
pub fn json_value_to_row(value: serde_json::Value, sentinel_key: &str) -> Row {
    match value {
        serde_json::Value::Object(map) => {
            map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
        }
        other => {
            let mut row = Row::new();
            row.insert(sentinel_key, Value::from(other));
            row
        }
    }
}
