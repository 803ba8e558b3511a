//! Core data model for parsed uploads.
//!
//! Parsing produces a [`RecordSet`]: an ordered list of [`Row`]s, each an ordered mapping from
//! column name to a raw [`Value`], plus the set of columns discovered across all rows.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::ingestion::IngestionFormat;

/// A raw, loosely-typed cell value.
///
/// Delimited text only ever produces [`Value::Utf8`]; JSON can produce every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null / absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integral JSON number that fits in an `i64`.
    Int64(i64),
    /// Any other JSON number.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// JSON array.
    List(Vec<Value>),
    /// JSON object, keys in document order.
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// Returns `true` for values that count as missing: null and the empty string.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns `true` for [`Value::List`] and [`Value::Struct`].
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Struct(_))
    }

    /// Canonical text form used for top-value counts, the memory estimate and export.
    ///
    /// Floats use the shortest round-trip JSON form (`1.0`, `2.5`); composite values are
    /// rendered as JSON with object keys sorted. `Null` renders as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int64(n) => n.to_string(),
            Value::Float64(f) => float_text(*f),
            Value::Utf8(s) => s.clone(),
            Value::List(_) | Value::Struct(_) => self.to_canonical_json(),
        }
    }

    /// Stable JSON rendering with object keys sorted at every level.
    pub fn to_canonical_json(&self) -> String {
        let mut out = String::new();
        write_canonical(self, &mut out);
        out
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        serde_json::Number::from_f64(f)
            .map(|n| n.to_string())
            .unwrap_or_else(|| f.to_string())
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(_) | Value::Int64(_) => out.push_str(&value.to_text()),
        // Non-finite floats have no JSON form.
        Value::Float64(f) if !f.is_finite() => out.push_str("null"),
        Value::Float64(f) => out.push_str(&float_text(*f)),
        Value::Utf8(s) => out.push_str(&serde_json::Value::String(s.clone()).to_string()),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Struct(fields) => {
            let mut sorted: Vec<&(String, Value)> = fields.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            out.push('{');
            for (i, (k, v)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int64(i),
                None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Utf8(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Struct(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int64(n) => serializer.serialize_i64(*n),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Utf8(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Struct(fields) => serialize_fields(fields, serializer),
        }
    }
}

fn serialize_fields<S: Serializer>(
    fields: &[(String, Value)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (k, v) in fields {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// One parsed record: column name to raw value, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Value for `key`, or `None` when the row has no such field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate `(name, value)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate field names in row order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields present in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(&self.fields, serializer)
    }
}

/// Inferred column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// At least the configured share of observed values coerce to a number.
    Number,
    /// Everything else, including columns with no observed values.
    String,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Number => write!(f, "number"),
            ColumnKind::String => write!(f, "string"),
        }
    }
}

/// Rows parsed from one upload.
///
/// `columns` is the union of all row keys in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    /// Format the rows were parsed with.
    pub format: IngestionFormat,
    /// Discovered columns in first-seen order.
    pub columns: Vec<String>,
    /// Parsed rows, in input order.
    pub rows: Vec<Row>,
}

impl RecordSet {
    /// Create a record set and discover its columns from `rows`.
    pub fn new(format: IngestionFormat, rows: Vec<Row>) -> Self {
        let columns = discover_columns(&rows);
        Self { format, columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of discovered columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Create a new record set containing only rows that match `predicate`.
    ///
    /// Columns are rediscovered from the surviving rows.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        let rows = self.rows.iter().filter(|row| predicate(row)).cloned().collect();
        Self::new(self.format, rows)
    }

    /// Create a new record set by applying `mapper` to every row.
    ///
    /// Columns are rediscovered from the mapped rows, so mappers may rename or drop fields.
    pub fn map_rows<F>(&self, mapper: F) -> Self
    where
        F: FnMut(&Row) -> Row,
    {
        let rows = self.rows.iter().map(mapper).collect();
        Self::new(self.format, rows)
    }
}

/// Union of all keys across `rows`, in first-seen order.
pub fn discover_columns(rows: &[Row]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}
