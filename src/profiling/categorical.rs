//! Cardinality and top-value counts.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::Value;

/// Identity used for distinct counting.
///
/// Scalars compare structurally; integral floats collapse onto the integer key so `1` and `1.0`
/// count once. Composite values are keyed by their canonical (sorted-key) JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniqueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
    Composite(String),
}

// 2^63 as f64; floats in [-2^63, 2^63) convert to i64 exactly when integral.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl UniqueKey {
    /// Key for one raw value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => UniqueKey::Null,
            Value::Bool(b) => UniqueKey::Bool(*b),
            Value::Int64(n) => UniqueKey::Int(*n),
            Value::Float64(f) if f.fract() == 0.0 && *f >= -I64_BOUND && *f < I64_BOUND => {
                UniqueKey::Int(*f as i64)
            }
            Value::Float64(f) if f.is_nan() => UniqueKey::Float(f64::NAN.to_bits()),
            Value::Float64(f) => UniqueKey::Float(f.to_bits()),
            Value::Utf8(s) => UniqueKey::Text(s.clone()),
            Value::List(_) | Value::Struct(_) => UniqueKey::Composite(value.to_canonical_json()),
        }
    }
}

/// Number of distinct values.
pub fn count_unique(values: &[&Value]) -> usize {
    values.iter().map(|v| UniqueKey::of(v)).collect::<HashSet<_>>().len()
}

/// One entry of a top-values list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// Text form of the value (see [`Value::to_text`]).
    pub value: String,
    /// Number of occurrences.
    pub count: usize,
}

/// The `k` most frequent text forms, by descending count; ties keep first-encountered order.
pub fn top_values(values: &[&Value], k: usize) -> Vec<ValueCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for v in values {
        if v.is_missing() {
            continue;
        }
        let text = v.to_text();
        match index.get(&text) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(text.clone(), counts.len());
                counts.push(ValueCount { value: text, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(k);
    counts
}
