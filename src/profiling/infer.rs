//! Column type inference.
//!
//! A column is `number` when at least `ceil(pct% × observed)` of its observed values coerce to a
//! float (and at least one does); otherwise it is `string`.

use crate::types::{ColumnKind, Value};

/// Default share of coercible values, in percent, required to infer a numeric column.
pub const DEFAULT_NUMERIC_MIN_PERCENT: u32 = 70;

/// Result of inferring one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Inferred kind.
    pub kind: ColumnKind,
    /// Coerced values in observation order; always empty for [`ColumnKind::String`].
    pub numeric_values: Vec<f64>,
}

/// Coerce a raw value to a float.
///
/// Numbers pass through; strings are trimmed, stripped of `,` thousands separators and parsed.
/// Booleans, nulls and composite values never coerce.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int64(n) => Some(*n as f64),
        Value::Float64(f) => Some(*f),
        Value::Utf8(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok()
        }
        Value::Null | Value::Bool(_) | Value::List(_) | Value::Struct(_) => None,
    }
}

/// Minimum number of coercible values for a numeric column of `observed` values.
pub fn required_numeric(observed: usize, numeric_min_percent: u32) -> usize {
    let pct = numeric_min_percent as usize;
    (observed * pct).div_ceil(100).max(1)
}

/// Infer the kind of a column from its observed (non-missing) values.
pub fn infer_column(observed: &[&Value], numeric_min_percent: u32) -> Inference {
    let numeric_values: Vec<f64> = observed.iter().filter_map(|v| coerce_number(v)).collect();

    let required = required_numeric(observed.len(), numeric_min_percent);
    if !numeric_values.is_empty() && numeric_values.len() >= required {
        Inference {
            kind: ColumnKind::Number,
            numeric_values,
        }
    } else {
        Inference {
            kind: ColumnKind::String,
            numeric_values: Vec::new(),
        }
    }
}
