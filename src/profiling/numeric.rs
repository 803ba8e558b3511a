//! Numeric distribution statistics.

use serde::Serialize;

/// Descriptive statistics for a numeric column.
///
/// Every field is `None` when the column has no numeric observations, which keeps "no data"
/// distinct from a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub std: Option<f64>,
    /// Minimum value.
    pub min: Option<f64>,
    /// 25th percentile.
    pub q1: Option<f64>,
    /// 50th percentile.
    pub median: Option<f64>,
    /// 75th percentile.
    pub q3: Option<f64>,
    /// Maximum value.
    pub max: Option<f64>,
}

impl NumericStats {
    /// All-`None` statistics.
    pub const EMPTY: NumericStats = NumericStats {
        mean: None,
        std: None,
        min: None,
        q1: None,
        median: None,
        q3: None,
        max: None,
    };

    /// Compute statistics over `values` (order irrelevant).
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::EMPTY;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            mean: Some(mean),
            std: Some(variance.sqrt()),
            min: sorted.first().copied(),
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q3: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Percentile of an ascending-sorted slice by linear interpolation between ranks.
///
/// `idx = p × (n − 1)`; when `idx` is fractional the result blends the two neighbouring values.
/// `p <= 0` and `p >= 1` clamp to the extremes. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if p <= 0.0 {
        return Some(sorted[0]);
    }
    if p >= 1.0 {
        return Some(sorted[n - 1]);
    }

    let idx = p * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = idx - lo as f64;
    Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
}
