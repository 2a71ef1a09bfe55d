//! Descriptive statistics shared by the strategies.

use std::cmp::Ordering;

/// Arithmetic mean. Empty input yields 0.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation around `mean`.
pub fn population_std(data: &[f64], mean: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Whether every value in `data` is identical. Empty input counts as
/// constant.
pub fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

/// Ascending copy of the data.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Percentile of already sorted data with linear interpolation between
/// adjacent order statistics: rank = p / 100 * (n - 1).
///
/// Returns NaN for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let rank = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    let lo = sorted[lower_idx];
    let hi = sorted[upper_idx];
    lo + (hi - lo) * fraction
}
