use crate::error::MetricError;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns a copy of `values` sorted ascending.
///
/// Callers are expected to have rejected NaN beforehand; `total_cmp` keeps the
/// sort total either way.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Quantile of an ascending slice by linear interpolation between order
/// statistics (the `(n - 1) * q` rank definition). `q` is clamped to `[0, 1]`.
/// Returns 0.0 for empty input.
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let rank = q.clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

/// Quantile of an unsorted slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted(values), q)
}

/// Median of an unsorted slice.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Rejects empty groups and non-finite measurements.
pub(crate) fn check_group(values: &[f64], metric: &'static str) -> Result<(), MetricError> {
    if values.is_empty() {
        return Err(MetricError::EmptyGroup { metric });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MetricError::NonFinite { metric });
    }
    Ok(())
}
