//! Descriptive statistics for a single projection of the quote series.

use crate::domain::SeriesStats;
use crate::error::AppError;

/// Count, mean, min and max of `values`.
pub fn summarize(values: &[f64]) -> Result<SeriesStats, AppError> {
    if values.is_empty() {
        return Err(AppError::degenerate("cannot summarize an empty series"));
    }

    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    Ok(SeriesStats {
        count: values.len(),
        mean: sum / values.len() as f64,
        min,
        max,
    })
}
