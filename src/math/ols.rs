//! Ordinary least squares trend line.
//!
//! The trend is a straight line fitted to a series against its index positions:
//!
//! ```text
//! x_i = i            (0, 1, 2, ...)
//! slope     = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / n
//! ```
//!
//! Because `x` is always `0..n`, the denominator is only zero for `n < 2`, but it
//! is still checked explicitly.

use crate::domain::TrendResult;
use crate::error::AppError;

/// Fit `y = slope * i + intercept` over `values`.
pub fn compute_trend_line(values: &[f64]) -> Result<TrendResult, AppError> {
    let n = values.len();
    if n < 2 {
        return Err(AppError::degenerate(format!(
            "trend line needs at least 2 points, got {n}"
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::degenerate("trend line input contains non-finite values"));
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return Err(AppError::degenerate("trend line denominator is zero"));
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    let fitted_values = (0..n).map(|i| slope * i as f64 + intercept).collect();

    Ok(TrendResult {
        slope,
        intercept,
        fitted_values,
    })
}
