//! Pearson correlation.
//!
//! Computed with the two-pass (mean-centred) form
//!
//! ```text
//! r = Σ(x − x̄)(y − ȳ) / sqrt(Σ(x − x̄)² · Σ(y − ȳ)²)
//! ```
//!
//! which avoids the cancellation of the raw-sums formula when values are large
//! relative to their spread (token amounts often are).

use crate::domain::CorrelationResult;
use crate::error::AppError;

/// Pearson product-moment correlation of `xs` and `ys`.
pub fn compute_correlation(xs: &[f64], ys: &[f64]) -> Result<CorrelationResult, AppError> {
    if xs.len() != ys.len() {
        return Err(AppError::degenerate(format!(
            "correlation needs equal-length series, got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    if n < 2 {
        return Err(AppError::degenerate(format!(
            "correlation needs at least 2 points, got {n}"
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(AppError::degenerate("correlation input contains non-finite values"));
    }
    // A constant series can leave rounding residue in the centred sums.
    if is_constant(xs) || is_constant(ys) {
        return Err(AppError::degenerate(
            "correlation is undefined when a series has zero variance",
        ));
    }

    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(AppError::degenerate(
            "correlation is undefined when a series has zero variance",
        ));
    }

    let r = cov / (var_x * var_y).sqrt();
    Ok(CorrelationResult {
        coefficient: r.clamp(-1.0, 1.0),
        n,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}
