//! Product-moment (Pearson) correlation.

use crate::correlation::checked_pair;
use crate::error::{AnalysisError, Result};
use crate::testing::utils::centered_cross_products;
use num_traits::Float;

/// Pearson product-moment correlation coefficient of `x` and `y`.
///
/// Computed from centered sums of squares and cross products. The result is clamped into
/// `[-1, 1]` so that rounding never pushes a perfect linear relation past the boundary.
///
/// # Errors
///
/// * [`AnalysisError::ShapeMismatch`] if the vectors differ in length
/// * [`AnalysisError::DegenerateInput`] for fewer than three samples, non-finite values,
///   or a vector with zero variance
pub fn pearson<T>(x: &[T], y: &[T]) -> Result<f64>
where
    T: Float,
{
    let (x, y) = checked_pair(x, y)?;
    pearson_f64(&x, &y)
}

pub(crate) fn pearson_f64(x: &[f64], y: &[f64]) -> Result<f64> {
    // Centered sums of a constant vector are not exactly zero when its mean is not representable
    if is_constant(x) || is_constant(y) {
        return Err(AnalysisError::degenerate(
            "constant input vector, correlation is undefined",
        ));
    }

    let (sxx, syy, sxy) = centered_cross_products(x, y);

    if sxx <= 0.0 || syy <= 0.0 {
        return Err(AnalysisError::degenerate(
            "zero variance vector, correlation is undefined",
        ));
    }

    let r = sxy / (sxx * syy).sqrt();
    Ok(r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    }
}
