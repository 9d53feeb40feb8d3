//! Ranking and significance filtering of correlation result tables.

use crate::error::{AnalysisError, Result};
use crate::testing::CorrelationResult;
use std::cmp::Ordering;

/// Rule used to select the significant subset of a ranked result table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterRule {
    /// Keep the longest prefix whose running p-value sum stays at or below 1.0
    #[default]
    CumulativePValue,
    /// Keep results whose Benjamini-Hochberg adjusted p-value is below `alpha`
    BenjaminiHochberg { alpha: f64 },
}

impl FilterRule {
    /// Select the significant results of a table already sorted with [`rank_descending`].
    pub fn apply(&self, ranked: &[CorrelationResult]) -> Result<Vec<CorrelationResult>> {
        match *self {
            FilterRule::CumulativePValue => Ok(cumulative_p_value_filter(ranked).to_vec()),
            FilterRule::BenjaminiHochberg { alpha } => benjamini_hochberg_filter(ranked, alpha),
        }
    }
}

/// Sort results by correlation coefficient, largest first.
///
/// The sort is stable: results with identical coefficients keep their input order.
pub fn rank_descending(results: &mut [CorrelationResult]) {
    results.sort_by(|a, b| {
        b.correlation
            .partial_cmp(&a.correlation)
            .unwrap_or(Ordering::Equal)
    });
}

/// Running-sum significance cutoff.
///
/// Walks the ranked table adding up p-values and returns the prefix of records included
/// while `running_sum + p <= 1.0`. The walk stops at the first record that would push the
/// sum over 1.0; neither it nor any later record is included.
///
/// This is not the textbook Benjamini-Hochberg step-up procedure, which compares each
/// p-value against `(rank / m) * alpha`; see [`benjamini_hochberg_correction`] for that.
///
/// # Example
/// ```
/// use enzyme_correlation::testing::CorrelationResult;
/// use enzyme_correlation::testing::correction::cumulative_p_value_filter;
///
/// let row = |name: &str, r: f64, p: f64| CorrelationResult {
///     enzyme: name.to_string(),
///     correlation: r,
///     t_value: 0.0,
///     p_value: p,
///     conf_lower: -1.0,
///     conf_upper: 1.0,
/// };
/// let ranked = vec![row("a", 0.9, 0.4), row("b", 0.5, 0.5), row("c", 0.1, 0.2)];
/// assert_eq!(cumulative_p_value_filter(&ranked).len(), 2);
/// ```
pub fn cumulative_p_value_filter(ranked: &[CorrelationResult]) -> &[CorrelationResult] {
    let mut total_probability = 0.0;
    let mut cutoff = ranked.len();

    for (i, result) in ranked.iter().enumerate() {
        if total_probability + result.p_value <= 1.0 {
            total_probability += result.p_value;
        } else {
            cutoff = i;
            break;
        }
    }

    &ranked[..cutoff]
}

fn benjamini_hochberg_filter(
    ranked: &[CorrelationResult],
    alpha: f64,
) -> Result<Vec<CorrelationResult>> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "alpha must lie in (0, 1], got {}",
            alpha
        )));
    }
    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let p_values: Vec<f64> = ranked.iter().map(|r| r.p_value).collect();
    let adjusted = benjamini_hochberg_correction(&p_values)?;

    Ok(ranked
        .iter()
        .zip(adjusted)
        .filter_map(|(result, q)| if q < alpha { Some(result.clone()) } else { None })
        .collect())
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the expected
/// proportion of false positives among all rejected null hypotheses.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values, in input order
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    let n = p_values.len();
    if n == 0 {
        return Err(AnalysisError::InvalidParameter(
            "Empty p-value array".to_string(),
        ));
    }

    // Validate p-values
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(AnalysisError::InvalidParameter(format!(
                "Invalid p-value at index {}: {}",
                i, p
            )));
        }
    }

    let mut indexed_p_values: Vec<(usize, f64)> =
        p_values.iter().enumerate().map(|(i, &p)| (i, p)).collect();

    // Sort in ascending order
    indexed_p_values.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min = 1.0;

    // Process from largest to smallest p-value
    for i in (0..n).rev() {
        let (orig_idx, p_val) = indexed_p_values[i];
        let rank = i + 1;

        let adjustment = (p_val * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}
