//! Correlation coefficients between two sample vectors.
//!
//! The engine supports the product-moment (Pearson) coefficient and the rank (Spearman)
//! coefficient. Both share the same preconditions:
//!
//! - `x` and `y` have the same length, otherwise [`AnalysisError::ShapeMismatch`]
//! - at least three samples, so that downstream degrees of freedom are positive
//! - finite values with nonzero variance, otherwise [`AnalysisError::DegenerateInput`]

use crate::error::{AnalysisError, Result};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod nonparametric;
pub mod parametric;

/// Smallest sample count a coefficient can be tested with (df = n - 2 must be positive).
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    pub const ALL: [CorrelationMethod; 2] =
        [CorrelationMethod::Pearson, CorrelationMethod::Spearman];

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
        }
    }

    /// Human-readable label used in log output ("Pearson", "Spearman").
    pub fn label(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson",
            CorrelationMethod::Spearman => "Spearman",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelationMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            other => Err(AnalysisError::InvalidMethod(other.to_string())),
        }
    }
}

/// Compute the correlation coefficient between `x` and `y` using `method`.
///
/// # Arguments
///
/// * `x` - Reference sample vector (the pollution profile)
/// * `y` - Sample vector of one feature (an enzyme row)
/// * `method` - Pearson or Spearman
///
/// # Returns
///
/// The coefficient in `[-1, 1]`.
pub fn correlate<T>(x: &[T], y: &[T], method: CorrelationMethod) -> Result<f64>
where
    T: Float,
{
    match method {
        CorrelationMethod::Pearson => parametric::pearson(x, y),
        CorrelationMethod::Spearman => nonparametric::spearman(x, y),
    }
}

/// Validate the shared preconditions and convert both vectors to `f64`.
pub(crate) fn checked_pair<T>(x: &[T], y: &[T]) -> Result<(Vec<f64>, Vec<f64>)>
where
    T: Float,
{
    if x.len() != y.len() {
        return Err(AnalysisError::ShapeMismatch {
            enzyme: String::new(),
            expected: x.len(),
            found: y.len(),
        });
    }
    if x.len() < MIN_SAMPLES {
        return Err(AnalysisError::degenerate(format!(
            "at least {} samples are required, got {}",
            MIN_SAMPLES,
            x.len()
        )));
    }

    let to_f64 = |values: &[T]| -> Result<Vec<f64>> {
        values
            .iter()
            .map(|v| match v.to_f64() {
                Some(f) if f.is_finite() => Ok(f),
                _ => Err(AnalysisError::degenerate("non-finite sample value")),
            })
            .collect()
    };

    Ok((to_f64(x)?, to_f64(y)?))
}
