//! Significance testing of correlation coefficients.
//!
//! A [`CorrelationScore`] is the raw coefficient of one enzyme. Attaching a [`Significance`]
//! (t-statistic, p-value and confidence interval) turns it into a [`CorrelationResult`], the
//! row type of every report table.

use serde::{Deserialize, Serialize};

pub mod correction;
pub mod significance;

pub mod utils;

/// Correlation coefficient of one enzyme before significance is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationScore {
    pub enzyme: String,
    pub correlation: f64,
}

impl CorrelationScore {
    pub fn new(enzyme: impl Into<String>, correlation: f64) -> Self {
        CorrelationScore {
            enzyme: enzyme.into(),
            correlation,
        }
    }
}

/// Significance of a single coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Significance {
    /// t-statistic with `n - 2` degrees of freedom
    pub t_value: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    /// Lower bound of the Fisher-z confidence interval
    pub conf_lower: f64,
    /// Upper bound of the Fisher-z confidence interval
    pub conf_upper: f64,
}

/// One row of a correlation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    #[serde(rename = "Enzyme")]
    pub enzyme: String,
    #[serde(rename = "Correlation")]
    pub correlation: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub conf_lower: f64,
    pub conf_upper: f64,
}

impl CorrelationResult {
    pub fn new(score: CorrelationScore, significance: Significance) -> Self {
        CorrelationResult {
            enzyme: score.enzyme,
            correlation: score.correlation,
            t_value: significance.t_value,
            p_value: significance.p_value,
            conf_lower: significance.conf_lower,
            conf_upper: significance.conf_upper,
        }
    }
}
