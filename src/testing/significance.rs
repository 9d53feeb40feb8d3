//! t-statistics, p-values and Fisher-z confidence intervals for correlation coefficients.
//!
//! For a coefficient `r` computed from `n` paired samples:
//!
//! - `t = r * sqrt(n - 2) / sqrt(1 - r^2)`, with `n - 2` degrees of freedom
//! - `p = 2 * (1 - CDF_t(|t|))`
//! - the confidence interval is built in Fisher z-space, `z = atanh(r)` with standard error
//!   `1 / sqrt(n - 3)`, and mapped back with `tanh`

use crate::correlation::MIN_SAMPLES;
use crate::error::{AnalysisError, Result};
use crate::testing::Significance;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// t-statistic of a correlation coefficient.
///
/// Fails with [`AnalysisError::DegenerateInput`] when `|r| == 1` (division by zero) or
/// when `df` is not positive.
pub fn t_statistic(r: f64, df: f64) -> Result<f64> {
    if !(df > 0.0) {
        return Err(AnalysisError::degenerate(format!(
            "degrees of freedom must be positive, got {}",
            df
        )));
    }
    if !r.is_finite() || r.abs() >= 1.0 {
        return Err(AnalysisError::degenerate(format!(
            "t-statistic is undefined for correlation {}",
            r
        )));
    }

    Ok(r * df.sqrt() / (1.0 - r * r).sqrt())
}

/// Two-tailed p-value of `t` under a Student's t distribution with `df` degrees of freedom.
pub fn two_tailed_p_value(t: f64, df: f64) -> Result<f64> {
    let dist = students_t(df)?;
    Ok(two_tailed_from(&dist, t))
}

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| AnalysisError::Distribution(e.to_string()))
}

fn two_tailed_from(dist: &StudentsT, t: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    let cdf_val = dist.cdf(t.abs());
    (2.0 * (1.0 - cdf_val)).clamp(0.0, 1.0)
}

/// Two-sided critical value of the standard normal distribution (1.959964 for 0.95).
pub fn z_critical(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "confidence level must lie in (0, 1), got {}",
            confidence_level
        )));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Distribution(e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Fisher z-transform confidence interval for `r` from `n` samples.
///
/// # Errors
///
/// * [`AnalysisError::DegenerateInput`] if `n <= 3` or `|r| == 1`
/// * [`AnalysisError::InvalidParameter`] if `confidence_level` is outside `(0, 1)`
pub fn fisher_confidence_interval(r: f64, n: usize, confidence_level: f64) -> Result<(f64, f64)> {
    let z_crit = z_critical(confidence_level)?;
    fisher_interval_with(r, n, z_crit)
}

fn fisher_interval_with(r: f64, n: usize, z_crit: f64) -> Result<(f64, f64)> {
    if n <= 3 {
        return Err(AnalysisError::degenerate(format!(
            "confidence interval needs more than 3 samples, got {}",
            n
        )));
    }
    if !r.is_finite() || r.abs() >= 1.0 {
        return Err(AnalysisError::degenerate(format!(
            "Fisher transform is undefined for correlation {}",
            r
        )));
    }

    let z = r.atanh();
    let standard_error = 1.0 / ((n - 3) as f64).sqrt();

    let z_lower = z - z_crit * standard_error;
    let z_upper = z + z_crit * standard_error;

    Ok((z_lower.tanh(), z_upper.tanh()))
}

/// Computes [`Significance`] for many coefficients sharing one sample count and confidence level.
///
/// The t distribution and the normal critical value are built once in [`new`](Self::new).
#[derive(Debug, Clone)]
pub struct SignificanceCalculator {
    n_samples: usize,
    degrees_of_freedom: f64,
    t_dist: StudentsT,
    z_crit: f64,
}

impl SignificanceCalculator {
    pub fn new(n_samples: usize, confidence_level: f64) -> Result<Self> {
        if n_samples < MIN_SAMPLES {
            return Err(AnalysisError::degenerate(format!(
                "at least {} samples are required, got {}",
                MIN_SAMPLES, n_samples
            )));
        }

        let degrees_of_freedom = (n_samples - 2) as f64;
        Ok(SignificanceCalculator {
            n_samples,
            degrees_of_freedom,
            t_dist: students_t(degrees_of_freedom)?,
            z_crit: z_critical(confidence_level)?,
        })
    }

    pub fn assess(&self, r: f64) -> Result<Significance> {
        let t_value = t_statistic(r, self.degrees_of_freedom)?;
        let p_value = two_tailed_from(&self.t_dist, t_value);
        let (conf_lower, conf_upper) = fisher_interval_with(r, self.n_samples, self.z_crit)?;

        Ok(Significance {
            t_value,
            p_value,
            conf_lower,
            conf_upper,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_t_statistic() {
        // r = 0.8, n = 5
        let t = t_statistic(0.8, 3.0).unwrap();
        assert_relative_eq!(t, 0.8 * 3.0_f64.sqrt() / 0.6, epsilon = 1e-12);
        assert_relative_eq!(t_statistic(-0.8, 3.0).unwrap(), -t, epsilon = 1e-12);
        assert_eq!(t_statistic(0.0, 3.0).unwrap(), 0.0);
    }

    #[test]
    fn test_t_statistic_perfect_correlation() {
        assert!(matches!(t_statistic(1.0, 3.0), Err(AnalysisError::DegenerateInput(_))));
        assert!(matches!(t_statistic(-1.0, 3.0), Err(AnalysisError::DegenerateInput(_))));
        assert!(matches!(t_statistic(0.5, 0.0), Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn test_p_value_reference() {
        // scipy.stats.pearsonr([1, 2, 3, 4, 5], [2, 1, 4, 3, 5]).pvalue
        let t = t_statistic(0.8, 3.0).unwrap();
        let p = two_tailed_p_value(t, 3.0).unwrap();
        assert_relative_eq!(p, 0.10408803866182788, epsilon = 1e-6);
    }

    #[test]
    fn test_p_value_monotonic_in_t() {
        for df in [1.0, 3.0, 10.0, 50.0] {
            let mut previous = 1.0;
            for step in 0..200 {
                let t = step as f64 * 0.1;
                let p = two_tailed_p_value(t, df).unwrap();
                assert!((0.0..=1.0).contains(&p), "p = {} out of range", p);
                assert!(p <= previous + 1e-12, "p increased at t = {}", t);
                // Symmetric in the sign of t
                assert_relative_eq!(two_tailed_p_value(-t, df).unwrap(), p, epsilon = 1e-12);
                previous = p;
            }
        }
    }

    #[test]
    fn test_p_value_at_zero() {
        assert_relative_eq!(two_tailed_p_value(0.0, 5.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_z_critical() {
        assert_relative_eq!(z_critical(0.95).unwrap(), 1.959964, epsilon = 1e-6);
        assert_relative_eq!(z_critical(0.99).unwrap(), 2.575829, epsilon = 1e-6);
        assert!(matches!(z_critical(1.0), Err(AnalysisError::InvalidParameter(_))));
        assert!(matches!(z_critical(0.0), Err(AnalysisError::InvalidParameter(_))));
        assert!(matches!(z_critical(f64::NAN), Err(AnalysisError::InvalidParameter(_))));
    }

    #[test]
    fn test_confidence_interval_reference() {
        let (lower, upper) = fisher_confidence_interval(0.8, 5, 0.95).unwrap();
        assert_relative_eq!(lower, -0.2796, epsilon = 1e-3);
        assert_relative_eq!(upper, 0.9862, epsilon = 1e-3);
    }

    #[test]
    fn test_confidence_interval_contains_r() {
        for n in [4, 5, 10, 100] {
            for step in -19..=19 {
                let r = step as f64 * 0.05;
                let (lower, upper) = fisher_confidence_interval(r, n, 0.95).unwrap();
                assert!(lower <= r && r <= upper, "r = {} not in [{}, {}]", r, lower, upper);
                assert!(lower >= -1.0 && upper <= 1.0);
            }
        }
    }

    #[test]
    fn test_confidence_interval_too_few_samples() {
        assert!(matches!(
            fisher_confidence_interval(0.5, 3, 0.95),
            Err(AnalysisError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_wider_level_gives_wider_interval() {
        let (l95, u95) = fisher_confidence_interval(0.3, 20, 0.95).unwrap();
        let (l99, u99) = fisher_confidence_interval(0.3, 20, 0.99).unwrap();
        assert!(l99 < l95 && u99 > u95);
    }

    #[test]
    fn test_calculator_matches_free_functions() {
        let calculator = SignificanceCalculator::new(12, 0.95).unwrap();

        let significance = calculator.assess(-0.45).unwrap();
        let t = t_statistic(-0.45, 10.0).unwrap();
        let (lower, upper) = fisher_confidence_interval(-0.45, 12, 0.95).unwrap();

        assert_relative_eq!(significance.t_value, t, epsilon = 1e-12);
        assert_relative_eq!(
            significance.p_value,
            two_tailed_p_value(t, 10.0).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(significance.conf_lower, lower, epsilon = 1e-12);
        assert_relative_eq!(significance.conf_upper, upper, epsilon = 1e-12);
    }

    #[test]
    fn test_calculator_rejects_perfect_correlation() {
        let calculator = SignificanceCalculator::new(5, 0.95).unwrap();
        assert!(matches!(calculator.assess(1.0), Err(AnalysisError::DegenerateInput(_))));
    }
}
