//! Descriptive statistics over price slices
//!
//! Thin, error-returning wrappers around `statrs` so callers get a
//! `MathError` instead of a silent `NaN` on empty input.

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

fn require_values(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(format!(
            "Cannot calculate {} of an empty series",
            what
        )));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    require_values(values, "mean")?;
    Ok(values.mean())
}

/// Largest value
pub fn max(values: &[f64]) -> Result<f64> {
    require_values(values, "maximum")?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Smallest value
pub fn min(values: &[f64]) -> Result<f64> {
    require_values(values, "minimum")?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Sample standard deviation (N - 1 denominator)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample standard deviation needs at least 2 values, have {}",
            values.len()
        )));
    }
    Ok(values.std_dev())
}

/// Quantile of the standard normal distribution at probability `p`
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Quantile probability must be in (0, 1), got {}",
            p
        )));
    }
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal: {}", e)))?;
    Ok(standard.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_min_max() {
        let values = [4.0, 1.0, 7.0, 2.0];
        assert!((mean(&values).unwrap() - 3.5).abs() < 1e-12);
        assert_eq!(max(&values).unwrap(), 7.0);
        assert_eq!(min(&values).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(mean(&[]), Err(MathError::InsufficientData(_))));
        assert!(max(&[]).is_err());
        assert!(min(&[]).is_err());
    }

    #[test]
    fn test_sample_std_dev() {
        // Sample variance of 2, 4, 4, 4, 5, 5, 7, 9 is 32 / 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values).unwrap() - expected).abs() < 1e-12);

        assert!(sample_std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_normal_quantile() {
        assert!(normal_quantile(0.5).unwrap().abs() < 1e-9);
        assert!((normal_quantile(0.975).unwrap() - 1.959964).abs() < 1e-4);
        // alpha = 0.4 gives an 80% two-sided band
        assert!((normal_quantile(0.8).unwrap() - 0.841621).abs() < 1e-4);
        assert!(normal_quantile(0.0).is_err());
        assert!(normal_quantile(1.0).is_err());
    }
}
