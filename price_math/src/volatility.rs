//! Return-based volatility
//!
//! Volatility here is the sample standard deviation of period-over-period
//! percentage changes. It is not annualized.

use crate::descriptive::sample_std_dev;

/// Period-over-period percentage changes, `(p[t] - p[t-1]) / p[t-1]`.
///
/// The first price has no predecessor and produces no entry. Changes that are
/// not finite (a zero predecessor) are dropped.
pub fn pct_change(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|change| change.is_finite())
        .collect()
}

/// Sample standard deviation of percentage changes, `0.0` with fewer than two changes
pub fn return_volatility(prices: &[f64]) -> f64 {
    let changes = pct_change(prices);
    sample_std_dev(&changes).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_change() {
        let changes = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(changes.len(), 2);
        assert!((changes[0] - 0.10).abs() < 1e-12);
        assert!((changes[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_skips_zero_base() {
        let changes = pct_change(&[0.0, 5.0, 10.0]);
        assert_eq!(changes, vec![1.0]);
    }

    #[test]
    fn test_return_volatility() {
        // Changes: +10%, -10%; sample std of [0.1, -0.1] = sqrt(0.02)
        let vol = return_volatility(&[100.0, 110.0, 99.0]);
        assert!((vol - 0.02f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_return_volatility_short_series() {
        assert_eq!(return_volatility(&[]), 0.0);
        assert_eq!(return_volatility(&[100.0]), 0.0);
        // One change is not enough for a sample deviation
        assert_eq!(return_volatility(&[100.0, 105.0]), 0.0);
    }
}
