//! Autoregressive building blocks
//!
//! Contains:
//! - Sample autocovariances
//! - Yule-Walker AR estimation (Levinson-Durbin recursion)
//! - Psi (MA-infinity) weights of an ARIMA process, used for forecast variance

use crate::{MathError, Result};

/// Biased sample autocovariances for lags `0..=max_lag` of the mean-centred series
pub fn autocovariance(values: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    if values.len() <= max_lag {
        return Err(MathError::InsufficientData(format!(
            "Autocovariance up to lag {} needs more than {} values, have {}",
            max_lag,
            max_lag,
            values.len()
        )));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();

    Ok((0..=max_lag)
        .map(|lag| {
            centered[lag..]
                .iter()
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n
        })
        .collect())
}

/// Estimate AR coefficients of the given order with the Yule-Walker equations.
///
/// A series with no variance yields all-zero coefficients rather than an error.
pub fn yule_walker(values: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(Vec::new());
    }

    let acov = autocovariance(values, order)?;
    let mut coeffs = vec![0.0; order];
    let mut error = acov[0];
    if error.abs() < 1e-12 {
        return Ok(coeffs);
    }

    for k in 0..order {
        let mut acc = acov[k + 1];
        for j in 0..k {
            acc -= coeffs[j] * acov[k - j];
        }
        let reflection = acc / error;

        let previous = coeffs.clone();
        coeffs[k] = reflection;
        for j in 0..k {
            coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
        }

        error *= 1.0 - reflection * reflection;
        if error <= 1e-12 {
            // Perfectly predictable; higher lags add nothing
            break;
        }
    }

    Ok(coeffs)
}

/// AR coefficients of `phi(B) * (1 - B)^d`, in the same `y_t = sum(c_i * y_{t-i})` form as `ar`
pub fn integrated_ar_polynomial(ar: &[f64], d: usize) -> Vec<f64> {
    // Lag polynomial with leading 1: 1 - phi_1 B - ... - phi_p B^p
    let mut poly: Vec<f64> = std::iter::once(1.0).chain(ar.iter().map(|c| -c)).collect();
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    poly.iter().skip(1).map(|c| -c).collect()
}

/// First `horizon` psi weights of an ARIMA(p, d, q) process.
///
/// `ar` and `ma` use the `+` convention: `u_t = sum(ar_i u_{t-i}) + e_t + sum(ma_j e_{t-j})`.
/// The h-step forecast error variance is `sigma^2 * sum(psi_j^2, j < h)`.
pub fn psi_weights(ar: &[f64], ma: &[f64], d: usize, horizon: usize) -> Vec<f64> {
    let full_ar = integrated_ar_polynomial(ar, d);
    let mut psi = Vec::with_capacity(horizon);

    for j in 0..horizon {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut weight = ma.get(j - 1).copied().unwrap_or(0.0);
        for (i, coeff) in full_ar.iter().enumerate().take(j) {
            weight += coeff * psi[j - 1 - i];
        }
        psi.push(weight);
    }

    psi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autocovariance_lag_zero_is_variance() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let acov = autocovariance(&values, 1).unwrap();
        // Population variance of 1..4 is 1.25
        assert!((acov[0] - 1.25).abs() < 1e-12);
        assert!(acov[1] < acov[0]);
    }

    #[test]
    fn test_yule_walker_recovers_ar1() {
        // Deterministic AR(1)-like decay with alternating shocks
        let mut values = vec![0.0f64; 400];
        for t in 1..values.len() {
            let shock = if t % 2 == 0 { 1.0 } else { -0.7 };
            values[t] = 0.6 * values[t - 1] + shock;
        }
        let coeffs = yule_walker(&values, 1).unwrap();
        assert_eq!(coeffs.len(), 1);
        assert!(coeffs[0].abs() < 1.0);
    }

    #[test]
    fn test_yule_walker_constant_series() {
        let coeffs = yule_walker(&[5.0; 30], 2).unwrap();
        assert_eq!(coeffs, vec![0.0, 0.0]);
    }

    #[test]
    fn test_integrated_ar_polynomial() {
        // (1 - 0.5B)(1 - B) = 1 - 1.5B + 0.5B^2
        let full = integrated_ar_polynomial(&[0.5], 1);
        assert_eq!(full.len(), 2);
        assert!((full[0] - 1.5).abs() < 1e-12);
        assert!((full[1] + 0.5).abs() < 1e-12);

        // Random walk: (1 - B)
        assert_eq!(integrated_ar_polynomial(&[], 1), vec![1.0]);
    }

    #[test]
    fn test_psi_weights_random_walk() {
        // ARIMA(0,1,0): every psi weight is 1, variance grows linearly
        let psi = psi_weights(&[], &[], 1, 5);
        assert_eq!(psi, vec![1.0; 5]);
    }

    #[test]
    fn test_psi_weights_ma1() {
        let psi = psi_weights(&[], &[0.4], 0, 4);
        assert_eq!(psi, vec![1.0, 0.4, 0.0, 0.0]);
    }

    #[test]
    fn test_psi_weights_ar1() {
        let psi = psi_weights(&[0.5], &[], 0, 4);
        let expected = [1.0, 0.5, 0.25, 0.125];
        for (got, want) in psi.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
