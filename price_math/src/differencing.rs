//! Differencing and its inverse
//!
//! Integrated models work on `d`-times differenced data; forecasts made on
//! that scale are cumulatively summed back onto the last observed levels.

use crate::{MathError, Result};

/// Difference a series `order` times. Each pass shortens it by one.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `order` differencing passes for values that continue `history`.
///
/// `forecasts` are on the `order`-times differenced scale and follow directly
/// after the end of `history` (the undifferenced series).
pub fn integrate(history: &[f64], forecasts: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(forecasts.to_vec());
    }
    if history.len() < order {
        return Err(MathError::InsufficientData(format!(
            "Integrating {} times needs at least {} observations, have {}",
            order,
            order,
            history.len()
        )));
    }

    // levels[k] is the k-times differenced history
    let mut levels = Vec::with_capacity(order);
    levels.push(history.to_vec());
    for k in 1..order {
        levels.push(difference(&levels[k - 1], 1));
    }

    let mut current = forecasts.to_vec();
    for level in levels.iter().rev() {
        let mut last = match level.last() {
            Some(&value) => value,
            None => {
                return Err(MathError::CalculationError(
                    "Differenced history is empty".to_string(),
                ))
            }
        };
        current = current
            .iter()
            .map(|step| {
                last += step;
                last
            })
            .collect();
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference() {
        let values = [1.0, 4.0, 9.0, 16.0, 25.0];
        assert_eq!(difference(&values, 0), values.to_vec());
        assert_eq!(difference(&values, 1), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&values, 2), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_integrate_first_order() {
        let history = [10.0, 11.0, 13.0];
        let level = integrate(&history, &[1.0, 1.0, -2.0], 1).unwrap();
        assert_eq!(level, vec![14.0, 15.0, 13.0]);
    }

    #[test]
    fn test_integrate_second_order_continues_quadratic() {
        let history: Vec<f64> = (1..=5).map(|x| (x * x) as f64).collect();
        // Second differences of x^2 are constant 2
        let level = integrate(&history, &[2.0, 2.0], 2).unwrap();
        assert_eq!(level, vec![36.0, 49.0]);
    }

    #[test]
    fn test_integrate_needs_history() {
        assert!(integrate(&[1.0], &[1.0], 2).is_err());
    }
}
