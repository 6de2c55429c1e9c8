//! Trailing window averages
//!
//! `SimpleMovingAverage` holds the last `period` values and averages them on
//! demand; `trailing_mean` feeds a whole slice through it and reports the
//! final window.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Push a value, evicting the oldest once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Whether the window holds `period` values
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.period
    }
}

/// Mean of the last `window` values.
///
/// Returns `None` (never zero) when the slice is shorter than the window, so
/// callers can tell "not enough data" apart from a computed value.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    let mut sma = SimpleMovingAverage::new(window).ok()?;
    for &value in values.iter().skip(values.len().saturating_sub(window)) {
        sma.update(value);
    }
    sma.value().ok()
}
