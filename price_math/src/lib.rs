//! # Price Math
//!
//! Numeric building blocks for price statistics and time series models.
//! Everything here works on plain `f64` slices and knows nothing about dates,
//! currencies or series metadata.

use thiserror::Error;

pub mod autoregression;
pub mod descriptive;
pub mod differencing;
pub mod moving_averages;
pub mod optimize;
pub mod regression;
pub mod volatility;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
