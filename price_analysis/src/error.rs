//! Error types for the price_analysis crate

use price_math::MathError;
use thiserror::Error;

/// Why a forecast could not be produced.
///
/// Every variant is terminal for the request; the engine never retries or
/// adjusts parameters on its own.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// The series has no points at all
    #[error("No historical data")]
    NoHistoricalData,

    /// The provider supplied no close-price column
    #[error("Missing close column")]
    MissingCloseColumn,

    /// Fewer usable closes than the model order needs
    #[error("Not enough data for the requested model order: need at least {required} closes, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Alpha must lie strictly between 0 and 1
    #[error("Alpha out of range: {0} (must be strictly between 0 and 1)")]
    AlphaOutOfRange(f64),

    /// Log-domain fitting was requested on a series with a zero or negative close
    #[error("Cannot log-transform non-positive prices")]
    NonPositivePrice,

    /// No model-fitting capability is installed
    #[error("Forecasting capability unavailable")]
    CapabilityUnavailable,

    /// A request parameter is malformed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The model fit or projection failed
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// Error from the numeric layer
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Coarse classification of [`ForecastError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastErrorKind {
    /// The inputs or request are unsuitable; changing them may help
    Precondition,
    /// The deployment lacks the fitting capability; changing inputs will not help
    CapabilityUnavailable,
    /// The fit itself failed
    Internal,
}

impl ForecastError {
    /// Classify the error for callers deciding between "fix the input" and "disable forecasting"
    pub fn kind(&self) -> ForecastErrorKind {
        match self {
            ForecastError::NoHistoricalData
            | ForecastError::MissingCloseColumn
            | ForecastError::InsufficientData { .. }
            | ForecastError::AlphaOutOfRange(_)
            | ForecastError::NonPositivePrice
            | ForecastError::InvalidParameter(_) => ForecastErrorKind::Precondition,
            ForecastError::CapabilityUnavailable => ForecastErrorKind::CapabilityUnavailable,
            ForecastError::ModelFit(_) | ForecastError::Math(_) => ForecastErrorKind::Internal,
        }
    }
}

/// Result type for forecasting
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors from loading or providing price data
#[derive(Debug, Error)]
pub enum DataError {
    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The data violates a series invariant
    #[error("Invalid series: {0}")]
    Invalid(String),

    /// The provider has nothing for the requested symbol
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors from resolving configuration values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A value could not be interpreted
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
