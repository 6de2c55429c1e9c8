//! Model-fitting capability used by the forecast engine
//!
//! The engine only knows the [`ModelFitter`] trait. The built-in
//! [`arima::CssArima`] is compiled in with the `arima` feature; without it the
//! engine reports the capability as unavailable.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "arima")]
pub mod arima;

/// Deterministic trend terms of the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSpec {
    /// No trend
    #[serde(rename = "n")]
    None,
    /// Constant
    #[serde(rename = "c")]
    Constant,
    /// Linear time trend
    #[default]
    #[serde(rename = "t")]
    Linear,
    /// Constant plus linear time trend
    #[serde(rename = "ct")]
    ConstantLinear,
}

impl TrendSpec {
    /// Short code as used in configuration (`n`, `c`, `t`, `ct`)
    pub fn as_code(&self) -> &'static str {
        match self {
            TrendSpec::None => "n",
            TrendSpec::Constant => "c",
            TrendSpec::Linear => "t",
            TrendSpec::ConstantLinear => "ct",
        }
    }

    /// Regressor values at time index `t` (1 for the first observation)
    pub fn regressors(&self, t: f64) -> Vec<f64> {
        match self {
            TrendSpec::None => Vec::new(),
            TrendSpec::Constant => vec![1.0],
            TrendSpec::Linear => vec![t],
            TrendSpec::ConstantLinear => vec![1.0, t],
        }
    }

    /// Number of trend coefficients
    pub fn len(&self) -> usize {
        self.regressors(1.0).len()
    }

    /// Whether there are no trend terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for TrendSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for TrendSpec {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" => Ok(TrendSpec::None),
            "c" => Ok(TrendSpec::Constant),
            "t" => Ok(TrendSpec::Linear),
            "ct" => Ok(TrendSpec::ConstantLinear),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown trend '{}', expected one of n, c, t, ct",
                other
            ))),
        }
    }
}

/// Model order and trend handed to a fitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// (p, d, q)
    pub order: (usize, usize, usize),
    pub trend: TrendSpec,
}

impl ModelSpec {
    pub fn new(order: (usize, usize, usize), trend: TrendSpec) -> Self {
        Self { order, trend }
    }

    pub fn ar_order(&self) -> usize {
        self.order.0
    }

    pub fn diff_order(&self) -> usize {
        self.order.1
    }

    pub fn ma_order(&self) -> usize {
        self.order.2
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, d, q) = self.order;
        write!(f, "ARIMA({},{},{}) trend={}", p, d, q, self.trend)
    }
}

/// Output of a fitter, on the scale of the values it was given
#[derive(Debug, Clone, PartialEq)]
pub struct ModelForecast {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Dates, when the fitter knows them; otherwise the engine projects them
    pub dates: Option<Vec<NaiveDate>>,
}

impl ModelForecast {
    /// Undated forecast, checking that all paths have the same length
    pub fn new(mean: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if mean.len() != lower.len() || mean.len() != upper.len() {
            return Err(ForecastError::ModelFit(format!(
                "forecast paths differ in length: mean {}, lower {}, upper {}",
                mean.len(),
                lower.len(),
                upper.len()
            )));
        }
        Ok(Self {
            mean,
            lower,
            upper,
            dates: None,
        })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Fits a time series model and projects it forward with a confidence band
pub trait ModelFitter: Debug + Send + Sync {
    /// Fit `spec` to `values` and forecast `steps` values with coverage `1 - alpha`
    fn fit_forecast(
        &self,
        values: &[f64],
        spec: &ModelSpec,
        steps: usize,
        alpha: f64,
    ) -> Result<ModelForecast>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// The fitter compiled into this build, if any
pub fn default_fitter() -> Option<Arc<dyn ModelFitter>> {
    #[cfg(feature = "arima")]
    {
        Some(Arc::new(arima::CssArima::default()))
    }
    #[cfg(not(feature = "arima"))]
    {
        None
    }
}
