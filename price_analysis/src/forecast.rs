//! Forecast engine
//!
//! Validates a [`ForecastRequest`] against a [`PriceSeries`], hands the
//! (optionally log-transformed) closes to the installed [`ModelFitter`] and
//! attaches calendar dates to the projection.

use crate::calendar::{future_dates, to_iso};
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::{default_fitter, ModelFitter, ModelSpec, TrendSpec};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smallest number of closes any model is fitted on
pub const MIN_OBSERVATIONS: usize = 20;

/// Parameters of one forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Number of periods to project
    pub steps: usize,
    /// ARIMA order (p, d, q)
    pub order: (usize, usize, usize),
    /// Band coverage is `1 - alpha`
    pub alpha: f64,
    pub trend: TrendSpec,
    /// Fit on `ln(close)` and map the forecast back
    pub use_log: bool,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            steps: 14,
            order: (1, 1, 1),
            alpha: 0.4,
            trend: TrendSpec::Linear,
            use_log: true,
        }
    }
}

impl ForecastRequest {
    /// Minimum number of non-null closes this request needs
    pub fn required_observations(&self) -> usize {
        let (p, d, q) = self.order;
        MIN_OBSERVATIONS.max(p + d + q + 5)
    }

    fn spec(&self) -> ModelSpec {
        ModelSpec::new(self.order, self.trend)
    }
}

/// One dated point of a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Projected prices with their confidence band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// `YYYY-MM-DD`, strictly increasing
    pub dates: Vec<String>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub order: (usize, usize, usize),
    pub steps: usize,
}

impl ForecastResult {
    /// Zip the parallel vectors into dated points
    pub fn points(&self) -> Vec<ForecastPoint> {
        self.dates
            .iter()
            .zip(&self.mean)
            .zip(&self.lower)
            .zip(&self.upper)
            .map(|(((date, mean), lower), upper)| ForecastPoint {
                date: date.clone(),
                mean: *mean,
                lower: *lower,
                upper: *upper,
            })
            .collect()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Fits the installed model to a series and projects it forward
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    fitter: Option<Arc<dyn ModelFitter>>,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastEngine {
    /// Engine using the fitter compiled into this build
    pub fn new() -> Self {
        Self {
            fitter: default_fitter(),
        }
    }

    /// Engine using a specific fitter
    pub fn with_fitter(fitter: Arc<dyn ModelFitter>) -> Self {
        Self {
            fitter: Some(fitter),
        }
    }

    /// Engine with no fitting capability; every valid request fails with
    /// [`ForecastError::CapabilityUnavailable`]
    pub fn without_fitter() -> Self {
        Self { fitter: None }
    }

    /// Whether a fitter is installed
    pub fn is_available(&self) -> bool {
        self.fitter.is_some()
    }

    /// Forecast `request.steps` periods past the end of `series`
    pub fn forecast(&self, series: &PriceSeries, request: &ForecastRequest) -> Result<ForecastResult> {
        match self.run(series, request) {
            Ok(result) => {
                info!(
                    "Forecast ARIMA{:?} produced {} steps ending {}",
                    result.order,
                    result.steps,
                    result.dates.last().map(String::as_str).unwrap_or("-")
                );
                Ok(result)
            }
            Err(err) => {
                warn!("Forecast rejected: {}", err);
                Err(err)
            }
        }
    }

    fn run(&self, series: &PriceSeries, request: &ForecastRequest) -> Result<ForecastResult> {
        if series.is_empty() {
            return Err(ForecastError::NoHistoricalData);
        }
        if !series.has_close_column() {
            return Err(ForecastError::MissingCloseColumn);
        }

        let closes = series.closes();
        let required = request.required_observations();
        if closes.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: closes.len(),
            });
        }

        if !(request.alpha > 0.0 && request.alpha < 1.0) {
            return Err(ForecastError::AlphaOutOfRange(request.alpha));
        }

        if request.use_log && closes.iter().any(|c| *c <= 0.0) {
            return Err(ForecastError::NonPositivePrice);
        }

        if request.steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "steps must be at least 1".to_string(),
            ));
        }

        let fitter = self
            .fitter
            .as_ref()
            .ok_or(ForecastError::CapabilityUnavailable)?;

        let values: Vec<f64> = if request.use_log {
            closes.iter().map(|c| c.ln()).collect()
        } else {
            closes
        };

        let mut model = fitter.fit_forecast(&values, &request.spec(), request.steps, request.alpha)?;
        if model.len() != request.steps {
            return Err(ForecastError::ModelFit(format!(
                "{} returned {} values for {} steps",
                fitter.name(),
                model.len(),
                request.steps
            )));
        }

        if request.use_log {
            for path in [&mut model.mean, &mut model.lower, &mut model.upper] {
                for value in path.iter_mut() {
                    *value = value.exp();
                }
            }
        }
        if model
            .mean
            .iter()
            .chain(&model.lower)
            .chain(&model.upper)
            .any(|v| !v.is_finite())
        {
            return Err(ForecastError::ModelFit(
                "forecast is not finite on the price scale".to_string(),
            ));
        }

        let dates = match model.dates.take() {
            Some(dates) if dates.len() == request.steps => dates,
            Some(dates) => {
                return Err(ForecastError::ModelFit(format!(
                    "{} returned {} dates for {} steps",
                    fitter.name(),
                    dates.len(),
                    request.steps
                )))
            }
            None => future_dates(&series.close_dates(), request.steps)?,
        };

        Ok(ForecastResult {
            dates: to_iso(&dates),
            mean: model.mean,
            lower: model.lower,
            upper: model.upper,
            order: request.order,
            steps: request.steps,
        })
    }
}
