//! Analysis configuration
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file; anything unset keeps its default.
//! A variable that is set but malformed is an error rather than silently
//! ignored.

use crate::error::ConfigError;
use crate::forecast::ForecastRequest;
use crate::models::TrendSpec;
use crate::provider::{Interval, Period};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

pub const ENV_PERIOD: &str = "PRICE_PERIOD";
pub const ENV_INTERVAL: &str = "PRICE_INTERVAL";
pub const ENV_FORECAST_ENABLED: &str = "FORECAST_ENABLED";
pub const ENV_FORECAST_STEPS: &str = "FORECAST_STEPS";
pub const ENV_FORECAST_ORDER: &str = "FORECAST_ORDER";
pub const ENV_FORECAST_TREND: &str = "FORECAST_TREND";
pub const ENV_FORECAST_ALPHA: &str = "FORECAST_ALPHA";
pub const ENV_FORECAST_USE_LOG: &str = "FORECAST_USE_LOG";

/// Forecast parameters and the gate that turns forecasting on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub enabled: bool,
    pub steps: usize,
    pub order: (usize, usize, usize),
    pub trend: TrendSpec,
    pub alpha: f64,
    pub use_log: bool,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        let request = ForecastRequest::default();
        Self {
            enabled: false,
            steps: request.steps,
            order: request.order,
            trend: request.trend,
            alpha: request.alpha,
            use_log: request.use_log,
        }
    }
}

impl ForecastSettings {
    pub fn to_request(&self) -> ForecastRequest {
        ForecastRequest {
            steps: self.steps,
            order: self.order,
            alpha: self.alpha,
            trend: self.trend,
            use_log: self.use_log,
        }
    }
}

/// Everything an analysis run needs besides the ticker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub period: Period,
    pub interval: Interval,
    pub forecast: ForecastSettings,
}

impl AnalysisConfig {
    /// Resolve from the process environment, after loading `.env` if one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from a dotenv file; variables already in the process
    /// environment win, and the process environment is left untouched.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let mut file_values = HashMap::new();
        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| ConfigError::invalid(&source, e.to_string()))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::invalid(&source, e.to_string()))?;
            file_values.insert(key, value);
        }
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        })
    }

    /// Resolve from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let period = match get(ENV_PERIOD) {
            Some(raw) => raw.parse()?,
            None => defaults.period,
        };
        let interval = match get(ENV_INTERVAL) {
            Some(raw) => raw.parse()?,
            None => defaults.interval,
        };

        let mut forecast = defaults.forecast;
        if let Some(raw) = get(ENV_FORECAST_ENABLED) {
            forecast.enabled = parse_bool(ENV_FORECAST_ENABLED, &raw)?;
        }
        if let Some(raw) = get(ENV_FORECAST_STEPS) {
            forecast.steps = parse_number(ENV_FORECAST_STEPS, &raw)?;
            if forecast.steps == 0 {
                return Err(ConfigError::invalid(ENV_FORECAST_STEPS, "must be at least 1"));
            }
        }
        if let Some(raw) = get(ENV_FORECAST_ORDER) {
            forecast.order = parse_order(&raw)?;
        }
        if let Some(raw) = get(ENV_FORECAST_TREND) {
            forecast.trend = TrendSpec::from_str(&raw)
                .map_err(|e| ConfigError::invalid(ENV_FORECAST_TREND, e.to_string()))?;
        }
        if let Some(raw) = get(ENV_FORECAST_ALPHA) {
            let alpha: f64 = parse_number(ENV_FORECAST_ALPHA, &raw)?;
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(ConfigError::invalid(
                    ENV_FORECAST_ALPHA,
                    format!("{} is not strictly between 0 and 1", alpha),
                ));
            }
            forecast.alpha = alpha;
        }
        if let Some(raw) = get(ENV_FORECAST_USE_LOG) {
            forecast.use_log = parse_bool(ENV_FORECAST_USE_LOG, &raw)?;
        }

        let config = Self {
            period,
            interval,
            forecast,
        };
        info!(
            "Configuration loaded: period={} interval={} forecast={}",
            config.period,
            config.interval,
            if config.forecast.enabled { "on" } else { "off" }
        );
        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("'{}' is not a boolean", other))),
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("'{}': {}", raw.trim(), e)))
}

fn parse_order(raw: &str) -> Result<(usize, usize, usize), ConfigError> {
    let parts = raw
        .split(',')
        .map(|part| parse_number::<usize>(ENV_FORECAST_ORDER, part))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [p, d, q] => Ok((*p, *d, *q)),
        _ => Err(ConfigError::invalid(
            ENV_FORECAST_ORDER,
            format!("expected p,d,q but got '{}'", raw),
        )),
    }
}
