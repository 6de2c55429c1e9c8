//! # Price Analysis
//!
//! Statistics and forecasting for daily price series.
//!
//! ## Features
//!
//! - Descriptive statistics with trailing averages and return volatility
//! - ARIMA forecasts with confidence bands, optionally fitted on log prices
//! - Forecast dates that follow the series' own trading calendar
//! - CSV loading, a provider seam and an end-to-end [`pipeline::Analyzer`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_analysis::data::DataLoader;
//! use price_analysis::forecast::{ForecastEngine, ForecastRequest};
//! use price_analysis::statistics::StatisticsEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let series = DataLoader::from_csv("AAPL.csv")?;
//!
//! let stats = StatisticsEngine::new().calculate(&series, None, "USD");
//! println!("{} over {} points", stats.formatted.current_price, stats.data_points);
//!
//! let forecast = ForecastEngine::new().forecast(&series, &ForecastRequest::default())?;
//! for point in forecast.points() {
//!     println!("{} {:.2} [{:.2}, {:.2}]", point.date, point.mean, point.lower, point.upper);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features flags
//!
//! - `arima` (default): the built-in ARIMA fitter. Without it
//!   [`ForecastEngine::new`] has no capability and every otherwise valid
//!   request fails with [`ForecastError::CapabilityUnavailable`].

pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod statistics;
pub mod ticker;

// Re-export commonly used types
pub use crate::config::{AnalysisConfig, ForecastSettings};
pub use crate::data::{DataLoader, PricePoint, PriceSeries};
pub use crate::error::{ConfigError, DataError, ForecastError, ForecastErrorKind};
pub use crate::forecast::{ForecastEngine, ForecastRequest, ForecastResult};
pub use crate::models::{ModelFitter, ModelSpec, TrendSpec};
pub use crate::pipeline::{AnalysisReport, Analyzer};
pub use crate::provider::{CsvPriceProvider, Interval, Period, PriceProvider};
pub use crate::statistics::{ChartData, StatisticsEngine, StatisticsResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
