//! # Price Insight
//!
//! Facade over the workspace crates:
//!
//! - [`price_math`]: numeric primitives (descriptive statistics, returns,
//!   differencing, Yule-Walker, Nelder-Mead)
//! - [`price_analysis`]: price series, statistics and forecast engines,
//!   providers and configuration
//!
//! ## Example
//!
//! ```
//! use price_insight_workspace::{PriceSeries, StatisticsEngine};
//!
//! let stats = StatisticsEngine::new().calculate(&PriceSeries::empty(), None, "USD");
//! assert_eq!(stats.data_points, 0);
//! assert_eq!(stats.formatted.current_price, "N/A");
//! ```

pub use price_analysis;
pub use price_math;

pub use price_analysis::{
    AnalysisConfig, AnalysisReport, Analyzer, CsvPriceProvider, DataLoader, ForecastEngine,
    ForecastError, ForecastErrorKind, ForecastRequest, ForecastResult, PriceSeries,
    StatisticsEngine, StatisticsResult,
};

/// Whether this build can fit forecast models
pub fn forecasting_available() -> bool {
    let available = ForecastEngine::new().is_available();
    if !available {
        log::debug!("Built without a model fitter; forecasts will be unavailable");
    }
    available
}
