//! End-to-end analysis of one ticker
//!
//! Fetches history through a [`PriceProvider`], runs the statistics engine,
//! lays out chart data and, when enabled, runs the forecast engine. A failed
//! forecast is reported next to the statistics instead of failing the run.

use crate::config::AnalysisConfig;
use crate::error::DataError;
use crate::forecast::{ForecastEngine, ForecastResult};
use crate::provider::{Interval, Period, PriceProvider};
use crate::statistics::{ChartData, StatisticsEngine, StatisticsResult};
use crate::ticker::normalize_ticker;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Result of analysing one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    pub statistics: StatisticsResult,
    pub chart: ChartData,
    /// `None` when forecasting is disabled, otherwise the forecast or why it failed
    pub forecast: Option<Result<ForecastResult, String>>,
}

impl AnalysisReport {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Runs the statistics and forecast engines over provider data
#[derive(Debug, Clone)]
pub struct Analyzer<P: PriceProvider> {
    provider: P,
    config: AnalysisConfig,
    statistics: StatisticsEngine,
    forecaster: ForecastEngine,
}

impl<P: PriceProvider> Analyzer<P> {
    pub fn new(provider: P, config: AnalysisConfig) -> Self {
        Self {
            provider,
            config,
            statistics: StatisticsEngine::new(),
            forecaster: ForecastEngine::new(),
        }
    }

    /// Replace the forecast engine
    pub fn with_forecaster(mut self, forecaster: ForecastEngine) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse `ticker` with the configured period and interval
    pub fn analyze(&self, ticker: &str) -> Result<AnalysisReport, DataError> {
        let ticker = normalize_ticker(ticker)?;
        let period = self.config.period;
        let interval = self.config.interval;

        info!("Fetching {} history for {} ({})", period, ticker, interval);
        let series = self.provider.history(&ticker, period, interval)?;
        if series.is_empty() {
            return Err(DataError::NotFound(format!(
                "no price data for {} over {}",
                ticker, period
            )));
        }

        let current_price = match self.provider.current_price(&ticker) {
            Ok(price) => price,
            Err(err) => {
                warn!("Current price for {} unavailable, using last close: {}", ticker, err);
                None
            }
        };
        let currency = self.provider.currency(&ticker);

        let statistics = self.statistics.calculate(&series, current_price, &currency);
        let chart = self.statistics.prepare_chart_data(&series);

        let forecast = if self.config.forecast.enabled {
            let request = self.config.forecast.to_request();
            Some(
                self.forecaster
                    .forecast(&series, &request)
                    .map_err(|err| err.to_string()),
            )
        } else {
            None
        };

        Ok(AnalysisReport {
            ticker,
            period,
            interval,
            statistics,
            chart,
            forecast,
        })
    }
}
