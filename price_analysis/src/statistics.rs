//! Descriptive statistics over a price series
//!
//! The engine never fails: empty or malformed input produces the
//! [`StatisticsResult::empty`] sentinel, so presentation code handles a
//! single shape.

use crate::calendar::to_iso;
use crate::data::PriceSeries;
use crate::format::{format_currency, format_percentage, DEFAULT_CURRENCY, NOT_AVAILABLE};
use log::{info, warn};
use price_math::descriptive::{max, mean, min};
use price_math::moving_averages::trailing_mean;
use price_math::volatility::return_volatility;
use price_math::{MathError, Result as MathResult};
use serde::{Deserialize, Serialize};

/// Window of the short trailing average
pub const SHORT_WINDOW: usize = 30;

/// Window of the long trailing average
pub const LONG_WINDOW: usize = 90;

/// Display strings for every numeric field of a [`StatisticsResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedStatistics {
    pub current_price: String,
    pub high_52w: String,
    pub low_52w: String,
    pub average_price: String,
    pub price_change: String,
    pub price_change_pct: String,
    pub volatility: String,
    pub avg_30d: String,
    pub avg_90d: String,
}

impl FormattedStatistics {
    fn not_available() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            current_price: na(),
            high_52w: na(),
            low_52w: na(),
            average_price: na(),
            price_change: na(),
            price_change_pct: na(),
            volatility: na(),
            avg_30d: na(),
            avg_90d: na(),
        }
    }

    /// Every formatted string, in field order
    pub fn values(&self) -> [&str; 9] {
        [
            &self.current_price,
            &self.high_52w,
            &self.low_52w,
            &self.average_price,
            &self.price_change,
            &self.price_change_pct,
            &self.volatility,
            &self.avg_30d,
            &self.avg_90d,
        ]
    }
}

/// Calculated statistics for one request
///
/// The `52w` fields cover whatever window the caller supplied; the engine
/// does not clip the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub current_price: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
    pub average_price: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_pct: Option<f64>,
    pub volatility: Option<f64>,
    pub avg_30d: Option<f64>,
    pub avg_90d: Option<f64>,
    pub data_points: usize,
    pub currency: String,
    pub formatted: FormattedStatistics,
}

impl StatisticsResult {
    /// Sentinel for a series with nothing to analyse
    pub fn empty() -> Self {
        Self {
            current_price: None,
            high_52w: None,
            low_52w: None,
            average_price: None,
            price_change: None,
            price_change_pct: None,
            volatility: None,
            avg_30d: None,
            avg_90d: None,
            data_points: 0,
            currency: DEFAULT_CURRENCY.to_string(),
            formatted: FormattedStatistics::not_available(),
        }
    }

    /// Whether this is the empty sentinel
    pub fn is_empty(&self) -> bool {
        self.data_points == 0
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Close prices and volume laid out for charting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// `YYYY-MM-DD` per point
    pub dates: Vec<String>,
    /// Close per point, `None` where the provider had no value
    pub prices: Vec<Option<f64>>,
    /// Volume per point, empty when the series has no volume column
    pub volume: Vec<f64>,
}

/// Computes [`StatisticsResult`]s from price series
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Calculate statistics for `series`.
    ///
    /// `current_price` overrides the last close as the evaluated price.
    /// Empty, close-less or unusable input yields [`StatisticsResult::empty`].
    pub fn calculate(
        &self,
        series: &PriceSeries,
        current_price: Option<f64>,
        currency: &str,
    ) -> StatisticsResult {
        if series.is_empty() {
            warn!("No historical data provided");
            return StatisticsResult::empty();
        }
        if !series.has_close_column() {
            warn!("Close column not found in historical data");
            return StatisticsResult::empty();
        }

        let closes = series.closes();
        if closes.is_empty() {
            warn!("Historical data has no close values");
            return StatisticsResult::empty();
        }

        match compute(&closes, current_price, currency) {
            Ok(result) => {
                info!(
                    "Statistics calculated over {} data points",
                    result.data_points
                );
                result
            }
            Err(err) => {
                warn!("Error calculating statistics: {}", err);
                StatisticsResult::empty()
            }
        }
    }

    /// Lay out a series for charting; an empty series gives empty lists
    pub fn prepare_chart_data(&self, series: &PriceSeries) -> ChartData {
        let points = series.points();
        ChartData {
            dates: to_iso(&series.dates()),
            prices: points
                .iter()
                .map(|p| if series.has_close_column() { p.close } else { None })
                .collect(),
            volume: if series.has_volume_column() {
                points.iter().map(|p| p.volume.unwrap_or(0.0)).collect()
            } else {
                Vec::new()
            },
        }
    }
}

fn compute(closes: &[f64], current_price: Option<f64>, currency: &str) -> MathResult<StatisticsResult> {
    let high = max(closes)?;
    let low = min(closes)?;
    let average = mean(closes)?;

    let last = closes[closes.len() - 1];
    let current = current_price.unwrap_or(last);
    if !current.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "current price {} is not finite",
            current
        )));
    }

    let first = closes[0];
    let price_change = current - first;
    let price_change_pct = if first > 0.0 {
        price_change / first
    } else {
        0.0
    };

    let volatility = return_volatility(closes);
    let avg_30d = trailing_mean(closes, SHORT_WINDOW);
    let avg_90d = trailing_mean(closes, LONG_WINDOW);

    let formatted = FormattedStatistics {
        current_price: format_currency(Some(current), currency),
        high_52w: format_currency(Some(high), currency),
        low_52w: format_currency(Some(low), currency),
        average_price: format_currency(Some(average), currency),
        price_change: format_currency(Some(price_change), currency),
        price_change_pct: format_percentage(Some(price_change_pct)),
        volatility: format_percentage(Some(volatility)),
        avg_30d: format_currency(avg_30d, currency),
        avg_90d: format_currency(avg_90d, currency),
    };

    Ok(StatisticsResult {
        current_price: Some(current),
        high_52w: Some(high),
        low_52w: Some(low),
        average_price: Some(average),
        price_change: Some(price_change),
        price_change_pct: Some(price_change_pct),
        volatility: Some(volatility),
        avg_30d,
        avg_90d,
        data_points: closes.len(),
        currency: currency.to_string(),
        formatted,
    })
}
