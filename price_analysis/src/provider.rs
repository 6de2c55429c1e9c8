//! Price data providers
//!
//! A [`PriceProvider`] turns a ticker into a [`PriceSeries`]. The engines
//! never talk to providers; the [`crate::pipeline::Analyzer`] does.

use crate::data::{DataLoader, PricePoint, PriceSeries};
use crate::error::{ConfigError, DataError};
use crate::format::DEFAULT_CURRENCY;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How far back a history request reaches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::YearToDate,
        Period::Max,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// Restrict `series` to this period, counted back from its last date.
    ///
    /// Day periods count trading days (points); longer periods are calendar based.
    pub fn clip(&self, series: &PriceSeries) -> PriceSeries {
        let last = match series.last_date() {
            Some(last) => last,
            None => return series.clone(),
        };
        let months_back = |months: u32| {
            last.checked_sub_months(Months::new(months))
                .and_then(|start| start.succ_opt())
        };
        let first = match self {
            Period::OneDay => return tail(series, 1),
            Period::FiveDays => return tail(series, 5),
            Period::OneMonth => months_back(1),
            Period::ThreeMonths => months_back(3),
            Period::SixMonths => months_back(6),
            Period::OneYear => months_back(12),
            Period::TwoYears => months_back(24),
            Period::FiveYears => months_back(60),
            Period::TenYears => months_back(120),
            Period::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1),
            Period::Max => None,
        };
        match first {
            Some(first) => series.since(first),
            None => series.clone(),
        }
    }
}

fn tail(series: &PriceSeries, count: usize) -> PriceSeries {
    let points = series.points();
    match points.len().checked_sub(count) {
        Some(skip) => series.since(points[skip].date),
        None => series.clone(),
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Period {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.as_code() == code)
            .ok_or_else(|| ConfigError::invalid("period", format!("unsupported period '{}'", s)))
    }
}

/// Spacing of the points a history request returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl Interval {
    pub const ALL: [Interval; 13] = [
        Interval::OneMinute,
        Interval::TwoMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::SixtyMinutes,
        Interval::NinetyMinutes,
        Interval::OneHour,
        Interval::OneDay,
        Interval::FiveDays,
        Interval::OneWeek,
        Interval::OneMonth,
        Interval::ThreeMonths,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::TwoMinutes => "2m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::SixtyMinutes => "60m",
            Interval::NinetyMinutes => "90m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::FiveDays => "5d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
            Interval::ThreeMonths => "3mo",
        }
    }

    /// Whether the interval is shorter than a day
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::OneMinute
                | Interval::TwoMinutes
                | Interval::FiveMinutes
                | Interval::FifteenMinutes
                | Interval::ThirtyMinutes
                | Interval::SixtyMinutes
                | Interval::NinetyMinutes
                | Interval::OneHour
        )
    }

    /// Reduce a daily series to this interval, keeping the last point of each bucket.
    ///
    /// Intraday intervals cannot be built from daily data and return `None`.
    pub fn resample(&self, daily: &PriceSeries) -> Option<PriceSeries> {
        if self.is_intraday() {
            return None;
        }
        if *self == Interval::OneDay {
            return Some(daily.clone());
        }

        let bucket = |index: usize, date: NaiveDate| -> (i32, u32) {
            match self {
                Interval::FiveDays => (0, index as u32 / 5),
                Interval::OneWeek => {
                    let week = date.iso_week();
                    (week.year(), week.week())
                }
                Interval::OneMonth => (date.year(), date.month()),
                Interval::ThreeMonths => (date.year(), date.month0() / 3),
                _ => (date.year(), date.ordinal()),
            }
        };

        let points = daily.points();
        // Buckets of five trading days are aligned to the most recent point
        let offset = (5 - points.len() % 5) % 5;
        let mut kept: Vec<PricePoint> = Vec::new();
        let mut current: Option<(i32, u32)> = None;
        for (i, point) in points.iter().enumerate() {
            let key = bucket(i + offset, point.date);
            if current == Some(key) {
                kept.pop();
            }
            kept.push(*point);
            current = Some(key);
        }
        Some(daily.with_points(kept))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_code() == code)
            .ok_or_else(|| {
                ConfigError::invalid("interval", format!("unsupported interval '{}'", s))
            })
    }
}

/// Source of price history for a ticker
pub trait PriceProvider: Send + Sync {
    /// History for `ticker` covering `period` at `interval` spacing
    fn history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, DataError>;

    /// Latest traded price, if the provider knows one
    fn current_price(&self, ticker: &str) -> Result<Option<f64>, DataError>;

    /// Currency code the ticker is quoted in
    fn currency(&self, ticker: &str) -> String;
}

/// Reads daily history from `<dir>/<TICKER>.csv`
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
    currency: String,
}

impl CsvPriceProvider {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Quote every ticker in `currency`
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_uppercase();
        self
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    fn load(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(DataError::NotFound(format!(
                "no price file for {} at {}",
                ticker,
                path.display()
            )));
        }
        DataLoader::from_csv(path)
    }
}

impl PriceProvider for CsvPriceProvider {
    fn history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        let series = period.clip(&self.load(ticker)?);
        interval.resample(&series).ok_or_else(|| {
            DataError::Invalid(format!(
                "interval {} is not available from daily CSV data",
                interval
            ))
        })
    }

    fn current_price(&self, ticker: &str) -> Result<Option<f64>, DataError> {
        Ok(self.load(ticker)?.closes().last().copied())
    }

    fn currency(&self, _ticker: &str) -> String {
        self.currency.clone()
    }
}
