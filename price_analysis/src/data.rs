//! Price series handling
//!
//! A [`PriceSeries`] is the explicit, ordered form of the table a data
//! provider returns: one record per date with a close price and an optional
//! volume. Engines only ever see this type.

use crate::error::DataError;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One observation of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Close price, absent when the provider reported no value
    pub close: Option<f64>,
    /// Traded volume, if the provider reports it
    pub volume: Option<f64>,
}

impl PricePoint {
    /// Point with a close price and no volume
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
            volume: None,
        }
    }

    /// Point with a close price and volume
    pub fn with_volume(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            close: Some(close),
            volume: Some(volume),
        }
    }
}

/// Ordered price series with strictly increasing dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    has_close: bool,
    has_volume: bool,
}

impl Default for PriceSeries {
    fn default() -> Self {
        Self::empty()
    }
}

impl PriceSeries {
    /// Create a series from points, rejecting unordered or duplicate dates.
    ///
    /// Non-finite closes are stored as missing.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, DataError> {
        validate_order(&points)?;
        for point in &mut points {
            point.close = point.close.filter(|c| c.is_finite());
        }
        let has_volume = points.iter().any(|p| p.volume.is_some());
        Ok(Self {
            points,
            has_close: true,
            has_volume,
        })
    }

    /// Create a series from parallel date and close vectors
    pub fn from_closes(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self, DataError> {
        if dates.len() != closes.len() {
            return Err(DataError::Invalid(format!(
                "{} dates but {} close values",
                dates.len(),
                closes.len()
            )));
        }
        let points = dates
            .into_iter()
            .zip(closes)
            .map(|(date, close)| PricePoint::new(date, close))
            .collect();
        Self::new(points)
    }

    /// A series whose provider supplied dates (and maybe volume) but no close column
    pub fn without_close(dates: Vec<NaiveDate>) -> Result<Self, DataError> {
        let points: Vec<PricePoint> = dates
            .into_iter()
            .map(|date| PricePoint {
                date,
                close: None,
                volume: None,
            })
            .collect();
        validate_order(&points)?;
        Ok(Self {
            points,
            has_close: false,
            has_volume: false,
        })
    }

    /// A series with no points
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            has_close: true,
            has_volume: false,
        }
    }

    /// All points, in date order
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of points (including those with a missing close)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the provider supplied a close column
    pub fn has_close_column(&self) -> bool {
        self.has_close
    }

    /// Whether the provider supplied a volume column
    pub fn has_volume_column(&self) -> bool {
        self.has_volume
    }

    /// Dates of all points
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Non-null close prices, in date order
    pub fn closes(&self) -> Vec<f64> {
        if !self.has_close {
            return Vec::new();
        }
        self.points.iter().filter_map(|p| p.close).collect()
    }

    /// Dates of the points that carry a close price
    pub fn close_dates(&self) -> Vec<NaiveDate> {
        self.points
            .iter()
            .filter(|p| p.close.is_some())
            .map(|p| p.date)
            .collect()
    }

    /// Date of the last point
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Points on or after `start`
    pub fn since(&self, start: NaiveDate) -> Self {
        let first = self.points.partition_point(|p| p.date < start);
        self.with_points(self.points[first..].to_vec())
    }

    /// Same columns, different points; `points` must keep the date order
    pub(crate) fn with_points(&self, points: Vec<PricePoint>) -> Self {
        Self {
            points,
            has_close: self.has_close,
            has_volume: self.has_volume,
        }
    }
}

fn validate_order(points: &[PricePoint]) -> Result<(), DataError> {
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DataError::Invalid(format!(
                "dates must be strictly increasing: {} follows {}",
                pair[1].date, pair[0].date
            )));
        }
    }
    Ok(())
}

/// Loads price series from CSV
#[derive(Debug)]
pub struct DataLoader;

/// Column positions found in a CSV header
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    date: usize,
    close: Option<usize>,
    volume: Option<usize>,
}

impl DataLoader {
    /// Load a price series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries, DataError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a price series from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<PriceSeries, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let layout = Self::detect_columns(csv_reader.headers()?)?;

        let mut dates = Vec::new();
        let mut points = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let date = parse_date(field(&record, layout.date))?;
            dates.push(date);
            points.push(PricePoint {
                date,
                close: layout
                    .close
                    .map(|idx| parse_optional_number(field(&record, idx)))
                    .transpose()?
                    .flatten(),
                volume: layout
                    .volume
                    .map(|idx| parse_optional_number(field(&record, idx)))
                    .transpose()?
                    .flatten(),
            });
        }

        if layout.close.is_none() {
            return PriceSeries::without_close(dates);
        }
        PriceSeries::new(points)
    }

    /// Detect date, close and volume columns in a header row
    fn detect_columns(headers: &StringRecord) -> Result<ColumnLayout, DataError> {
        let names: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let date = find_column(&names, |n| n.contains("date") || n.contains("time"))
            .ok_or_else(|| DataError::Invalid("No date column found in data".to_string()))?;

        // Prefer the plain close over adjusted close, then any price column
        let close = find_column(&names, |n| n == "close")
            .or_else(|| find_column(&names, |n| n.contains("close")))
            .or_else(|| find_column(&names, |n| n.contains("price")));

        let volume = find_column(&names, |n| n.contains("volume") || n == "vol");

        Ok(ColumnLayout {
            date,
            close,
            volume,
        })
    }
}

fn find_column(names: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    names.iter().position(|n| pred(n.as_str()))
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Parse `YYYY-MM-DD`, or a timestamp whose date part is `YYYY-MM-DD`
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    // Provider exports such as "2024-01-02 00:00:00-05:00"
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| DataError::Parse(format!("unrecognised date '{}'", raw)))
}

fn parse_optional_number(raw: &str) -> Result<Option<f64>, DataError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| DataError::Parse(format!("'{}' is not a number: {}", raw, e)))
}
