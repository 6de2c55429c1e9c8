//! Calendar-aware projection of forecast dates
//!
//! Forecast dates continue the cadence observed in the history: a series that
//! ever trades on a weekend (crypto) advances one calendar day per step, a
//! weekday-only series (equities) skips Saturdays and Sundays.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Spacing between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Every calendar day
    Daily,
    /// Monday to Friday
    BusinessDays,
}

impl Cadence {
    /// Infer the cadence from historical dates
    pub fn infer(dates: &[NaiveDate]) -> Self {
        if dates.iter().any(|d| is_weekend(*d)) {
            Cadence::Daily
        } else {
            Cadence::BusinessDays
        }
    }

    /// Whether the cadence has an observation on `date`
    pub fn includes(&self, date: NaiveDate) -> bool {
        match self {
            Cadence::Daily => true,
            Cadence::BusinessDays => !is_weekend(date),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `steps` dates after `last`, starting the day after it, under `cadence`
pub fn project(last: NaiveDate, steps: usize, cadence: Cadence) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(steps);
    let mut current = last;
    while dates.len() < steps {
        current = current
            .succ_opt()
            .ok_or_else(|| ForecastError::InvalidParameter("forecast date out of range".to_string()))?;
        if cadence.includes(current) {
            dates.push(current);
        }
    }
    Ok(dates)
}

/// Forecast dates continuing the cadence of `history`
pub fn future_dates(history: &[NaiveDate], steps: usize) -> Result<Vec<NaiveDate>> {
    let last = history.last().copied().ok_or_else(|| {
        ForecastError::InvalidParameter("no dates to build forecast dates from".to_string())
    })?;
    project(last, steps, Cadence::infer(history))
}

/// Render dates as `YYYY-MM-DD`
pub fn to_iso(dates: &[NaiveDate]) -> Vec<String> {
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}
