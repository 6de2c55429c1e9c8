#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use price_analysis::data::PriceSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::io::Write;
use std::path::Path;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive weekdays starting at `start` (or the next weekday)
pub fn business_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    while dates.len() < count {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(current);
        }
        current = current.succ_opt().unwrap();
    }
    dates
}

/// `count` consecutive calendar days starting at `start`
pub fn calendar_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start.iter_days().take(count).collect()
}

/// Positive geometric random walk starting at 100
pub fn random_walk(seed: u64, count: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shocks: Normal<f64> = Normal::new(0.0005, 0.012).unwrap();
    let mut price = 100.0f64;
    (0..count)
        .map(|_| {
            price *= shocks.sample(&mut rng).exp();
            price
        })
        .collect()
}

/// One trading year of a random walk on business days from 2023-01-02
pub fn trading_year(seed: u64) -> PriceSeries {
    let closes = random_walk(seed, 252);
    PriceSeries::from_closes(business_dates(date(2023, 1, 2), closes.len()), closes).unwrap()
}

pub fn series(dates: Vec<NaiveDate>, closes: Vec<f64>) -> PriceSeries {
    PriceSeries::from_closes(dates, closes).unwrap()
}

/// Write `date,close,volume` rows for `closes` on business days to `path`
pub fn write_price_csv(path: &Path, start: NaiveDate, closes: &[f64]) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "Date,Close,Volume").unwrap();
    for (d, close) in business_dates(start, closes.len()).iter().zip(closes) {
        writeln!(file, "{},{:.4},{}", d.format("%Y-%m-%d"), close, 1000).unwrap();
    }
}
