mod common;

use chrono::{Datelike, Months};
use common::{business_dates, date, random_walk, series, write_price_csv};
use pretty_assertions::assert_eq;
use price_analysis::error::DataError;
use price_analysis::provider::{CsvPriceProvider, Interval, Period, PriceProvider};
use std::collections::HashSet;
use tempfile::TempDir;

fn provider_with_aapl(days: usize) -> (TempDir, CsvPriceProvider) {
    let dir = TempDir::new().unwrap();
    write_price_csv(&dir.path().join("AAPL.csv"), date(2022, 1, 3), &random_walk(1, days));
    let provider = CsvPriceProvider::new(dir.path());
    (dir, provider)
}

#[test]
fn test_history_is_clipped_to_period() {
    let (_dir, provider) = provider_with_aapl(600);
    let full = provider
        .history("AAPL", Period::Max, Interval::OneDay)
        .unwrap();
    let year = provider
        .history("AAPL", Period::OneYear, Interval::OneDay)
        .unwrap();

    assert_eq!(full.len(), 600);
    let last = full.last_date().unwrap();
    assert_eq!(year.last_date(), Some(last));
    let first = year.points()[0].date;
    assert!(first > last.checked_sub_months(Months::new(12)).unwrap());
    assert!(year.len() < full.len());
    assert!(year.len() > 240);
}

#[test]
fn test_day_periods_count_points() {
    let (_dir, provider) = provider_with_aapl(50);
    let five = provider
        .history("AAPL", Period::FiveDays, Interval::OneDay)
        .unwrap();
    let one = provider
        .history("AAPL", Period::OneDay, Interval::OneDay)
        .unwrap();

    assert_eq!(five.len(), 5);
    assert_eq!(one.len(), 1);
    assert_eq!(one.last_date(), five.last_date());
}

#[test]
fn test_year_to_date() {
    let closes = random_walk(2, 300);
    let data = series(business_dates(date(2023, 6, 1), closes.len()), closes);
    let last = data.last_date().unwrap();

    let ytd = Period::YearToDate.clip(&data);
    assert!(ytd.points().iter().all(|p| p.date.year() == last.year()));
    assert_eq!(ytd.points()[0].date, date(2024, 1, 1));
}

#[test]
fn test_weekly_resample_keeps_last_day_of_each_week() {
    let (_dir, provider) = provider_with_aapl(60);
    let daily = provider
        .history("AAPL", Period::Max, Interval::OneDay)
        .unwrap();
    let weekly = provider
        .history("AAPL", Period::Max, Interval::OneWeek)
        .unwrap();

    assert_eq!(weekly.len(), 12);
    assert_eq!(weekly.last_date(), daily.last_date());
    let weeks: HashSet<_> = weekly
        .points()
        .iter()
        .map(|p| (p.date.iso_week().year(), p.date.iso_week().week()))
        .collect();
    assert_eq!(weeks.len(), weekly.len());
    assert!(weekly.has_volume_column());
}

#[test]
fn test_five_day_resample_aligns_to_latest_point() {
    let closes = random_walk(3, 12);
    let data = series(business_dates(date(2024, 1, 1), closes.len()), closes.clone());

    let resampled = Interval::FiveDays.resample(&data).unwrap();
    // Buckets of 2, 5 and 5 points, each represented by its last point
    assert_eq!(resampled.closes(), vec![closes[1], closes[6], closes[11]]);
}

#[test]
fn test_monthly_and_quarterly_resample() {
    let closes = random_walk(4, 130);
    let data = series(business_dates(date(2024, 1, 1), closes.len()), closes);

    let monthly = Interval::OneMonth.resample(&data).unwrap();
    let months: HashSet<_> = monthly.points().iter().map(|p| p.date.month()).collect();
    assert_eq!(months.len(), monthly.len());

    let quarterly = Interval::ThreeMonths.resample(&data).unwrap();
    assert!(quarterly.len() <= 3);
    assert_eq!(quarterly.last_date(), data.last_date());
}

#[test]
fn test_intraday_interval_unavailable() {
    let (_dir, provider) = provider_with_aapl(30);
    let err = provider
        .history("AAPL", Period::OneMonth, Interval::FiveMinutes)
        .unwrap_err();
    assert!(matches!(err, DataError::Invalid(_)));
}

#[test]
fn test_unknown_ticker_not_found() {
    let (_dir, provider) = provider_with_aapl(30);
    assert!(matches!(
        provider.history("MSFT", Period::OneYear, Interval::OneDay),
        Err(DataError::NotFound(_))
    ));
    assert!(provider.current_price("MSFT").is_err());
}

#[test]
fn test_current_price_and_currency() {
    let (_dir, provider) = provider_with_aapl(30);
    let history = provider
        .history("AAPL", Period::Max, Interval::OneDay)
        .unwrap();

    assert_eq!(
        provider.current_price("AAPL").unwrap(),
        history.closes().last().copied()
    );
    assert_eq!(provider.currency("AAPL"), "USD");
    assert_eq!(provider.with_currency("eur").currency("AAPL"), "EUR");
}
