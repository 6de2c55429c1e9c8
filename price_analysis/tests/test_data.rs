mod common;

use common::date;
use pretty_assertions::assert_eq;
use price_analysis::data::{DataLoader, PricePoint, PriceSeries};
use price_analysis::error::DataError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    writeln!(file, "2023-01-03,100.0,105.0,98.0,103.0,1000").unwrap();
    writeln!(file, "2023-01-04,103.0,107.0,101.0,106.0,1200").unwrap();
    writeln!(file, "2023-01-05,106.0,110.0,104.0,108.0,1500").unwrap();

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert!(!data.is_empty());
    assert!(data.has_close_column());
    assert!(data.has_volume_column());
    assert_eq!(data.closes(), vec![103.0, 106.0, 108.0]);
    assert_eq!(data.last_date(), Some(date(2023, 1, 5)));
    assert_eq!(data.points()[1].volume, Some(1200.0));
}

#[test]
fn test_close_column_preferred_over_adjusted_close() {
    let csv = "Date,Adj Close,Close\n2024-01-02,9.5,10.0\n2024-01-03,10.5,11.0\n";
    let data = DataLoader::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(data.closes(), vec![10.0, 11.0]);
    assert!(!data.has_volume_column());
}

#[test]
fn test_price_and_adjusted_close_columns() {
    let adjusted = "Date,Adj Close\n2024-01-02,9.5\n";
    assert_eq!(
        DataLoader::from_reader(adjusted.as_bytes()).unwrap().closes(),
        vec![9.5]
    );

    let price = "timestamp,price\n2024-01-02 00:00:00,42.0\n";
    assert_eq!(
        DataLoader::from_reader(price.as_bytes()).unwrap().closes(),
        vec![42.0]
    );
}

#[test]
fn test_missing_close_column_is_flagged() {
    let csv = "date,volume\n2024-01-02,100\n2024-01-03,200\n";
    let data = DataLoader::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(data.len(), 2);
    assert!(!data.has_close_column());
    assert!(data.closes().is_empty());
}

#[test]
fn test_blank_and_nan_closes_are_null() {
    let csv = "date,close\n2024-01-02,10.0\n2024-01-03,\n2024-01-04,NaN\n2024-01-05,12.0\n";
    let data = DataLoader::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(data.len(), 4);
    assert_eq!(data.closes(), vec![10.0, 12.0]);
    assert_eq!(data.close_dates(), vec![date(2024, 1, 2), date(2024, 1, 5)]);
}

#[test]
fn test_data_loader_error_handling() {
    assert!(matches!(
        DataLoader::from_csv("nonexistent_file.csv"),
        Err(DataError::Io(_))
    ));

    let no_date = "symbol,close\nAAPL,1.0\n";
    assert!(matches!(
        DataLoader::from_reader(no_date.as_bytes()),
        Err(DataError::Invalid(_))
    ));

    let bad_number = "date,close\n2024-01-02,abc\n";
    assert!(matches!(
        DataLoader::from_reader(bad_number.as_bytes()),
        Err(DataError::Parse(_))
    ));

    let bad_date = "date,close\n02/01/2024,1.0\n";
    assert!(matches!(
        DataLoader::from_reader(bad_date.as_bytes()),
        Err(DataError::Parse(_))
    ));
}

#[test]
fn test_unordered_and_duplicate_dates_rejected() {
    let unordered = "date,close\n2024-01-03,1.0\n2024-01-02,2.0\n";
    assert!(matches!(
        DataLoader::from_reader(unordered.as_bytes()),
        Err(DataError::Invalid(_))
    ));

    let duplicate = "date,close\n2024-01-02,1.0\n2024-01-02,2.0\n";
    assert!(matches!(
        DataLoader::from_reader(duplicate.as_bytes()),
        Err(DataError::Invalid(_))
    ));

    let points = vec![
        PricePoint::new(date(2024, 1, 3), 1.0),
        PricePoint::new(date(2024, 1, 2), 1.0),
    ];
    assert!(PriceSeries::new(points).is_err());
}

#[test]
fn test_from_closes_length_mismatch() {
    let result = PriceSeries::from_closes(vec![date(2024, 1, 2)], vec![1.0, 2.0]);
    assert!(matches!(result, Err(DataError::Invalid(_))));
}

#[test]
fn test_since_keeps_later_points() {
    let data = PriceSeries::from_closes(
        vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)],
        vec![1.0, 2.0, 3.0],
    )
    .unwrap();

    let tail = data.since(date(2024, 1, 3));
    assert_eq!(tail.closes(), vec![2.0, 3.0]);
    assert!(data.since(date(2025, 1, 1)).is_empty());
    assert_eq!(data.since(date(2000, 1, 1)), data);
}

#[test]
fn test_empty_series_defaults() {
    let empty = PriceSeries::default();
    assert!(empty.is_empty());
    assert!(empty.has_close_column());
    assert_eq!(empty.last_date(), None);
}

#[test]
fn test_non_finite_closes_are_missing() {
    let dates = vec![
        date(2024, 1, 2),
        date(2024, 1, 3),
        date(2024, 1, 4),
        date(2024, 1, 5),
        date(2024, 1, 8),
    ];
    let data =
        PriceSeries::from_closes(dates, vec![10.0, 11.0, f64::NAN, 12.0, f64::INFINITY]).unwrap();

    assert_eq!(data.len(), 5);
    assert_eq!(data.points()[2].close, None);
    assert_eq!(data.points()[4].close, None);
    assert_eq!(data.closes(), vec![10.0, 11.0, 12.0]);
    assert_eq!(data.close_dates().last(), Some(&date(2024, 1, 5)));
}
