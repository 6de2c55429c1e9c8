use pretty_assertions::assert_eq;
use price_analysis::config::{AnalysisConfig, ForecastSettings};
use price_analysis::error::ConfigError;
use price_analysis::models::TrendSpec;
use price_analysis::provider::{Interval, Period};
use rstest::rstest;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = AnalysisConfig::from_lookup(|_| None).unwrap();

    assert_eq!(config, AnalysisConfig::default());
    assert_eq!(config.period, Period::OneYear);
    assert_eq!(config.interval, Interval::OneDay);
    assert!(!config.forecast.enabled);
    assert_eq!(config.forecast.steps, 14);
    assert_eq!(config.forecast.order, (1, 1, 1));
    assert_eq!(config.forecast.trend, TrendSpec::Linear);
    assert_eq!(config.forecast.alpha, 0.4);
    assert!(config.forecast.use_log);
}

#[test]
fn test_values_are_read() {
    let config = AnalysisConfig::from_lookup(lookup_from(&[
        ("PRICE_PERIOD", "6mo"),
        ("PRICE_INTERVAL", "1wk"),
        ("FORECAST_ENABLED", "true"),
        ("FORECAST_STEPS", "30"),
        ("FORECAST_ORDER", "2, 1, 0"),
        ("FORECAST_TREND", "ct"),
        ("FORECAST_ALPHA", "0.05"),
        ("FORECAST_USE_LOG", "no"),
    ]))
    .unwrap();

    assert_eq!(config.period, Period::SixMonths);
    assert_eq!(config.interval, Interval::OneWeek);
    assert_eq!(
        config.forecast,
        ForecastSettings {
            enabled: true,
            steps: 30,
            order: (2, 1, 0),
            trend: TrendSpec::ConstantLinear,
            alpha: 0.05,
            use_log: false,
        }
    );
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let config =
        AnalysisConfig::from_lookup(lookup_from(&[("PRICE_PERIOD", "  "), ("FORECAST_STEPS", "")]))
            .unwrap();
    assert_eq!(config, AnalysisConfig::default());
}

#[rstest]
#[case("PRICE_PERIOD", "3y")]
#[case("PRICE_INTERVAL", "2h")]
#[case("FORECAST_ENABLED", "maybe")]
#[case("FORECAST_STEPS", "ten")]
#[case("FORECAST_STEPS", "0")]
#[case("FORECAST_ORDER", "1,1")]
#[case("FORECAST_ORDER", "1,x,1")]
#[case("FORECAST_TREND", "quadratic")]
#[case("FORECAST_ALPHA", "1.0")]
#[case("FORECAST_ALPHA", "abc")]
#[case("FORECAST_USE_LOG", "2")]
fn test_malformed_values_are_rejected(#[case] key: &str, #[case] value: &str) {
    let err = AnalysisConfig::from_lookup(lookup_from(&[(key, value)])).unwrap_err();
    let ConfigError::Invalid { key: reported, .. } = &err;
    let expected = match key {
        "PRICE_PERIOD" => "period",
        "PRICE_INTERVAL" => "interval",
        other => other,
    };
    assert_eq!(reported, expected);
}

#[test]
fn test_settings_to_request() {
    let settings = ForecastSettings {
        enabled: true,
        steps: 7,
        order: (0, 1, 1),
        trend: TrendSpec::None,
        alpha: 0.1,
        use_log: false,
    };
    let request = settings.to_request();

    assert_eq!(request.steps, 7);
    assert_eq!(request.order, (0, 1, 1));
    assert_eq!(request.trend, TrendSpec::None);
    assert_eq!(request.alpha, 0.1);
    assert!(!request.use_log);
}

#[test]
fn test_period_and_interval_codes() {
    for period in Period::ALL {
        assert_eq!(period.as_code().parse::<Period>().unwrap(), period);
    }
    for interval in Interval::ALL {
        assert_eq!(interval.as_code().parse::<Interval>().unwrap(), interval);
    }
    assert_eq!("YTD".parse::<Period>().unwrap(), Period::YearToDate);
    assert_eq!(Period::default(), Period::OneYear);
    assert_eq!(Interval::default(), Interval::OneDay);
    assert_eq!(TrendSpec::default(), TrendSpec::Linear);
    assert!("2wk".parse::<Interval>().is_err());
}

#[test]
fn test_config_serde_uses_codes() {
    let json = serde_json::to_value(AnalysisConfig::default()).unwrap();
    assert_eq!(json["period"], "1y");
    assert_eq!(json["interval"], "1d");
    assert_eq!(json["forecast"]["trend"], "t");

    let back: AnalysisConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, AnalysisConfig::default());
}

#[test]
fn test_values_from_env_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# analysis defaults").unwrap();
    writeln!(file, "PRICE_PERIOD=6mo").unwrap();
    writeln!(file, "FORECAST_STEPS=21").unwrap();
    writeln!(file, "FORECAST_TREND=ct").unwrap();

    let config = AnalysisConfig::from_env_file(file.path()).unwrap();

    assert_eq!(config.period, Period::SixMonths);
    assert_eq!(config.interval, Interval::OneDay);
    assert_eq!(config.forecast.steps, 21);
    assert_eq!(config.forecast.trend, TrendSpec::ConstantLinear);
}

#[test]
fn test_malformed_value_in_env_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "FORECAST_ALPHA=2.5").unwrap();

    let err = AnalysisConfig::from_env_file(file.path()).unwrap_err();
    let ConfigError::Invalid { key, .. } = &err;
    assert_eq!(key, "FORECAST_ALPHA");
}

#[test]
fn test_missing_env_file() {
    assert!(AnalysisConfig::from_env_file("no_such_dir/.env").is_err());
}
