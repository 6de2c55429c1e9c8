// Analyse a ticker from a directory of `<TICKER>.csv` files
//
//   FORECAST_ENABLED=true cargo run --example analyze_csv -- ./data AAPL
use price_insight_workspace::{AnalysisConfig, Analyzer, CsvPriceProvider};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (dir, ticker) = match args.as_slice() {
        [_, dir, ticker] => (dir.clone(), ticker.clone()),
        _ => {
            eprintln!("usage: analyze_csv <data-dir> <ticker>");
            return ExitCode::FAILURE;
        }
    };

    let config = match AnalysisConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let analyzer = Analyzer::new(CsvPriceProvider::new(dir), config);
    let report = match analyzer.analyze(&ticker) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("analysis failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let f = &report.statistics.formatted;
    println!("=== {} ({} / {}) ===", report.ticker, report.period, report.interval);
    println!("Current price:   {}", f.current_price);
    println!("52w high / low:  {} / {}", f.high_52w, f.low_52w);
    println!("Average:         {}", f.average_price);
    println!("Change:          {} ({})", f.price_change, f.price_change_pct);
    println!("Volatility:      {}", f.volatility);
    println!("30d / 90d avg:   {} / {}", f.avg_30d, f.avg_90d);
    println!("Data points:     {}", report.statistics.data_points);

    match &report.forecast {
        None => println!("\nForecast disabled (set FORECAST_ENABLED=true)"),
        Some(Err(reason)) => println!("\nForecast unavailable: {}", reason),
        Some(Ok(forecast)) => {
            println!("\nARIMA{:?} forecast", forecast.order);
            for point in forecast.points() {
                println!(
                    "{}  {:>10.2}  [{:.2}, {:.2}]",
                    point.date, point.mean, point.lower, point.upper
                );
            }
        }
    }

    ExitCode::SUCCESS
}
