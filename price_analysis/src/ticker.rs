//! Ticker symbol validation

use crate::error::DataError;

/// Longest accepted symbol, long enough for pairs such as `BTC-USD`
pub const MAX_TICKER_LEN: usize = 20;

/// Whether `ticker` looks like a symbol: 1 to 20 ASCII letters, digits or `-`
/// once trimmed
pub fn validate_ticker(ticker: &str) -> bool {
    normalize_ticker(ticker).is_ok()
}

/// Trimmed, upper-cased symbol, or why it was rejected
pub fn normalize_ticker(ticker: &str) -> Result<String, DataError> {
    let clean = ticker.trim().to_uppercase();
    if clean.is_empty() || clean.chars().count() > MAX_TICKER_LEN {
        return Err(DataError::Invalid(format!(
            "ticker '{}' must be 1 to {} characters",
            ticker.trim(),
            MAX_TICKER_LEN
        )));
    }
    if let Some(bad) = clean.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
        return Err(DataError::Invalid(format!(
            "ticker '{}' contains '{}'",
            clean, bad
        )));
    }
    Ok(clean)
}
