//! Display formatting for statistics
//!
//! All formatters are total: an absent or non-finite value renders as
//! [`NOT_AVAILABLE`] instead of failing.

/// Placeholder for values that could not be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency code that gets a `$` prefix instead of a suffix
pub const DEFAULT_CURRENCY: &str = "USD";

/// Format a number with thousands separators and a fixed number of decimals
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => group_thousands(&format!("{:.*}", decimals, v)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `$1,234.56` for USD, `1,234.56 EUR` for anything else
pub fn format_currency(value: Option<f64>, currency: &str) -> String {
    let number = format_number(value, 2);
    if number == NOT_AVAILABLE {
        return number;
    }
    if currency == DEFAULT_CURRENCY {
        format!("${}", number)
    } else {
        format!("{} {}", number, currency)
    }
}

/// Fraction rendered as a percentage with two decimals, `0.05` → `5.00%`
pub fn format_percentage(value: Option<f64>) -> String {
    format_percentage_with(value, 2)
}

/// Fraction rendered as a percentage with the given decimals
pub fn format_percentage_with(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}%", decimals, v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}", sign, grouped, fraction)
}
