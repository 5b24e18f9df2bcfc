//! Currency and date normalization for noisy OCR substrings.
//!
//! Both normalizers treat malformed input as a normal, expected case: the
//! result is `None`, never a panic or an error. Downstream rules consume
//! whatever survived.

use chrono::NaiveDate;

/// Date formats accepted by `parse_date`, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%m-%d-%y",
    "%Y-%m-%d",
];

/// Strip currency symbols, thousands separators, and whitespace, then parse
/// the remainder as a decimal amount.
///
/// Returns `None` for anything non-numeric, including empty or absent input.
pub fn clean_amount(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a free-form date substring into a calendar date.
///
/// Tolerates the common US layouts (`MM/DD/YYYY`, `MM-DD-YY`, ...) and ISO
/// `YYYY-MM-DD`. Returns `None` for anything unparseable.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Render an amount the way bills print it: two decimals, comma-grouped.
/// `1234.5` → `"1,234.50"`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
