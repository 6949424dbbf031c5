//! Unit stripping, rounding and conversions shared by every vendor parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([-+]?\d+(?:\.\d+)?)").expect("static regex"));

pub fn strip_spaces(text: &str) -> String {
    text.replace(' ', "")
}

/// Removes every occurrence of each needle, in order.
pub fn strip_text(text: &str, needles: &[&str]) -> String {
    needles
        .iter()
        .fold(text.to_string(), |acc, needle| acc.replace(needle, ""))
}

/// Numeric prefix of a tool value such as `"41 C"`, `"28.45 W"`, `"16x"` or `"812 KB/s"`.
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Half-away-from-zero rounding to `precision` decimals; negative precision rounds to tens, hundreds...
pub fn round_to(value: f64, precision: i32) -> f64 {
    if precision < 0 {
        let factor = 10f64.powi(-precision);
        (value / factor).round() * factor
    } else {
        let factor = 10f64.powi(precision);
        (value * factor).round() / factor
    }
}

/// Celsius to Fahrenheit, bucketed to the nearest ten degrees the dashboard displays.
pub fn convert_celsius(celsius: f64) -> i64 {
    round_to(celsius * 9.0 / 5.0 + 32.0, -1) as i64
}

/// `round(used / total * 100)`, refusing zero totals and used > total.
pub fn percent_of(used: f64, total: f64) -> Option<i64> {
    if !used.is_finite() || !total.is_finite() || total <= 0.0 || used < 0.0 || used > total {
        return None;
    }
    Some((used / total * 100.0).round() as i64)
}

/// Theoretical PCIe bandwidth ceiling in MB/s: `2^(gen-1) * 250 * width`.
pub fn pcie_ceiling(generation: u32, width: u32) -> Option<u64> {
    if generation == 0 || generation > 16 {
        return None;
    }
    Some(2u64.pow(generation - 1) * 250 * u64::from(width))
}

/// Drops a redundant vendor prefix, then keeps the first two words of long multi-word names.
pub fn shorten_name(name: &str, vendor_prefix: &str) -> String {
    let trimmed = name.trim();
    let name = trimmed
        .strip_prefix(vendor_prefix)
        .map(str::trim_start)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(trimmed);
    let words: Vec<&str> = name.split_whitespace().collect();
    if name.chars().count() > 20 && words.len() > 2 {
        format!("{} {}", words[0], words[1])
    } else {
        name.to_string()
    }
}

/// JSON number without a trailing `.0` for whole values.
pub fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

pub fn percent(value: f64, precision: i32) -> String {
    let rounded = round_to(value, precision);
    if precision > 0 {
        format!("{:.*}%", precision as usize, rounded)
    } else {
        format!("{rounded:.0}%")
    }
}
