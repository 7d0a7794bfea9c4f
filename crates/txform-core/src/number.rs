//! Browser-compatible number parsing and JSON number output
//!
//! Form values arrive as text and are read the way `parseFloat` and
//! `parseInt(v, 10)` read them: leading whitespace is skipped and the longest
//! numeric prefix wins. Numbers written into the backend payload follow
//! `JSON.stringify`, so integral values carry no fractional part.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serializer;
use thiserror::Error;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

static INT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+").unwrap());

/// `Number.prototype.toString` switches to exponent notation from here
const EXPONENT_THRESHOLD: f64 = 1e21;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    #[error("not a number")]
    NotANumber,
    #[error("out of range")]
    OutOfRange,
}

/// Read a float like `parseFloat`; `None` where the browser would produce `NaN`
pub fn parse_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let matched = FLOAT_PREFIX.find(trimmed)?.as_str();
    match matched.trim_start_matches('+') {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        number => number.parse::<f64>().ok(),
    }
}

/// Read an integer like `parseInt(v, 10)`
///
/// Digits that do not fit an i64 are `OutOfRange` rather than rounded.
pub fn parse_int(input: &str) -> Result<i64, NumberError> {
    let trimmed = input.trim_start();
    let matched = INT_PREFIX
        .find(trimmed)
        .ok_or(NumberError::NotANumber)?
        .as_str();
    matched
        .trim_start_matches('+')
        .parse::<i64>()
        .map_err(|_| NumberError::OutOfRange)
}

/// Convert a percentage as typed in the form into a fraction
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// `serialize_with` helper writing an f64 the way `JSON.stringify` does
pub fn serialize_js_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return serializer.serialize_none();
    }
    if value.fract() == 0.0 && value.abs() < EXPONENT_THRESHOLD {
        return serializer.serialize_i128(js_integer(*value));
    }
    serializer.serialize_f64(*value)
}

/// Integral f64 below 1e21 as the integer its shortest decimal form names
///
/// `1.2345678901234568e20` becomes `123456789012345680000`, matching the
/// zero padding the browser applies instead of the exact binary value.
fn js_integer(value: f64) -> i128 {
    let formatted = format!("{:e}", value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return value as i128;
    };
    let Ok(exponent) = exponent.parse::<u32>() else {
        return value as i128;
    };
    let fraction_len = mantissa.split_once('.').map_or(0, |(_, f)| f.len() as u32);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i128>() {
        Ok(digits) if exponent >= fraction_len => {
            let magnitude = digits * 10i128.pow(exponent - fraction_len);
            if value < 0.0 {
                -magnitude
            } else {
                magnitude
            }
        }
        _ => value as i128,
    }
}
