// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

//! Typed physical quantities used by cycling protocols, and the conversions
//! from the human-readable forms found in protocol text.

#[macro_use]
pub mod unit;

pub mod duration;
pub mod temperature;

pub use duration::{Duration, Second, parse_duration, parse_positive_duration, seconds};
pub use temperature::{Kelvin, Temperature, celsius_to_kelvin, kelvin, parse_temperature};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Could not read a numeric value from '{text}'")]
    InvalidMagnitude { text: String },
    #[error(
        "Unknown time unit '{unit}' in '{text}'. Use seconds, minutes, hours or days, e.g. '10 seconds' or '1 hour'"
    )]
    UnknownTimeUnit { text: String, unit: String },
    #[error("Duration '{text}' must be positive")]
    NonPositiveDuration { text: String },
    #[error("Unknown temperature '{text}'. Use degrees Celsius or Kelvin, e.g. '25oC' or '298.15K'")]
    UnknownTemperatureUnit { text: String },
}

pub type Result<T, E = UnitError> = std::result::Result<T, E>;

/// Length of the leading numeric literal of `text` (sign, digits, decimal
/// point and an optional exponent).
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || matches!(bytes[end], b'.' | b'+' | b'-'))
    {
        end += 1;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        if exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            end = exp_end;
        }
    }
    end
}

/// Splits `"1.5 hours"` or `"1.5hours"` into `(1.5, "hours")`.
pub fn split_magnitude(text: &str) -> Result<(f64, &str)> {
    let trimmed = text.trim();
    let end = numeric_prefix_len(trimmed);
    let magnitude = trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| UnitError::InvalidMagnitude {
            text: text.to_string(),
        })?;
    Ok((magnitude, trimmed[end..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_magnitude() {
        assert_eq!(split_magnitude("1 hour").unwrap(), (1.0, "hour"));
        assert_eq!(split_magnitude(" 2.5min ").unwrap(), (2.5, "min"));
        assert_eq!(split_magnitude("-3 s").unwrap(), (-3.0, "s"));
        assert_eq!(split_magnitude("1e3 s").unwrap(), (1000.0, "s"));
        assert_eq!(split_magnitude("5 ecus").unwrap(), (5.0, "ecus"));
        assert!(split_magnitude("hour").is_err());
        assert!(split_magnitude("1.2.3 s").is_err());
    }
}
