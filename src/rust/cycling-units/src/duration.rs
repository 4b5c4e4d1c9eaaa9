// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter, Result as FormatterResult};

use crate::{Result, UnitError, split_magnitude};

quantity!(Duration);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Second;

impl Display for Second {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "s")
    }
}

pub const fn seconds<T>(value: T) -> Duration<Second, T> {
    Duration {
        value,
        unit: Second,
    }
}

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86400.0;

fn seconds_per_unit(unit: &str) -> Option<f64> {
    let factor = match unit.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => SECONDS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => SECONDS_PER_HOUR,
        "day" | "days" => SECONDS_PER_DAY,
        _ => return None,
    };
    Some(factor)
}

/// Converts a time string such as `"1 minute"`, `"10 seconds"` or `"1.5h"`
/// into seconds.
///
/// # Examples
/// ```rust
/// use cycling_units::duration::{parse_duration, seconds};
///
/// assert_eq!(parse_duration("1 hour").unwrap(), seconds(3600.0));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration<Second>> {
    let (magnitude, unit) = split_magnitude(text)?;
    let factor = seconds_per_unit(unit).ok_or_else(|| UnitError::UnknownTimeUnit {
        text: text.to_string(),
        unit: unit.to_string(),
    })?;
    Ok(seconds(magnitude) * factor)
}

/// Like [`parse_duration`], but rejects durations that are not strictly positive.
pub fn parse_positive_duration(text: &str) -> Result<Duration<Second>> {
    let duration = parse_duration(text)?;
    if duration.value() <= 0.0 {
        return Err(UnitError::NonPositiveDuration {
            text: text.to_string(),
        });
    }
    Ok(duration)
}
