// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter, Result as FormatterResult};

use crate::{Result, UnitError, split_magnitude};

quantity!(Temperature);

/// Absolute temperature. All temperatures stored in protocols are in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Kelvin;

impl Display for Kelvin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "K")
    }
}

pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

pub const fn kelvin<T>(value: T) -> Temperature<Kelvin, T> {
    Temperature {
        value,
        unit: Kelvin,
    }
}

pub fn celsius_to_kelvin(celsius: f64) -> Temperature<Kelvin> {
    kelvin(celsius + ZERO_CELSIUS_IN_KELVIN)
}

/// Reads a temperature written in protocol text: `"25oC"`, `"25°C"` or
/// `"298.15K"`. A bare `C` suffix is not accepted, it denotes a C-rate.
pub fn parse_temperature(text: &str) -> Result<Temperature<Kelvin>> {
    let unknown = || UnitError::UnknownTemperatureUnit {
        text: text.to_string(),
    };
    let (magnitude, unit) = split_magnitude(text).map_err(|_| unknown())?;
    match unit {
        "oC" | "°C" => Ok(celsius_to_kelvin(magnitude)),
        "K" => Ok(kelvin(magnitude)),
        _ => Err(unknown()),
    }
}
