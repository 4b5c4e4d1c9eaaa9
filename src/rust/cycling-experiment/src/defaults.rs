// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_units::{Duration, Kelvin, Second, Temperature, celsius_to_kelvin, parse_positive_duration};

use crate::error::Result;
use crate::registry::StepArena;

/// Experiment-wide values for steps that do not set their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Defaults {
    pub period: Duration<Second>,
    /// `None` defers to the ambient temperature of the parameter set.
    pub temperature: Option<Temperature<Kelvin>>,
}

impl Defaults {
    pub fn new(period: &str, temperature_celsius: Option<f64>) -> Result<Self> {
        Ok(Self {
            period: parse_positive_duration(period)?,
            temperature: temperature_celsius.map(celsius_to_kelvin),
        })
    }

    /// Fills in the period and temperature of every step that has none.
    ///
    /// Returns the number of steps that were changed.
    pub fn inject(&self, arena: &mut StepArena) -> usize {
        let mut changed = 0;
        for step in arena.iter_mut() {
            let mut touched = false;
            if step.period.is_none() {
                step.period = Some(self.period);
                touched = true;
            }
            if step.temperature.is_none() && self.temperature.is_some() {
                step.temperature = self.temperature;
                touched = true;
            }
            changed += usize::from(touched);
        }
        changed
    }
}
