// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_units::{Duration, Kelvin, Second, Temperature};

use crate::step::{Step, StepKind, StepTermination};

/// Builds a [`Step`] directly, bypassing the instruction grammar.
pub struct StepBuilder {
    step: Step,
}

impl StepBuilder {
    pub fn new(kind: StepKind) -> Self {
        Self {
            step: Step::new(kind),
        }
    }

    pub fn duration(mut self, duration: Duration<Second>) -> Self {
        self.step.duration = Some(duration);
        self
    }

    pub fn termination(mut self, termination: StepTermination) -> Self {
        self.step.terminations.push(termination);
        self
    }

    pub fn period(mut self, period: Duration<Second>) -> Self {
        self.step.period = Some(period);
        self
    }

    pub fn temperature(mut self, temperature: Temperature<Kelvin>) -> Self {
        self.step.temperature = Some(temperature);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.step.description = Some(description.into());
        self
    }

    pub fn build(self) -> Step {
        self.step
    }
}

/// Constant current step, positive for discharge.
pub fn current(amps: f64) -> StepBuilder {
    StepBuilder::new(StepKind::Current { amps })
}

/// Constant C-rate step, positive for discharge.
pub fn c_rate(rate: f64) -> StepBuilder {
    StepBuilder::new(StepKind::CRate { rate })
}

/// Constant power step, positive for discharge.
pub fn power(watts: f64) -> StepBuilder {
    StepBuilder::new(StepKind::Power { watts })
}

pub fn voltage(volts: f64) -> StepBuilder {
    StepBuilder::new(StepKind::Voltage { volts })
}

pub fn resistance(ohms: f64) -> StepBuilder {
    StepBuilder::new(StepKind::Resistance { ohms })
}

pub fn rest() -> StepBuilder {
    StepBuilder::new(StepKind::Rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycling_units::{kelvin, seconds};

    #[test]
    fn test_builder() {
        let step = voltage(4.2)
            .termination(StepTermination::CRate { rate: 0.02 })
            .period(seconds(10.0))
            .temperature(kelvin(298.15))
            .build();
        assert_eq!(step.kind, StepKind::Voltage { volts: 4.2 });
        assert_eq!(step.terminations, vec![StepTermination::CRate { rate: 0.02 }]);
        assert_eq!(step.period, Some(seconds(10.0)));
        assert_eq!(step.temperature, Some(kelvin(298.15)));
        assert_eq!(step.duration, None);
        assert_eq!(step.description, None);
    }

    #[test]
    fn test_shorthands() {
        assert_eq!(rest().build().kind, StepKind::Rest);
        assert_eq!(current(-1.0).build().kind, StepKind::Current { amps: -1.0 });
        assert_eq!(c_rate(0.5).build().kind, StepKind::CRate { rate: 0.5 });
        assert_eq!(power(2.0).build().kind, StepKind::Power { watts: 2.0 });
        assert_eq!(
            resistance(10.0).duration(seconds(60.0)).build().duration,
            Some(seconds(60.0))
        );
    }
}
