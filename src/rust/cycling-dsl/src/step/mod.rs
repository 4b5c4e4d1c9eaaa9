// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use cycling_units::unit::canonical_bits;
use cycling_units::{Duration, Kelvin, Second, Temperature};
use serde::{Deserialize, Serialize};

pub mod builders;

/// What the cell is driven with during a step.
///
/// Currents, C-rates and powers are positive for discharge and negative for charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Current { amps: f64 },
    CRate { rate: f64 },
    Power { watts: f64 },
    Voltage { volts: f64 },
    Resistance { ohms: f64 },
    Rest,
}

impl StepKind {
    fn key(&self) -> (u8, u64) {
        match self {
            StepKind::Current { amps } => (0, canonical_bits(*amps)),
            StepKind::CRate { rate } => (1, canonical_bits(*rate)),
            StepKind::Power { watts } => (2, canonical_bits(*watts)),
            StepKind::Voltage { volts } => (3, canonical_bits(*volts)),
            StepKind::Resistance { ohms } => (4, canonical_bits(*ohms)),
            StepKind::Rest => (5, 0),
        }
    }
}

impl Eq for StepKind {}

impl Hash for StepKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for StepKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Current { amps } => write!(f, "current {amps} A"),
            StepKind::CRate { rate } => write!(f, "C-rate {rate}"),
            StepKind::Power { watts } => write!(f, "power {watts} W"),
            StepKind::Voltage { volts } => write!(f, "voltage {volts} V"),
            StepKind::Resistance { ohms } => write!(f, "resistance {ohms} Ohm"),
            StepKind::Rest => write!(f, "rest"),
        }
    }
}

/// Condition ending a single step before its duration elapses.
///
/// Thresholds are magnitudes; the sign of the drive decides the direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepTermination {
    Voltage { volts: f64 },
    Current { amps: f64 },
    CRate { rate: f64 },
}

impl StepTermination {
    fn key(&self) -> (u8, u64) {
        match self {
            StepTermination::Voltage { volts } => (0, canonical_bits(*volts)),
            StepTermination::Current { amps } => (1, canonical_bits(*amps)),
            StepTermination::CRate { rate } => (2, canonical_bits(*rate)),
        }
    }
}

impl Eq for StepTermination {}

impl Hash for StepTermination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for StepTermination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StepTermination::Voltage { volts } => write!(f, "{volts} V"),
            StepTermination::Current { amps } => write!(f, "{amps} A"),
            StepTermination::CRate { rate } => write!(f, "{rate}C"),
        }
    }
}

/// The structured form of one protocol instruction.
///
/// `period` and `temperature` stay `None` until the experiment fills in its
/// defaults. Steps compare and hash by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration<Second>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terminations: Vec<StepTermination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Duration<Second>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature<Kelvin>>,
    /// Instruction text the step was parsed from, without its tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            duration: None,
            terminations: Vec::new(),
            period: None,
            temperature: None,
            description: None,
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(description) = &self.description {
            return write!(f, "{description}");
        }
        write!(f, "{}", self.kind)?;
        if let Some(duration) = &self.duration {
            write!(f, " for {duration}")?;
        }
        for (i, termination) in self.terminations.iter().enumerate() {
            let keyword = if i == 0 { "until" } else { "or" };
            write!(f, " {keyword} {termination}")?;
        }
        if let Some(temperature) = &self.temperature {
            write!(f, " at {temperature}")?;
        }
        if let Some(period) = &self.period {
            write!(f, " ({period} period)")?;
        }
        Ok(())
    }
}
