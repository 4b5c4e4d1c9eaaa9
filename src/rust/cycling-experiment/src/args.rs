// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_dsl::OperatingCondition;
use serde::{Deserialize, Serialize};

/// Recording period used when neither the experiment nor a step sets one.
pub const DEFAULT_PERIOD: &str = "1 minute";

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

/// Termination input: a single criterion or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TerminationArgs {
    Single(String),
    Many(Vec<String>),
}

impl TerminationArgs {
    pub fn terms(&self) -> &[String] {
        match self {
            TerminationArgs::Single(term) => std::slice::from_ref(term),
            TerminationArgs::Many(terms) => terms,
        }
    }
}

impl From<&str> for TerminationArgs {
    fn from(value: &str) -> Self {
        TerminationArgs::Single(value.to_string())
    }
}

impl From<String> for TerminationArgs {
    fn from(value: String) -> Self {
        TerminationArgs::Single(value)
    }
}

impl From<Vec<String>> for TerminationArgs {
    fn from(value: Vec<String>) -> Self {
        TerminationArgs::Many(value)
    }
}

impl From<Vec<&str>> for TerminationArgs {
    fn from(value: Vec<&str>) -> Self {
        TerminationArgs::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TerminationArgs {
    fn from(value: [&str; N]) -> Self {
        TerminationArgs::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// The arguments an experiment is constructed from, kept verbatim so that
/// the experiment can be rebuilt from them.
///
/// This is also the on-disk form of a protocol:
///
/// ```json
/// {
///   "operating_conditions": [["Discharge at 1C until 2.5 V", "Rest for 1 hour"]],
///   "period": "10 seconds",
///   "temperature": 25.0,
///   "termination": ["80% capacity", "2.5 V"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentArgs {
    pub operating_conditions: Vec<OperatingCondition>,
    #[serde(default = "default_period")]
    pub period: String,
    /// Ambient temperature in degrees Celsius. `None` leaves the ambient
    /// temperature to the parameter set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationArgs>,
    /// Retired. Any value is rejected when the experiment is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_cycles: Option<serde_json::Value>,
    /// Retired. Any value is rejected when the experiment is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cccv_handling: Option<serde_json::Value>,
}

impl ExperimentArgs {
    pub fn new(operating_conditions: Vec<OperatingCondition>) -> Self {
        Self {
            operating_conditions,
            period: default_period(),
            temperature: None,
            termination: None,
            drive_cycles: None,
            cccv_handling: None,
        }
    }
}
