// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::step::Step;

/// One protocol instruction as supplied by the user: either text in the
/// instruction language, or an already structured step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    Text(String),
    Step(Step),
}

impl Instruction {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Instruction::Text(text) => Some(text),
            Instruction::Step(_) => None,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Text(text) => write!(f, "{text:?}"),
            Instruction::Step(step) => write!(f, "{step}"),
        }
    }
}

impl From<&str> for Instruction {
    fn from(value: &str) -> Self {
        Instruction::Text(value.to_string())
    }
}

impl From<String> for Instruction {
    fn from(value: String) -> Self {
        Instruction::Text(value)
    }
}

impl From<Step> for Instruction {
    fn from(value: Step) -> Self {
        Instruction::Step(value)
    }
}

/// A top-level entry of a protocol: a single instruction, or a group of
/// instructions forming one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperatingCondition {
    Single(Instruction),
    Cycle(Vec<Instruction>),
}

impl OperatingCondition {
    /// Builds a cycle from anything convertible into instructions.
    pub fn cycle<I, T>(instructions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Instruction>,
    {
        OperatingCondition::Cycle(instructions.into_iter().map(Into::into).collect())
    }
}

impl From<Instruction> for OperatingCondition {
    fn from(value: Instruction) -> Self {
        OperatingCondition::Single(value)
    }
}

impl From<&str> for OperatingCondition {
    fn from(value: &str) -> Self {
        OperatingCondition::Single(value.into())
    }
}

impl From<String> for OperatingCondition {
    fn from(value: String) -> Self {
        OperatingCondition::Single(value.into())
    }
}

impl From<Step> for OperatingCondition {
    fn from(value: Step) -> Self {
        OperatingCondition::Single(value.into())
    }
}

impl From<Vec<Instruction>> for OperatingCondition {
    fn from(value: Vec<Instruction>) -> Self {
        OperatingCondition::Cycle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::builders::rest;

    #[test]
    fn test_conversions() {
        assert_eq!(
            OperatingCondition::from("Rest for 1 hour"),
            OperatingCondition::Single(Instruction::Text("Rest for 1 hour".to_string()))
        );
        let step = rest().build();
        assert_eq!(
            OperatingCondition::from(step.clone()),
            OperatingCondition::Single(Instruction::Step(step))
        );
        assert_eq!(
            OperatingCondition::cycle(["Rest for 1 hour", "Charge at 1C for 1 hour"]),
            OperatingCondition::Cycle(vec![
                "Rest for 1 hour".into(),
                "Charge at 1C for 1 hour".into()
            ])
        );
    }

    #[test]
    fn test_deserialize_shapes() {
        let conditions: Vec<OperatingCondition> = serde_json::from_str(
            r#"["Rest for 1 hour", ["Charge at 1C for 1 hour", {"kind": {"type": "rest"}}]]"#,
        )
        .unwrap();
        assert_eq!(conditions.len(), 2);
        assert!(matches!(conditions[0], OperatingCondition::Single(Instruction::Text(_))));
        let OperatingCondition::Cycle(cycle) = &conditions[1] else {
            panic!("expected a cycle");
        };
        assert_eq!(cycle[0].as_text(), Some("Charge at 1C for 1 hour"));
        assert!(matches!(&cycle[1], Instruction::Step(step) if step.kind == crate::StepKind::Rest));
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::from("Rest").to_string(), "\"Rest\"");
        assert_eq!(Instruction::from(rest().build()).to_string(), "rest");
    }
}
