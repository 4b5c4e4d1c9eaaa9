// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_dsl::{Instruction, OperatingCondition};

use crate::error::{Error, Result};
use crate::registry::StepId;

/// One cycle of a compiled protocol: the instructions as written, and the
/// step each of them resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    instructions: Vec<Instruction>,
    steps: Vec<StepId>,
}

impl Cycle {
    pub(crate) fn new(instructions: Vec<Instruction>, steps: Vec<StepId>) -> Self {
        debug_assert_eq!(instructions.len(), steps.len());
        Self {
            instructions,
            steps,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn remap_steps(&mut self, remap: &[StepId]) {
        for step in &mut self.steps {
            *step = remap[step.index()];
        }
    }
}

/// Normalizes operating conditions into cycles: every single instruction
/// becomes a cycle of its own.
pub(crate) fn structure_cycles(conditions: &[OperatingCondition]) -> Result<Vec<Vec<Instruction>>> {
    if conditions.is_empty() {
        return Err(Error::EmptyProtocol);
    }
    conditions
        .iter()
        .enumerate()
        .map(|(index, condition)| match condition {
            OperatingCondition::Single(instruction) => Ok(vec![instruction.clone()]),
            OperatingCondition::Cycle(instructions) if instructions.is_empty() => {
                Err(Error::EmptyCycle { index })
            }
            OperatingCondition::Cycle(instructions) => Ok(instructions.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_singles_become_cycles() {
        let cycles = structure_cycles(&[
            "Rest for 1 hour".into(),
            OperatingCondition::cycle(["Charge at 1C for 1 hour", "Rest for 1 hour"]),
        ])
        .unwrap();
        assert_eq!(
            cycles,
            vec![
                vec![Instruction::from("Rest for 1 hour")],
                vec![
                    Instruction::from("Charge at 1C for 1 hour"),
                    Instruction::from("Rest for 1 hour")
                ],
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(structure_cycles(&[]), Err(Error::EmptyProtocol)));
        assert!(matches!(
            structure_cycles(&["Rest for 1 hour".into(), OperatingCondition::Cycle(vec![])]),
            Err(Error::EmptyCycle { index: 1 })
        ));
    }

    #[test]
    fn test_remap_steps() {
        let mut cycle = Cycle::new(
            vec!["Rest for 1 hour".into(), "Rest for 2 hours".into()],
            vec![StepId::new(0), StepId::new(1)],
        );
        cycle.remap_steps(&[StepId::new(0), StepId::new(0)]);
        assert_eq!(cycle.steps().to_vec(), vec![StepId::new(0), StepId::new(0)]);
        assert_eq!(cycle.len(), 2);
    }

    proptest! {
        #[test]
        fn flat_input_yields_one_cycle_per_instruction(texts in prop::collection::vec("[a-z ]{1,12}", 1..20)) {
            let conditions: Vec<OperatingCondition> = texts.iter().map(|t| t.as_str().into()).collect();
            let cycles = structure_cycles(&conditions).unwrap();
            prop_assert_eq!(cycles.len(), texts.len());
            for (cycle, text) in cycles.iter().zip(&texts) {
                prop_assert_eq!(cycle.len(), 1);
                prop_assert_eq!(cycle[0].as_text(), Some(text.as_str()));
            }
        }

        #[test]
        fn grouped_input_preserves_order(groups in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 1..5), 1..10)) {
            let conditions: Vec<OperatingCondition> =
                groups.iter().map(|g| OperatingCondition::cycle(g.iter().map(String::as_str))).collect();
            let cycles = structure_cycles(&conditions).unwrap();
            let flattened: Vec<_> = cycles.iter().flatten().filter_map(Instruction::as_text).collect();
            let expected: Vec<_> = groups.iter().flatten().map(String::as_str).collect();
            prop_assert_eq!(flattened, expected);
        }
    }
}
