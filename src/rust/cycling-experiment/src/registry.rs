// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_common::named_id::{NamedId, NamedIdStore};
use cycling_dsl::{Instruction, ParseError, Step, parse_instruction};
use indexmap::{IndexMap, IndexSet};

/// Reference to a step owned by an experiment.
///
/// Equal instructions resolve to the same `StepId`, so everything observed
/// through one occurrence holds for all occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InstructionKey {
    Text(NamedId),
    Step(Step),
}

/// Resolves raw instructions to canonical steps.
///
/// Every distinct instruction is resolved once: text goes through the
/// instruction grammar, pre-built steps are taken as they are. Resolved steps
/// are interned by value, so no two entries of the arena compare equal.
pub(crate) struct StepRegistry {
    names: NamedIdStore,
    resolved: IndexMap<InstructionKey, StepId>,
    steps: IndexSet<Step>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self {
            names: NamedIdStore::new(),
            resolved: IndexMap::new(),
            steps: IndexSet::new(),
        }
    }

    fn key(&mut self, instruction: &Instruction) -> InstructionKey {
        match instruction {
            Instruction::Text(text) => InstructionKey::Text(self.names.get_or_insert(text)),
            Instruction::Step(step) => InstructionKey::Step(step.clone()),
        }
    }

    pub fn resolve(&mut self, instruction: &Instruction) -> Result<StepId, ParseError> {
        let key = self.key(instruction);
        if let Some(id) = self.resolved.get(&key) {
            return Ok(*id);
        }
        let step = match instruction {
            Instruction::Text(text) => parse_instruction(text)?,
            Instruction::Step(step) => step.clone(),
        };
        let (index, _) = self.steps.insert_full(step);
        let id = StepId::new(index);
        self.resolved.insert(key, id);
        Ok(id)
    }

    /// Resolves a sequence of instructions, preserving its order.
    pub fn register(&mut self, instructions: &[Instruction]) -> Result<Vec<StepId>, ParseError> {
        instructions
            .iter()
            .map(|instruction| self.resolve(instruction))
            .collect()
    }

    /// Number of distinct raw instructions seen so far.
    pub fn distinct_instructions(&self) -> usize {
        self.resolved.len()
    }

    pub fn into_arena(self) -> StepArena {
        StepArena {
            steps: self.steps.into_iter().collect(),
        }
    }
}

/// The canonical steps of one experiment, addressed by [`StepId`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StepArena {
    steps: Vec<Step>,
}

impl StepArena {
    pub fn get(&self, id: StepId) -> &Step {
        &self.steps[id.index()]
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Step> {
        self.steps.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Merges steps that compare equal.
    ///
    /// Returns the mapping from old to new ids if anything was merged.
    pub fn coalesce(&mut self) -> Option<Vec<StepId>> {
        let mut unique = IndexSet::with_capacity(self.steps.len());
        let remap: Vec<StepId> = std::mem::take(&mut self.steps)
            .into_iter()
            .map(|step| StepId::new(unique.insert_full(step).0))
            .collect();
        self.steps = unique.into_iter().collect();
        (self.steps.len() < remap.len()).then_some(remap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycling_dsl::{StepKind, rest};
    use cycling_units::seconds;

    #[test]
    fn test_equal_text_resolves_once() {
        let mut registry = StepRegistry::new();
        let ids = registry
            .register(&[
                "Charge at 1C for 1 hour".into(),
                "Rest for 1 hour".into(),
                "Charge at 1C for 1 hour".into(),
            ])
            .unwrap();
        assert_eq!(ids[0], ids[2]);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(registry.distinct_instructions(), 2);
        let arena = registry.into_arena();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(ids[0]).kind, StepKind::CRate { rate: -1.0 });
    }

    #[test]
    fn test_prebuilt_steps_are_keyed_by_value() {
        let mut registry = StepRegistry::new();
        let step = rest().duration(seconds(600.0)).build();
        let ids = registry
            .register(&[step.clone().into(), step.into(), rest().build().into()])
            .unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[2]);
        assert_eq!(registry.into_arena().len(), 2);
    }

    #[test]
    fn test_instructions_resolving_to_equal_steps_share_an_entry() {
        let mut registry = StepRegistry::new();
        let ids = registry
            .register(&[
                "Rest for 10 minutes [relax]".into(),
                "Rest for 10 minutes".into(),
            ])
            .unwrap();
        assert_eq!(registry.distinct_instructions(), 2);
        assert_eq!(ids[0], ids[1]);
    }

    #[test]
    fn test_grammar_errors_propagate() {
        let mut registry = StepRegistry::new();
        let result = registry.register(&["Rest for 1 hour".into(), "Jump at 1C".into()]);
        assert!(matches!(result, Err(ParseError::InvalidInstruction { .. })));
    }

    #[test]
    fn test_coalesce() {
        let mut arena = StepArena {
            steps: vec![rest().build(), rest().period(seconds(60.0)).build()],
        };
        assert_eq!(arena.coalesce(), None);

        arena.iter_mut().for_each(|step| step.period = Some(seconds(60.0)));
        let remap = arena.coalesce().unwrap();
        assert_eq!(remap, vec![StepId::new(0), StepId::new(0)]);
        assert_eq!(arena.as_slice().to_vec(), vec![rest().period(seconds(60.0)).build()]);
    }
}
