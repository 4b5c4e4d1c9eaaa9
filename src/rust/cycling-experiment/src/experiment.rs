// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Debug, Display, Formatter};

use anyhow::Context;
use cycling_dsl::{OperatingCondition, ParseError, Step};
use cycling_log::diagnostic;
use cycling_units::{Duration, Kelvin, Second, Temperature};

use crate::args::{ExperimentArgs, TerminationArgs};
use crate::cycles::{Cycle, structure_cycles};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::registry::{StepArena, StepId, StepRegistry};
use crate::tags;
use crate::termination::{Termination, parse_termination};

const CCCV_HANDLING_RETIRED: &str = "cccv_handling has been deprecated, use \
    `cccv_ode(current, voltage)` steps instead to produce the same behavior as the old \
    `cccv_handling='ode'`";
const DRIVE_CYCLES_RETIRED: &str = "drive_cycles should now be passed as an experiment step \
    object, e.g. `cycling_dsl::current(drive_cycle)`";

/// A compiled cycling protocol.
///
/// Every raw instruction is resolved to a step exactly once; instructions that
/// resolve to equal steps share one [`StepId`]. All steps carry the
/// experiment's period, and its temperature when one is set, unless they
/// specify their own.
#[derive(Clone)]
pub struct Experiment {
    args: ExperimentArgs,
    cycles: Vec<Cycle>,
    cycle_lengths: Vec<usize>,
    steps: Vec<StepId>,
    arena: StepArena,
    termination: Termination,
    period: Duration<Second>,
    temperature: Option<Temperature<Kelvin>>,
}

impl Experiment {
    /// Compiles `operating_conditions` with the default period, no ambient
    /// temperature and no termination.
    pub fn new(operating_conditions: Vec<OperatingCondition>) -> Result<Self> {
        Self::from_args(ExperimentArgs::new(operating_conditions))
    }

    pub fn builder(operating_conditions: Vec<OperatingCondition>) -> ExperimentBuilder {
        ExperimentBuilder::new(operating_conditions)
    }

    pub fn from_args(args: ExperimentArgs) -> Result<Self> {
        if args.cccv_handling.is_some() {
            return Err(Error::DeprecatedArgument(CCCV_HANDLING_RETIRED));
        }
        if args.drive_cycles.is_some() {
            return Err(Error::DeprecatedArgument(DRIVE_CYCLES_RETIRED));
        }

        let instructions = structure_cycles(&args.operating_conditions)?;

        let mut registry = StepRegistry::new();
        let step_ids = instructions
            .iter()
            .map(|cycle| registry.register(cycle))
            .collect::<Result<Vec<_>, ParseError>>()?;
        let distinct_instructions = registry.distinct_instructions();
        let mut arena = registry.into_arena();

        let defaults = Defaults::new(&args.period, args.temperature)?;
        defaults.inject(&mut arena);

        let mut cycles: Vec<Cycle> = instructions
            .into_iter()
            .zip(step_ids)
            .map(|(instructions, steps)| Cycle::new(instructions, steps))
            .collect();
        let resolved = arena.len();
        if let Some(remap) = arena.coalesce() {
            diagnostic!(
                "Merged {} steps that became equal after applying defaults",
                resolved - arena.len()
            );
            cycles.iter_mut().for_each(|cycle| cycle.remap_steps(&remap));
        }

        let termination = parse_termination(args.termination.as_ref())?;

        let cycle_lengths: Vec<usize> = cycles.iter().map(Cycle::len).collect();
        let steps: Vec<StepId> = cycles.iter().flat_map(|c| c.steps().iter().copied()).collect();
        diagnostic!(
            "Compiled experiment: {} cycles, {} steps, {} distinct instructions, {} unique steps",
            cycles.len(),
            steps.len(),
            distinct_instructions,
            arena.len()
        );

        Ok(Self {
            args,
            cycles,
            cycle_lengths,
            steps,
            arena,
            termination,
            period: defaults.period,
            temperature: defaults.temperature,
        })
    }

    /// Reads a protocol from its JSON form, see [`ExperimentArgs`].
    pub fn from_json(json: &str) -> Result<Self> {
        let args: ExperimentArgs =
            serde_json::from_str(json).context("Failed to read experiment description")?;
        Self::from_args(args)
    }

    /// Writes the arguments the experiment was built from as JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.args)
            .context("Failed to write experiment description")?;
        Ok(json)
    }

    pub fn operating_conditions_cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn cycle_lengths(&self) -> &[usize] {
        &self.cycle_lengths
    }

    /// Steps in execution order, all cycles flattened.
    pub fn operating_conditions_steps(&self) -> &[StepId] {
        &self.steps
    }

    /// The distinct steps of the experiment. No two of them compare equal.
    pub fn unique_steps(&self) -> &[Step] {
        self.arena.as_slice()
    }

    pub fn step(&self, id: StepId) -> &Step {
        self.arena.get(id)
    }

    /// Steps in execution order, resolved.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|id| self.arena.get(*id))
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn termination_args(&self) -> Option<&TerminationArgs> {
        self.args.termination.as_ref()
    }

    pub fn period(&self) -> Duration<Second> {
        self.period
    }

    /// `None` when the ambient temperature is left to the parameter set.
    pub fn temperature(&self) -> Option<Temperature<Kelvin>> {
        self.temperature
    }

    pub fn args(&self) -> &ExperimentArgs {
        &self.args
    }

    /// Indices of the cycles containing an instruction tagged `tag`.
    pub fn search_tag(&self, tag: &str) -> Vec<usize> {
        tags::search_tag(&self.cycles, tag)
    }

    /// Compiles the experiment again from its arguments.
    ///
    /// The copy owns its own steps.
    pub fn copy(&self) -> Result<Self> {
        Self::from_args(self.args.clone())
    }
}

impl Display for Experiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, cycle) in self.cycles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, instruction) in cycle.instructions().iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{instruction}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl Debug for Experiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Experiment({self})")
    }
}

pub struct ExperimentBuilder {
    inner: ExperimentArgs,
}

impl ExperimentBuilder {
    pub fn new(operating_conditions: Vec<OperatingCondition>) -> Self {
        Self {
            inner: ExperimentArgs::new(operating_conditions),
        }
    }

    /// Recording period, e.g. `"10 seconds"`.
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.inner.period = period.into();
        self
    }

    /// Ambient temperature in degrees Celsius.
    pub fn temperature(mut self, celsius: f64) -> Self {
        self.inner.temperature = Some(celsius);
        self
    }

    pub fn termination(mut self, termination: impl Into<TerminationArgs>) -> Self {
        self.inner.termination = Some(termination.into());
        self
    }

    #[deprecated(note = "pass drive cycles as step objects, e.g. `cycling_dsl::current`")]
    pub fn drive_cycles(mut self, drive_cycles: serde_json::Value) -> Self {
        self.inner.drive_cycles = Some(drive_cycles);
        self
    }

    #[deprecated(note = "use `cccv_ode(current, voltage)` steps")]
    pub fn cccv_handling(mut self, cccv_handling: serde_json::Value) -> Self {
        self.inner.cccv_handling = Some(cccv_handling);
        self
    }

    pub fn build(self) -> Result<Experiment> {
        Experiment::from_args(self.inner)
    }
}
