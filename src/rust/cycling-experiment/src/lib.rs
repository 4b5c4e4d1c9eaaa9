// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

//! Compiles a cycling protocol into an [`Experiment`]: cycles of shared,
//! de-duplicated steps with resolved defaults and termination criteria.

pub mod error;
pub mod termination;

mod args;
mod cycles;
mod defaults;
mod experiment;
mod registry;
mod tags;

pub use crate::args::{DEFAULT_PERIOD, ExperimentArgs, TerminationArgs};
pub use crate::cycles::Cycle;
pub use crate::error::{Error, Result};
pub use crate::experiment::{Experiment, ExperimentBuilder};
pub use crate::registry::StepId;
pub use crate::tags::instruction_tags;
pub use crate::termination::{
    Termination, TerminationCriterion, TerminationError, TerminationKind, TerminationUnit,
    parse_termination,
};
pub use cycling_dsl as dsl;
