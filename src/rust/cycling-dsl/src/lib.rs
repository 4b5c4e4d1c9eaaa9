// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

//! The protocol language: steps, the instructions they are written as, and
//! the grammar turning instruction text into steps.

pub mod grammar;
pub mod instruction;
pub mod step;

pub use grammar::{ParseError, parse_instruction};
pub use instruction::{Instruction, OperatingCondition};
pub use step::builders::{StepBuilder, c_rate, current, power, resistance, rest, voltage};
pub use step::{Step, StepKind, StepTermination};
