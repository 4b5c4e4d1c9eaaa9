// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use cycling_dsl::ParseError;
use cycling_units::UnitError;

use crate::termination::TerminationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reasons an experiment could not be constructed.
///
/// Construction is all or nothing: whenever one of these is returned, no
/// experiment exists.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    DeprecatedArgument(&'static str),

    #[error(transparent)]
    Grammar(#[from] ParseError),

    #[error(transparent)]
    Termination(#[from] TerminationError),

    #[error("Invalid experiment default: {0}")]
    Unit(#[from] UnitError),

    #[error("An experiment needs at least one operating condition")]
    EmptyProtocol,

    #[error("Cycle {index} contains no instructions")]
    EmptyCycle { index: usize },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
