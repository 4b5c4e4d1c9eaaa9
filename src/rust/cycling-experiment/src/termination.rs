// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

//! Experiment-level stopping criteria.

use std::fmt::{self, Display, Formatter};

use cycling_log::warn;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::args::TerminationArgs;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TerminationError {
    #[error("Capacity termination must be given in the form '80%', '4Ah', or '4A.h' (got '{term}')")]
    CapacityFormat { term: String },
    #[error(
        "Only capacity or voltage can be provided as a termination reason, e.g. '80% capacity', '4 Ah capacity', or '2.5 V' (got '{term}')"
    )]
    UnknownKind { term: String },
    #[error("Invalid number '{value}' in termination '{term}'")]
    InvalidNumber { term: String, value: String },
}

type Result<T> = std::result::Result<T, TerminationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationKind {
    Capacity,
    Voltage,
}

impl Display for TerminationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TerminationKind::Capacity => write!(f, "capacity"),
            TerminationKind::Voltage => write!(f, "voltage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationUnit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "Ah")]
    AmpHours,
    #[serde(rename = "V")]
    Volts,
}

impl Display for TerminationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TerminationUnit::Percent => write!(f, "%"),
            TerminationUnit::AmpHours => write!(f, "Ah"),
            TerminationUnit::Volts => write!(f, "V"),
        }
    }
}

/// Threshold ending the whole experiment once reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminationCriterion {
    pub value: f64,
    pub unit: TerminationUnit,
}

impl TerminationCriterion {
    pub fn new(value: f64, unit: TerminationUnit) -> Self {
        Self { value, unit }
    }
}

impl Display for TerminationCriterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.unit {
            TerminationUnit::Percent => write!(f, "{}%", self.value),
            unit => write!(f, "{} {unit}", self.value),
        }
    }
}

/// At most one criterion per [`TerminationKind`], in the order the kinds
/// were first given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Termination {
    criteria: IndexMap<TerminationKind, TerminationCriterion>,
}

impl Termination {
    pub fn get(&self, kind: TerminationKind) -> Option<&TerminationCriterion> {
        self.criteria.get(&kind)
    }

    pub fn capacity(&self) -> Option<&TerminationCriterion> {
        self.get(TerminationKind::Capacity)
    }

    pub fn voltage(&self) -> Option<&TerminationCriterion> {
        self.get(TerminationKind::Voltage)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerminationKind, &TerminationCriterion)> {
        self.criteria.iter().map(|(kind, criterion)| (*kind, criterion))
    }

    fn insert(&mut self, kind: TerminationKind, criterion: TerminationCriterion, term: &str) {
        if let Some(previous) = self.criteria.insert(kind, criterion) {
            warn!(
                "Termination '{}' replaces the earlier {} termination {}",
                term,
                kind,
                previous
            );
        }
    }
}

fn parse_number(term: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TerminationError::InvalidNumber {
            term: term.to_string(),
            value: value.to_string(),
        })
}

/// Parses a single criterion such as `"80% capacity"`, `"4 Ah capacity"` or
/// `"2.5 V"`.
fn parse_term(term: &str) -> Result<(TerminationKind, TerminationCriterion)> {
    let tokens: Vec<&str> = term.split_whitespace().collect();
    match tokens.split_last() {
        Some((&"capacity", magnitude)) => {
            let magnitude = magnitude.concat().replace("A.h", "Ah");
            let (value, unit) = if let Some(value) = magnitude.strip_suffix('%') {
                (value, TerminationUnit::Percent)
            } else if let Some(value) = magnitude.strip_suffix("Ah") {
                (value, TerminationUnit::AmpHours)
            } else {
                return Err(TerminationError::CapacityFormat {
                    term: term.to_string(),
                });
            };
            let value = parse_number(term, value)?;
            Ok((TerminationKind::Capacity, TerminationCriterion::new(value, unit)))
        }
        Some(_) if term.trim_end().ends_with('V') => {
            let value = term.trim_end().trim_end_matches('V');
            let value = parse_number(term, value)?;
            Ok((
                TerminationKind::Voltage,
                TerminationCriterion::new(value, TerminationUnit::Volts),
            ))
        }
        _ => Err(TerminationError::UnknownKind {
            term: term.to_string(),
        }),
    }
}

/// Compiles the termination arguments of an experiment.
///
/// A later criterion of the same kind replaces an earlier one. The first
/// malformed criterion fails the whole input.
pub fn parse_termination(args: Option<&TerminationArgs>) -> Result<Termination> {
    let mut termination = Termination::default();
    let Some(args) = args else {
        return Ok(termination);
    };
    for term in args.terms() {
        let (kind, criterion) = parse_term(term)?;
        termination.insert(kind, criterion, term);
    }
    Ok(termination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(args: impl Into<TerminationArgs>) -> Result<Termination> {
        parse_termination(Some(&args.into()))
    }

    #[test]
    fn test_none_is_empty() {
        assert!(parse_termination(None).unwrap().is_empty());
        assert!(parse(Vec::<String>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_capacity() {
        let termination = parse("80% capacity").unwrap();
        assert_eq!(
            termination.capacity(),
            Some(&TerminationCriterion::new(80.0, TerminationUnit::Percent))
        );
        assert_eq!(termination.voltage(), None);

        let termination = parse("4Ah capacity").unwrap();
        assert_eq!(
            termination.capacity(),
            Some(&TerminationCriterion::new(4.0, TerminationUnit::AmpHours))
        );
    }

    #[test]
    fn test_capacity_spacing_and_dotted_amp_hours() {
        for term in ["4 Ah capacity", "4A.h capacity", "4 A.h capacity"] {
            assert_eq!(
                parse(term).unwrap().capacity(),
                Some(&TerminationCriterion::new(4.0, TerminationUnit::AmpHours)),
                "{term}"
            );
        }
    }

    #[test]
    fn test_voltage() {
        let termination = parse("2.5 V").unwrap();
        assert_eq!(
            termination.voltage(),
            Some(&TerminationCriterion::new(2.5, TerminationUnit::Volts))
        );
        assert_eq!(
            parse("3V").unwrap().voltage(),
            Some(&TerminationCriterion::new(3.0, TerminationUnit::Volts))
        );
    }

    #[test]
    fn test_list() {
        let termination = parse(["80% capacity", "2.5 V"]).unwrap();
        assert_eq!(termination.len(), 2);
        assert_eq!(
            termination.iter().collect::<Vec<_>>(),
            vec![
                (
                    TerminationKind::Capacity,
                    &TerminationCriterion::new(80.0, TerminationUnit::Percent)
                ),
                (
                    TerminationKind::Voltage,
                    &TerminationCriterion::new(2.5, TerminationUnit::Volts)
                ),
            ]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let termination = parse(["80% capacity", "2 Ah capacity"]).unwrap();
        assert_eq!(termination.len(), 1);
        assert_eq!(
            termination.capacity(),
            Some(&TerminationCriterion::new(2.0, TerminationUnit::AmpHours))
        );
    }

    #[test]
    fn test_capacity_without_unit() {
        let err = parse("80 capacity").unwrap_err();
        assert!(matches!(err, TerminationError::CapacityFormat { .. }));
        assert!(
            err.to_string()
                .starts_with("Capacity termination must be given in the form '80%', '4Ah', or '4A.h'")
        );
    }

    #[test]
    fn test_unknown_kind() {
        for term in ["abc", "", "   ", "80% energy"] {
            let err = parse(term).unwrap_err();
            assert!(matches!(err, TerminationError::UnknownKind { .. }), "{term}");
            assert!(err.to_string().starts_with(
                "Only capacity or voltage can be provided as a termination reason"
            ));
        }
    }

    #[test]
    fn test_invalid_number() {
        assert!(matches!(
            parse("eighty% capacity"),
            Err(TerminationError::InvalidNumber { .. })
        ));
        assert!(matches!(parse("inf V"), Err(TerminationError::InvalidNumber { .. })));
        assert!(matches!(parse("V"), Err(TerminationError::InvalidNumber { .. })));
    }

    #[test]
    fn test_first_error_fails_everything() {
        assert!(matches!(
            parse(["80% capacity", "abc", "2.5 V"]),
            Err(TerminationError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_serialize() {
        let termination = parse(["80% capacity", "2.5 V"]).unwrap();
        assert_eq!(
            serde_json::to_value(&termination).unwrap(),
            serde_json::json!({
                "capacity": {"value": 80.0, "unit": "%"},
                "voltage": {"value": 2.5, "unit": "V"},
            })
        );
    }

    proptest! {
        #[test]
        fn percent_capacity_parses(value in 0.0f64..1000.0, spaced in any::<bool>()) {
            let term = if spaced { format!("{value} % capacity") } else { format!("{value}% capacity") };
            let termination = parse(term).unwrap();
            prop_assert_eq!(
                termination.capacity(),
                Some(&TerminationCriterion::new(value, TerminationUnit::Percent))
            );
        }

        #[test]
        fn voltage_parses(value in 0.0f64..10.0) {
            let termination = parse(format!("{value} V")).unwrap();
            prop_assert_eq!(
                termination.voltage(),
                Some(&TerminationCriterion::new(value, TerminationUnit::Volts))
            );
        }

        #[test]
        fn at_most_one_entry_per_kind(volts in prop::collection::vec(0.0f64..10.0, 1..6)) {
            let terms: Vec<String> = volts.iter().map(|v| format!("{v} V")).collect();
            let termination = parse(terms).unwrap();
            prop_assert_eq!(termination.len(), 1);
            prop_assert_eq!(termination.voltage().map(|c| c.value), volts.last().copied());
        }
    }
}
