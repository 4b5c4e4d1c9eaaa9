// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

//! The instruction language.
//!
//! An instruction reads like `"Discharge at 1C for 1 hour or until 3.3 V at
//! 25oC (10 seconds period) [discharge,cycle]"`:
//!
//! - an action: `Charge at <value>`, `Discharge at <value>`, `Hold at <voltage>`
//!   or `Rest`, where a value is a current (`1 A`, `50 mA`), a C-rate (`1C`,
//!   `C/2`), a power (`2 W`) or, for discharge only, a resistance (`10 Ohm`);
//! - any of the clauses `for <duration>`, `until <condition>` (further
//!   conditions joined with `or`), `at <temperature>`;
//! - an optional `(<duration> period)`;
//! - an optional tag list, which is not part of the step.

use cycling_units::{
    Duration, Second, UnitError, parse_positive_duration, parse_temperature, split_magnitude,
};

use crate::step::{Step, StepKind, StepTermination};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid instruction '{instruction}': {reason}")]
    InvalidInstruction { instruction: String, reason: String },
    #[error("Invalid instruction '{instruction}': {source}")]
    Unit {
        instruction: String,
        #[source]
        source: UnitError,
    },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

fn invalid(instruction: &str, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidInstruction {
        instruction: instruction.to_string(),
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Amps(f64),
    CRate(f64),
    Watts(f64),
    Volts(f64),
    Ohms(f64),
}

impl Value {
    fn magnitude(self) -> f64 {
        match self {
            Value::Amps(v) | Value::CRate(v) | Value::Watts(v) | Value::Volts(v) | Value::Ohms(v) => v,
        }
    }
}

fn parse_value(text: &str) -> Option<Value> {
    if let Some(denominator) = text.strip_prefix("C/") {
        let denominator = denominator
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)?;
        return Some(Value::CRate(1.0 / denominator));
    }
    let (magnitude, unit) = split_magnitude(text).ok()?;
    let value = match unit {
        "A" => Value::Amps(magnitude),
        "mA" => Value::Amps(magnitude / 1000.0),
        "C" => Value::CRate(magnitude),
        "W" => Value::Watts(magnitude),
        "mW" => Value::Watts(magnitude / 1000.0),
        "V" => Value::Volts(magnitude),
        "mV" => Value::Volts(magnitude / 1000.0),
        "Ohm" | "Ohms" | "ohm" | "ohms" | "Ω" => Value::Ohms(magnitude),
        _ => return None,
    };
    Some(value)
}

fn is_keyword(token: &str) -> bool {
    ["for", "until", "or", "at"]
        .iter()
        .any(|keyword| token.eq_ignore_ascii_case(keyword))
}

/// Removes a trailing `" [tag1,tag2]"` list.
fn strip_tags(instruction: &str) -> Result<&str> {
    let trimmed = instruction.trim();
    match trimmed.split_once(" [") {
        None => Ok(trimmed),
        Some((body, tags)) if tags.ends_with(']') => Ok(body.trim_end()),
        Some(_) => Err(invalid(
            instruction,
            "unterminated tag list, expected '<instruction> [tag1,tag2]'",
        )),
    }
}

/// Splits off a trailing `" (<duration> period)"`.
fn split_period<'a>(
    instruction: &str,
    body: &'a str,
) -> Result<(&'a str, Option<Duration<Second>>)> {
    let Some(start) = body.rfind(" (") else {
        return Ok((body, None));
    };
    let malformed = || invalid(instruction, "expected a period of the form '(1 minute period)'");
    let inner = body[start + 2..]
        .strip_suffix(')')
        .ok_or_else(malformed)?
        .trim();
    let duration_text = inner
        .len()
        .checked_sub("period".len())
        .and_then(|split| inner.get(split..).map(|suffix| (split, suffix)))
        .filter(|(_, suffix)| suffix.eq_ignore_ascii_case("period"))
        .map(|(split, _)| inner[..split].trim())
        .ok_or_else(malformed)?;
    let period = parse_positive_duration(duration_text).map_err(|source| ParseError::Unit {
        instruction: instruction.to_string(),
        source,
    })?;
    Ok((body[..start].trim_end(), Some(period)))
}

struct InstructionParser<'a> {
    instruction: &'a str,
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> InstructionParser<'a> {
    fn new(instruction: &'a str, body: &'a str) -> Self {
        Self {
            instruction,
            tokens: body.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        invalid(self.instruction, reason)
    }

    fn unit_error(&self, source: UnitError) -> ParseError {
        ParseError::Unit {
            instruction: self.instruction.to_string(),
            source,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        match self.next_token() {
            Some(token) if token.eq_ignore_ascii_case(keyword) => Ok(()),
            Some(token) => Err(self.error(format!("expected '{keyword}', found '{token}'"))),
            None => Err(self.error(format!("expected '{keyword}'"))),
        }
    }

    /// Consumes tokens up to the next keyword.
    fn take_phrase(&mut self) -> &[&'a str] {
        let start = self.pos;
        while self.peek().is_some_and(|token| !is_keyword(token)) {
            self.pos += 1;
        }
        &self.tokens[start..self.pos]
    }

    fn setpoint(&mut self) -> Result<Value> {
        let text = self.take_phrase().concat();
        if text.is_empty() {
            return Err(self.error("missing value after 'at'"));
        }
        let value =
            parse_value(&text).ok_or_else(|| self.error(format!("cannot read value '{text}'")))?;
        if value.magnitude() <= 0.0 {
            return Err(self.error(format!("value '{text}' must be positive")));
        }
        Ok(value)
    }

    fn drive(&mut self, sign: f64) -> Result<StepKind> {
        self.expect_keyword("at")?;
        match self.setpoint()? {
            Value::Amps(amps) => Ok(StepKind::Current { amps: sign * amps }),
            Value::CRate(rate) => Ok(StepKind::CRate { rate: sign * rate }),
            Value::Watts(watts) => Ok(StepKind::Power {
                watts: sign * watts,
            }),
            Value::Ohms(ohms) if sign > 0.0 => Ok(StepKind::Resistance { ohms }),
            Value::Ohms(_) => Err(self.error("only discharge at a resistance is supported")),
            Value::Volts(_) => {
                Err(self.error("use 'Hold at <voltage>' for constant-voltage steps"))
            }
        }
    }

    fn action(&mut self) -> Result<StepKind> {
        let Some(verb) = self.next_token() else {
            return Err(self.error("instruction is empty"));
        };
        match verb.to_ascii_lowercase().as_str() {
            "rest" => Ok(StepKind::Rest),
            "charge" => self.drive(-1.0),
            "discharge" => self.drive(1.0),
            "hold" => {
                self.expect_keyword("at")?;
                match self.setpoint()? {
                    Value::Volts(volts) => Ok(StepKind::Voltage { volts }),
                    _ => Err(self.error("'Hold' needs a voltage, e.g. 'Hold at 4.2 V'")),
                }
            }
            _ => Err(self.error(
                "instruction must start with 'Charge', 'Discharge', 'Hold' or 'Rest'",
            )),
        }
    }

    fn condition(&mut self) -> Result<StepTermination> {
        let text = self.take_phrase().concat();
        match parse_value(&text) {
            Some(Value::Volts(volts)) if volts > 0.0 => Ok(StepTermination::Voltage { volts }),
            Some(Value::Amps(amps)) => Ok(StepTermination::Current { amps: amps.abs() }),
            Some(Value::CRate(rate)) => Ok(StepTermination::CRate { rate: rate.abs() }),
            _ => Err(self.error(format!(
                "cannot read stopping condition '{text}', expected a voltage, current or C-rate"
            ))),
        }
    }

    fn clauses(&mut self, step: &mut Step) -> Result<()> {
        let mut after_condition = false;
        while let Some(token) = self.next_token() {
            match token.to_ascii_lowercase().as_str() {
                "for" => {
                    if step.duration.is_some() {
                        return Err(self.error("duration given more than once"));
                    }
                    let text = self.take_phrase().join(" ");
                    let duration = parse_positive_duration(&text).map_err(|e| self.unit_error(e))?;
                    step.duration = Some(duration);
                    after_condition = false;
                }
                "until" => {
                    step.terminations.push(self.condition()?);
                    after_condition = true;
                }
                "or" => {
                    if self.peek().is_some_and(|t| t.eq_ignore_ascii_case("until")) {
                        self.pos += 1;
                    } else if !after_condition {
                        return Err(self.error("'or' must be followed by 'until'"));
                    }
                    step.terminations.push(self.condition()?);
                    after_condition = true;
                }
                "at" => {
                    if step.temperature.is_some() {
                        return Err(self.error("temperature given more than once"));
                    }
                    let text = self.take_phrase().concat();
                    let temperature = parse_temperature(&text).map_err(|e| self.unit_error(e))?;
                    step.temperature = Some(temperature);
                    after_condition = false;
                }
                _ => return Err(self.error(format!("unexpected '{token}'"))),
            }
        }
        Ok(())
    }
}

/// Parses one instruction into a [`Step`].
///
/// The step's `description` is the instruction without its tag list, so
/// instructions differing only in their tags parse into equal steps.
pub fn parse_instruction(instruction: &str) -> Result<Step> {
    let without_tags = strip_tags(instruction)?;
    let (body, period) = split_period(instruction, without_tags)?;
    let mut parser = InstructionParser::new(instruction, body);
    let mut step = Step::new(parser.action()?);
    parser.clauses(&mut step)?;
    step.period = period;
    step.description = Some(without_tags.to_string());
    Ok(step)
}
