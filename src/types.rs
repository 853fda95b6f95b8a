//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including transition rules, head directions, execution status, step outcomes
//! and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: char = 'B';
/// The number of cells kept materialized on each side of the head.
pub const TAPE_PADDING: usize = 10;
/// The delay between two steps of a continuous run when no speed is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
/// The maximum number of steps the batch runner executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A single transition rule: what to do after reading a symbol in a given state.
///
/// The `(state, symbol)` pair the rule applies to is the key it is stored under in a
/// [`MachineDefinition`](crate::definition::MachineDefinition), not part of the rule itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written at the head position.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
///
/// Serialized with the single-character codes `"L"`, `"R"` and `"S"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(rename = "L")]
    Left,
    /// Move the head one position to the right.
    #[serde(rename = "R")]
    Right,
    /// Keep the head in the same position.
    #[serde(rename = "S")]
    Stay,
}

impl Direction {
    /// Returns the single-character code of this direction.
    pub fn code(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Direction {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "S" => Ok(Direction::Stay),
            other => Err(MachineError::InvalidDirection(other.to_string())),
        }
    }
}

/// The lifecycle status of an execution.
///
/// `Accepted` and `Rejected` are terminal: once reached, only a reset leaves them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Freshly reset, possibly stepped manually.
    #[default]
    Ready,
    /// A continuous run is in progress.
    Running,
    /// A continuous run was paused before the machine halted.
    Paused,
    /// The machine entered its accept state.
    Accepted,
    /// The machine entered its reject state, or found no rule to apply.
    Rejected,
}

impl Status {
    /// Checks if this status is terminal.
    pub fn is_halted(self) -> bool {
        matches!(self, Status::Accepted | Status::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ready => "Ready",
            Status::Running => "Running...",
            Status::Paused => "Paused",
            Status::Accepted => "Accepted ✓",
            Status::Rejected => "Rejected ✗",
        };
        f.write_str(label)
    }
}

/// Represents the outcome of a Turing Machine execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and has not halted.
    Continue,
    /// The machine is halted, either by this step or an earlier one.
    Halt(Halt),
}

/// The terminal verdict of a halted machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The input was accepted.
    Accept,
    /// The input was rejected, including rejections caused by a missing rule.
    Reject,
}

impl From<Halt> for Status {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Accept => Status::Accepted,
            Halt::Reject => Status::Rejected,
        }
    }
}

/// A speed setting between 1 (slowest) and 10 (fastest) for continuous runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a speed setting, clamping the value into `1..=10`.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The delay between two steps: 1000ms at speed 1 down to 100ms at speed 10.
    pub fn interval(self) -> Duration {
        Duration::from_millis(1100 - u64::from(self.0) * 100)
    }

    /// A coarse, human-readable label for this speed.
    pub fn label(self) -> &'static str {
        match self.0 {
            0..=3 => "Slow",
            4..=7 => "Medium",
            _ => "Fast",
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(6)
    }
}

/// Represents the errors that can occur at the boundaries of the simulator: reading,
/// decoding and storing machine configurations.
///
/// The execution engine itself never fails; every runtime condition has an in-model outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// A symbol in a configuration is not exactly one character long.
    #[error("Invalid symbol '{0}': symbols must be a single character")]
    InvalidSymbol(String),
    /// A transition key is not of the form `state,symbol`.
    #[error("Invalid transition key '{0}': expected 'state,symbol'")]
    InvalidTransitionKey(String),
    /// A direction code other than `L`, `R` or `S`.
    #[error("Invalid direction '{0}': expected L, R or S")]
    InvalidDirection(String),
    /// The configuration text is not valid JSON or does not have the expected shape.
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
    /// A lookup or consistency check on configurations failed.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for MachineError {
    fn from(error: serde_json::Error) -> Self {
        MachineError::ParseError(error.to_string())
    }
}
