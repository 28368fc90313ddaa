//! Core types for parsed commands.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The command string contained nothing but whitespace.
    #[error("Empty command")]
    Empty,

    /// A count prefix was given without a command name after it.
    #[error("Missing command name after count")]
    MissingCommand,

    /// The command name is not one of the known commands.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The count prefix does not fit into a repeat count.
    #[error("Invalid count: {0}")]
    InvalidCount(String),

    /// The count prefix was zero.
    #[error("Count must be a positive integer")]
    NonPositiveCount,

    /// An argument is not a plain decimal number.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// An argument was zero.
    #[error("Argument must be positive: {0}")]
    NonPositiveArgument(String),

    /// An argument had a fractional part where a pixel count was required.
    #[error("Expected an integer: {0}")]
    ExpectedInteger(String),

    /// The command received a number of arguments it does not accept.
    #[error("{command} takes {expected} argument(s), got {found}")]
    WrongArity {
        command: CommandName,
        expected: &'static str,
        found: usize,
    },

    /// A flag that the command does not understand.
    #[error("Unsupported flag for {command}: --{flag}")]
    UnsupportedFlag { command: CommandName, flag: String },

    /// A positional argument appeared after a flag.
    #[error("Unexpected token after flags: {0}")]
    UnexpectedToken(String),
}

/// The closed set of transform commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandName {
    Rotate,
    Rescale,
    Resize,
}

impl CommandName {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Rotate => "rotate",
            CommandName::Rescale => "rescale",
            CommandName::Resize => "resize",
        }
    }

    /// Whether `flag` is meaningful for this command.
    pub fn accepts(self, flag: Flag) -> bool {
        match (self, flag) {
            (CommandName::Rotate, Flag::CounterClockwise) => true,
            (CommandName::Rescale | CommandName::Resize, _) => false,
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rotate" => Ok(CommandName::Rotate),
            "rescale" => Ok(CommandName::Rescale),
            "resize" => Ok(CommandName::Resize),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Recognized `--flag` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    /// Rotate against the clock.
    CounterClockwise,
}

impl Flag {
    /// Look up a flag by its name without the leading dashes.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "counter-clockwise" => Some(Flag::CounterClockwise),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flag::CounterClockwise => "counter-clockwise",
        }
    }
}

/// Arguments of `rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotateArgs {
    pub counter_clockwise: bool,
}

/// Most digits kept after the decimal point of a [`Factor`].
pub const MAX_FACTOR_SCALE: u32 = 18;

/// A positive decimal scale factor, kept exact as `numerator / 10^scale`.
///
/// `0.7` is stored as `7 / 10`, so rounding `45 * 0.7` sees the true tie at
/// `31.5` instead of a binary approximation just below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Factor {
    numerator: u64,
    scale: u32,
}

impl Factor {
    /// `numerator / 10^scale`, or `None` if that is zero or too precise.
    pub fn new(numerator: u64, scale: u32) -> Option<Self> {
        if numerator == 0 || scale > MAX_FACTOR_SCALE {
            return None;
        }
        let (mut numerator, mut scale) = (numerator, scale);
        while scale > 0 && numerator % 10 == 0 {
            numerator /= 10;
            scale -= 1;
        }
        Some(Self { numerator, scale })
    }

    /// A whole-number factor.
    pub fn integer(value: u64) -> Option<Self> {
        Self::new(value, 0)
    }

    pub fn numerator(self) -> u64 {
        self.numerator
    }

    /// `10^scale`.
    pub fn denominator(self) -> u64 {
        10u64.pow(self.scale)
    }

    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator() as f64
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let denominator = self.denominator();
        let (whole, frac) = (self.numerator / denominator, self.numerator % denominator);
        if self.scale == 0 {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{:0width$}", whole, frac, width = self.scale as usize)
        }
    }
}

impl From<Factor> for f64 {
    fn from(factor: Factor) -> f64 {
        factor.as_f64()
    }
}

impl TryFrom<f64> for Factor {
    type Error = ParseError;

    /// Goes through the shortest decimal form of `value`, so `0.7` becomes
    /// exactly `7 / 10`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ParseError::InvalidNumber(value.to_string()));
        }
        value.to_string().parse()
    }
}

/// Arguments of `rescale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescaleArgs {
    /// Horizontal factor.
    pub sx: Factor,
    /// Vertical factor; `None` means the same as `sx`.
    pub sy: Option<Factor>,
}

impl RescaleArgs {
    /// The effective `(sx, sy)` pair.
    pub fn factors(&self) -> (Factor, Factor) {
        (self.sx, self.sy.unwrap_or(self.sx))
    }
}

/// Arguments of `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeArgs {
    /// Target width in pixels.
    pub width: u32,
    /// Target height; `None` derives it from the current aspect ratio.
    pub height: Option<u32>,
}

/// A command with its validated, fixed-shape arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum CommandKind {
    Rotate(RotateArgs),
    Rescale(RescaleArgs),
    Resize(ResizeArgs),
}

impl CommandKind {
    pub fn name(&self) -> CommandName {
        match self {
            CommandKind::Rotate(_) => CommandName::Rotate,
            CommandKind::Rescale(_) => CommandName::Rescale,
            CommandKind::Resize(_) => CommandName::Resize,
        }
    }
}

/// A fully parsed command: repeat count plus the typed operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Repeat count, 1 when the command string had no prefix.
    pub count: NonZeroU32,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl Command {
    /// A command with a count of one.
    pub fn once(kind: CommandKind) -> Self {
        Self {
            count: NonZeroU32::MIN,
            kind,
        }
    }

    pub fn name(&self) -> CommandName {
        self.kind.name()
    }
}
