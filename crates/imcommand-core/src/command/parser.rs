//! Parser for count-prefixed command strings.
//!
//! Grammar:
//!
//! ```text
//! command := [count] name {WS arg} {WS flag}
//! count   := digit+
//! name    := "rotate" | "rescale" | "resize"
//! arg     := digit+ ["." digit+] | "." digit+
//! flag    := "--" identifier
//! ```
//!
//! The count is glued to the name (`3rotate`). Arguments and flags are
//! separated by ASCII whitespace, and every flag must come after every
//! argument.

use std::num::NonZeroU32;
use std::str::FromStr;

use super::types::{
    Command, CommandKind, CommandName, Factor, Flag, ParseError, RescaleArgs, ResizeArgs,
    RotateArgs, MAX_FACTOR_SCALE,
};

/// Parse a command string into a typed [`Command`].
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found. Unsupported
/// flags are reported as [`ParseError::UnsupportedFlag`].
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let mut tokens = input.split_ascii_whitespace();
    let head = tokens.next().ok_or(ParseError::Empty)?;

    let (count, name) = split_count(head)?;
    let name: CommandName = name.parse()?;

    let mut args = Vec::new();
    let mut flags = Vec::new();
    for token in tokens {
        if let Some(flag_name) = token.strip_prefix("--") {
            flags.push(parse_flag(name, flag_name)?);
        } else if !flags.is_empty() {
            return Err(ParseError::UnexpectedToken(token.to_string()));
        } else {
            args.push(token);
        }
    }

    let kind = match name {
        CommandName::Rotate => {
            if !args.is_empty() {
                return Err(ParseError::WrongArity {
                    command: name,
                    expected: "0",
                    found: args.len(),
                });
            }
            CommandKind::Rotate(RotateArgs {
                counter_clockwise: flags.contains(&Flag::CounterClockwise),
            })
        }
        CommandName::Rescale => match args.as_slice() {
            [sx] => CommandKind::Rescale(RescaleArgs {
                sx: sx.parse()?,
                sy: None,
            }),
            [sx, sy] => CommandKind::Rescale(RescaleArgs {
                sx: sx.parse()?,
                sy: Some(sy.parse()?),
            }),
            _ => {
                return Err(ParseError::WrongArity {
                    command: name,
                    expected: "1 or 2",
                    found: args.len(),
                })
            }
        },
        CommandName::Resize => match args.as_slice() {
            [width] => CommandKind::Resize(ResizeArgs {
                width: parse_integer(width)?,
                height: None,
            }),
            [width, height] => CommandKind::Resize(ResizeArgs {
                width: parse_integer(width)?,
                height: Some(parse_integer(height)?),
            }),
            _ => {
                return Err(ParseError::WrongArity {
                    command: name,
                    expected: "1 or 2",
                    found: args.len(),
                })
            }
        },
    };

    let command = Command { count, kind };
    log::debug!("parsed {:?} from {:?}", command, input);
    Ok(command)
}

/// Split the leading digit run off the first token.
fn split_count(head: &str) -> Result<(NonZeroU32, &str), ParseError> {
    if let Some(rest) = head.strip_prefix('-') {
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::NonPositiveCount);
        }
    }

    let digits = head.bytes().take_while(u8::is_ascii_digit).count();
    let (count_str, name) = head.split_at(digits);

    if name.is_empty() {
        return if digits == 0 {
            Err(ParseError::Empty)
        } else {
            Err(ParseError::MissingCommand)
        };
    }
    if count_str.is_empty() {
        return Ok((NonZeroU32::MIN, name));
    }

    if count_str.bytes().all(|b| b == b'0') {
        return Err(ParseError::NonPositiveCount);
    }
    let count = count_str
        .parse::<NonZeroU32>()
        .map_err(|_| ParseError::InvalidCount(count_str.to_string()))?;
    Ok((count, name))
}

fn parse_flag(command: CommandName, name: &str) -> Result<Flag, ParseError> {
    match Flag::from_name(name) {
        Some(flag) if command.accepts(flag) => Ok(flag),
        _ => Err(ParseError::UnsupportedFlag {
            command,
            flag: name.to_string(),
        }),
    }
}

/// Check the `digits ["." digits] | "." digits` shape.
///
/// `str::parse::<f64>` alone would also accept signs, exponents, `inf`
/// and `nan`.
fn is_plain_decimal(token: &str) -> bool {
    let (int, frac) = match token.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (token, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    match frac {
        None => !int.is_empty() && all_digits(int),
        Some(frac) => !frac.is_empty() && all_digits(int) && all_digits(frac),
    }
}

/// Parse a strictly positive decimal into an exact [`Factor`].
impl FromStr for Factor {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidNumber(token.to_string());
        if !is_plain_decimal(token) {
            return Err(invalid());
        }

        let (int, frac) = token.split_once('.').unwrap_or((token, ""));
        let frac = frac.trim_end_matches('0');
        let scale = u32::try_from(frac.len()).map_err(|_| invalid())?;
        if scale > MAX_FACTOR_SCALE {
            return Err(invalid());
        }

        let digits = format!("{int}{frac}");
        let numerator = if digits.is_empty() {
            0
        } else {
            digits.parse::<u64>().map_err(|_| invalid())?
        };
        if numerator == 0 {
            return Err(ParseError::NonPositiveArgument(token.to_string()));
        }
        Factor::new(numerator, scale).ok_or_else(invalid)
    }
}

/// Parse a strictly positive pixel count.
fn parse_integer(token: &str) -> Result<u32, ParseError> {
    if !is_plain_decimal(token) {
        return Err(ParseError::InvalidNumber(token.to_string()));
    }
    if token.contains('.') {
        return Err(ParseError::ExpectedInteger(token.to_string()));
    }
    let value = token
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))?;
    if value == 0 {
        return Err(ParseError::NonPositiveArgument(token.to_string()));
    }
    Ok(value)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any positive count prefix survives parsing.
        #[test]
        fn prop_count_roundtrip(count in 1u32..=100_000, ccw in any::<bool>()) {
            let flag = if ccw { " --counter-clockwise" } else { "" };
            let command = parse_command(&format!("{count}rotate{flag}")).unwrap();

            prop_assert_eq!(command.count.get(), count);
            prop_assert_eq!(command.kind, CommandKind::Rotate(RotateArgs { counter_clockwise: ccw }));
        }

        /// Property: the parser never panics on arbitrary input.
        #[test]
        fn prop_parser_total(input in "\\PC{0,40}") {
            let _ = parse_command(&input);
        }

        /// Property: parsed resize arguments are the ones written.
        #[test]
        fn prop_resize_args(width in 1u32..=u32::MAX, height in 1u32..=u32::MAX) {
            let command = parse_command(&format!("resize {width} {height}")).unwrap();
            prop_assert_eq!(
                command.kind,
                CommandKind::Resize(ResizeArgs { width, height: Some(height) })
            );
        }
    }
}
