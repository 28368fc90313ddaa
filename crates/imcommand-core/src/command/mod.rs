//! Command grammar and parser.
//!
//! Turns a raw command string such as `3rotate --counter-clockwise` or
//! `resize 150 200` into a [`Command`]: a repeat count plus a closed,
//! typed [`CommandKind`] whose arguments have already been validated.
//!
//! # Examples
//!
//! ```ignore
//! use imcommand_core::command::{parse_command, CommandKind};
//!
//! let command = parse_command("2rotate").unwrap();
//! assert_eq!(command.count.get(), 2);
//! assert!(matches!(command.kind, CommandKind::Rotate(_)));
//! ```

mod parser;
mod types;

pub use parser::parse_command;
pub use types::{
    Command, CommandKind, CommandName, Factor, Flag, ParseError, RescaleArgs, ResizeArgs,
    RotateArgs, MAX_FACTOR_SCALE,
};
