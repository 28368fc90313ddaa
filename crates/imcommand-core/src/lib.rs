//! imcommand Core - command-driven geometry transforms for an image viewer
//!
//! This crate turns short command strings such as `rotate`,
//! `3rotate --counter-clockwise`, `rescale 2 1` or `resize 150` into new
//! image geometry, and tells the owner of the pixel data how to follow.
//!
//! # Module Structure
//!
//! - `command` - Command grammar and parser
//! - `transform` - Pure geometry math for rotate, rescale and resize
//! - `dispatch` - Entry point from command text to a [`TransformResult`]
//! - `pixels` - Pixel directives, the [`PixelSink`] seam and a reference buffer
//! - `session` - Image ownership with pixel work on a worker thread
//! - `state` / `geometry` / `config` - Data model and tunables

pub mod command;
pub mod config;
pub mod dispatch;
pub mod geometry;
pub mod pixels;
pub mod session;
pub mod state;
pub mod transform;

pub use command::{parse_command, Command, CommandKind, CommandName, ParseError};
pub use config::{ConfigError, TransformConfig};
pub use dispatch::{dispatch, Dispatcher, ErrorKind, TransformResult};
pub use geometry::{ImageGeometry, Orientation};
pub use pixels::{BufferSink, FilterType, PixelBuffer, PixelDirective, PixelError, PixelSink};
pub use session::{ImageSession, StateReader};
pub use state::{ImageState, PixelHandle};
pub use transform::{apply_command, Direction, RoundingMode, TransformError, TransformOutput};
