//! Command dispatch: the single entry point from a command string to a
//! geometry change.
//!
//! # Flow
//!
//! 1. Parse the command string (failures are `Rejected`).
//! 2. With no image loaded, return `NoOp`.
//! 3. Compute the new geometry with the transform engine.
//! 4. Hand the pixel directive to the [`PixelSink`].
//! 5. Only then write the new geometry into the [`ImageState`].
//!
//! Any failure before step 5 leaves the state untouched, and nothing in this
//! module panics on user input.

use thiserror::Error;

use crate::command::{parse_command, Command, CommandName, ParseError};
use crate::config::{ConfigError, TransformConfig};
use crate::geometry::ImageGeometry;
use crate::pixels::{PixelError, PixelSink};
use crate::state::{ImageState, PixelHandle};
use crate::transform::{apply_command, TransformError, TransformOutput};

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// Malformed command text.
    #[error(transparent)]
    Parse(ParseError),

    /// A flag the command does not accept.
    #[error("Unsupported flag for {command}: --{flag}")]
    UnsupportedFlag { command: CommandName, flag: String },

    /// The transform would produce an unusable geometry.
    #[error(transparent)]
    InvalidGeometry(#[from] TransformError),

    /// The pixel owner could not follow the geometry change.
    #[error(transparent)]
    PixelData(#[from] PixelError),
}

impl From<ParseError> for ErrorKind {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnsupportedFlag { command, flag } => {
                ErrorKind::UnsupportedFlag { command, flag }
            }
            other => ErrorKind::Parse(other),
        }
    }
}

/// Outcome of dispatching one command.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformResult {
    /// The image now has this geometry.
    Applied(ImageGeometry),
    /// No image is loaded; nothing happened.
    NoOp,
    /// The command was refused and the state is unchanged.
    Rejected(ErrorKind),
}

impl TransformResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransformResult::Applied(_))
    }

    /// One-line text for a status bar.
    pub fn status_message(&self) -> String {
        match self {
            TransformResult::Applied(geometry) => {
                format!("{} ({})", geometry, geometry.orientation())
            }
            TransformResult::NoOp => "no image loaded".to_string(),
            TransformResult::Rejected(err) => err.to_string(),
        }
    }
}

/// A transform that is ready to be committed.
pub(crate) type Planned = Option<(PixelHandle, TransformOutput)>;

/// Resolves commands against an [`ImageState`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: TransformConfig,
}

impl Dispatcher {
    /// Create a dispatcher with a validated config.
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Dispatch without a pixel owner; directives are dropped.
    pub fn dispatch(&self, input: &str, state: &mut ImageState) -> TransformResult {
        self.dispatch_with(input, state, &mut ())
    }

    /// Dispatch a command string, forwarding the pixel directive to `sink`.
    pub fn dispatch_with<S: PixelSink + ?Sized>(
        &self,
        input: &str,
        state: &mut ImageState,
        sink: &mut S,
    ) -> TransformResult {
        match parse_command(input) {
            Ok(command) => self.dispatch_command(&command, state, sink),
            Err(err) => reject(input, err.into()),
        }
    }

    /// Dispatch an already parsed command.
    pub fn dispatch_command<S: PixelSink + ?Sized>(
        &self,
        command: &Command,
        state: &mut ImageState,
        sink: &mut S,
    ) -> TransformResult {
        let (handle, output) = match self.plan(command, state) {
            Ok(Some(planned)) => planned,
            Ok(None) => return TransformResult::NoOp,
            Err(err) => return reject(command.name().as_str(), err),
        };

        if !output.directive.is_identity() {
            if let Err(err) = sink.apply(handle, &output.directive) {
                return reject(command.name().as_str(), err.into());
            }
        }

        state.set_geometry(output.geometry);
        log::info!("{} applied, image is now {}", command.name(), output.geometry);
        TransformResult::Applied(output.geometry)
    }

    /// Compute what `command` would do to `state` without changing anything.
    pub(crate) fn plan(&self, command: &Command, state: &ImageState) -> Result<Planned, ErrorKind> {
        let ImageState::Loaded { geometry, pixels } = *state else {
            log::debug!("no image loaded, ignoring {}", command.name());
            return Ok(None);
        };
        let output = apply_command(command, geometry, &self.config)?;
        Ok(Some((pixels, output)))
    }
}

pub(crate) fn reject(what: &str, err: ErrorKind) -> TransformResult {
    log::warn!("rejected {:?}: {}", what, err);
    TransformResult::Rejected(err)
}

/// Dispatch `input` against `state` with the default config.
///
/// ```ignore
/// use imcommand_core::{dispatch, ImageGeometry, ImageState, PixelHandle, TransformResult};
///
/// let mut state = ImageState::loaded(ImageGeometry::new(300, 200)?, PixelHandle::new(1));
/// assert_eq!(
///     dispatch("rotate", &mut state),
///     TransformResult::Applied(ImageGeometry::new(200, 300)?)
/// );
/// ```
pub fn dispatch(input: &str, state: &mut ImageState) -> TransformResult {
    Dispatcher::default().dispatch(input, state)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
