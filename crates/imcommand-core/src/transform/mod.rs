//! Geometry transforms: quarter-turn rotation, rescale and resize.
//!
//! Everything in this module is a pure function of the current
//! [`ImageGeometry`], the parsed [`Command`] and the [`TransformConfig`].
//! Nothing here touches pixel buffers; instead each successful transform
//! produces a [`PixelDirective`] telling the pixel owner what to do.
//!
//! # Rounding
//!
//! Rescale and single-argument resize produce fractional sides. These are
//! rounded with [`RoundingMode::Nearest`] (ties away from zero) unless the
//! config says otherwise, using integer arithmetic on the exact decimal
//! factor. A side that rounds below 1, or past `u32::MAX`, is an
//! [`TransformError::InvalidGeometry`].

mod rescale;
mod resize;
mod rotation;
mod types;

pub use rescale::{rescale, rescale_repeated};
pub use resize::resize;
pub use rotation::{effective_turns, rotate, rotated_geometry, Direction};
pub use types::{RoundingMode, TransformError};

use crate::command::{Command, CommandKind};
use crate::config::TransformConfig;
use crate::geometry::ImageGeometry;
use crate::pixels::PixelDirective;

/// Result of a successful transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOutput {
    /// Geometry after the transform.
    pub geometry: ImageGeometry,
    /// What the pixel owner has to do to match `geometry`.
    pub directive: PixelDirective,
}

/// Compute the geometry `command` produces from `geometry`.
///
/// `rotate` uses the count as a number of quarter turns, `rescale` scales by
/// `factor^count` with a single rounding, and `resize` ignores the count
/// since resizing twice to the same target is the same as resizing once.
pub fn apply_command(
    command: &Command,
    geometry: ImageGeometry,
    config: &TransformConfig,
) -> Result<TransformOutput, TransformError> {
    match &command.kind {
        CommandKind::Rotate(args) => {
            let direction = Direction::from_counter_clockwise(args.counter_clockwise);
            let (rotated, directive) = rotate(geometry, command.count, direction);
            Ok(TransformOutput {
                geometry: rotated,
                directive,
            })
        }
        CommandKind::Rescale(args) => {
            let scaled = rescale_repeated(geometry, args, command.count, config)?;
            Ok(TransformOutput {
                geometry: scaled,
                directive: PixelDirective::Resample {
                    from: geometry,
                    to: scaled,
                },
            })
        }
        CommandKind::Resize(args) => {
            let resized = resize(geometry, args, config)?;
            Ok(TransformOutput {
                geometry: resized,
                directive: PixelDirective::Resample {
                    from: geometry,
                    to: resized,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;

    fn geom(width: u32, height: u32) -> ImageGeometry {
        ImageGeometry::new(width, height).unwrap()
    }

    fn run(input: &str, geometry: ImageGeometry) -> Result<TransformOutput, TransformError> {
        let command = parse_command(input).unwrap();
        apply_command(&command, geometry, &TransformConfig::default())
    }

    #[test]
    fn test_rotate_directive() {
        let output = run("rotate --counter-clockwise", geom(300, 200)).unwrap();
        assert_eq!(output.geometry, geom(200, 300));
        assert_eq!(
            output.directive,
            PixelDirective::Rotate {
                turns: 1,
                direction: Direction::CounterClockwise,
            }
        );
    }

    #[test]
    fn test_rescale_directive() {
        let output = run("rescale 2", geom(300, 200)).unwrap();
        assert_eq!(
            output.directive,
            PixelDirective::Resample {
                from: geom(300, 200),
                to: geom(600, 400),
            }
        );
    }

    #[test]
    fn test_rescale_count_repeats() {
        let output = run("2rescale 2", geom(300, 200)).unwrap();
        assert_eq!(output.geometry, geom(1200, 800));
    }

    #[test]
    fn test_resize_count_ignored() {
        let once = run("resize 150", geom(300, 200)).unwrap();
        let thrice = run("3resize 150", geom(300, 200)).unwrap();
        assert_eq!(once, thrice);
    }

    #[test]
    fn test_invalid_geometry_propagates() {
        let result = run("rescale 0.0001", geom(300, 200));
        assert!(matches!(
            result,
            Err(TransformError::InvalidGeometry { .. })
        ));
    }
}
