//! Boundary to the owner of the pixel data.
//!
//! The transform core never owns pixel storage. After computing a new
//! geometry it hands a [`PixelDirective`] to a [`PixelSink`], which is
//! responsible for rotating or resampling the actual buffer.
//!
//! [`PixelBuffer`] is a reference owner for RGB8 images that executes
//! directives with the `image` crate; hosts with their own storage implement
//! [`PixelSink`] themselves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageGeometry;
use crate::state::PixelHandle;
use crate::transform::{effective_turns, Direction};

/// Error types for pixel-side work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PixelError {
    /// The buffer length does not match `width * height * 3`.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The buffer has a zero-sized side.
    #[error("Pixel buffer is empty")]
    EmptyBuffer,

    /// A resample directive was computed for a different geometry.
    #[error("Directive expects a {expected} image, buffer is {actual}")]
    GeometryMismatch {
        expected: ImageGeometry,
        actual: ImageGeometry,
    },

    /// The work was cancelled before it finished.
    #[error("Pixel work was cancelled")]
    Cancelled,

    /// The pixel owner could not carry out the directive.
    #[error("Pixel owner failed: {0}")]
    Host(String),
}

/// What the pixel owner must do to match a new geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PixelDirective {
    /// Rotate by `turns` quarter turns (`0..4`) in `direction`.
    Rotate { turns: u8, direction: Direction },
    /// Resample from one geometry to another.
    Resample {
        from: ImageGeometry,
        to: ImageGeometry,
    },
}

impl PixelDirective {
    /// Net clockwise quarter turns; zero for resampling.
    pub fn effective_turns(&self) -> u8 {
        match *self {
            PixelDirective::Rotate { turns, direction } => effective_turns(turns as u32, direction),
            PixelDirective::Resample { .. } => 0,
        }
    }

    /// Whether carrying out the directive would leave the pixels unchanged.
    pub fn is_identity(&self) -> bool {
        match self {
            PixelDirective::Rotate { .. } => self.effective_turns() == 0,
            PixelDirective::Resample { from, to } => from == to,
        }
    }
}

/// Receiver of pixel directives, implemented by whoever owns pixel storage.
pub trait PixelSink {
    /// Carry out `directive` on the pixels behind `handle`.
    ///
    /// An error leaves the image geometry unchanged.
    fn apply(&mut self, handle: PixelHandle, directive: &PixelDirective)
        -> Result<(), PixelError>;
}

/// Discards every directive.
impl PixelSink for () {
    fn apply(&mut self, _: PixelHandle, _: &PixelDirective) -> Result<(), PixelError> {
        Ok(())
    }
}

/// Records every directive in order.
impl PixelSink for Vec<(PixelHandle, PixelDirective)> {
    fn apply(&mut self, handle: PixelHandle, directive: &PixelDirective) -> Result<(), PixelError> {
        self.push((handle, *directive));
        Ok(())
    }
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    fn apply(&mut self, handle: PixelHandle, directive: &PixelDirective) -> Result<(), PixelError> {
        (**self).apply(handle, directive)
    }
}

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// An RGB8 image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Row-major, 3 bytes per pixel.
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, checking that `pixels` holds exactly `width * height` RGB pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PixelError> {
        let expected = expected_len(width, height).ok_or(PixelError::BufferSizeMismatch {
            expected: usize::MAX,
            actual: pixels.len(),
        })?;
        if pixels.len() != expected {
            return Err(PixelError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        if width == 0 || height == 0 {
            return Err(PixelError::EmptyBuffer);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with one color.
    pub fn filled(geometry: ImageGeometry, rgb: [u8; 3]) -> Self {
        let image = image::RgbImage::from_pixel(geometry.width(), geometry.height(), image::Rgb(rgb));
        Self::from_rgb_image(image)
    }

    /// Create a PixelBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The buffer's dimensions as a geometry.
    pub fn geometry(&self) -> Result<ImageGeometry, PixelError> {
        ImageGeometry::new(self.width, self.height).map_err(|_| PixelError::EmptyBuffer)
    }

    /// RGB value at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Rotate or resample the buffer in place.
    ///
    /// Quarter turns are lossless. Resampling uses `filter` and requires the
    /// directive's source geometry to match the buffer.
    pub fn apply_directive(
        &mut self,
        directive: &PixelDirective,
        filter: FilterType,
    ) -> Result<(), PixelError> {
        if directive.is_identity() {
            return Ok(());
        }

        let current = self.geometry()?;
        let source = self.to_rgb_image().ok_or(PixelError::BufferSizeMismatch {
            expected: expected_len(self.width, self.height).unwrap_or(usize::MAX),
            actual: self.pixels.len(),
        })?;

        let output = match directive {
            PixelDirective::Rotate { .. } => match directive.effective_turns() {
                1 => image::imageops::rotate90(&source),
                2 => image::imageops::rotate180(&source),
                _ => image::imageops::rotate270(&source),
            },
            PixelDirective::Resample { from, to } => {
                if *from != current {
                    return Err(PixelError::GeometryMismatch {
                        expected: *from,
                        actual: current,
                    });
                }
                image::imageops::resize(&source, to.width(), to.height(), filter.to_image_filter())
            }
        };

        *self = Self::from_rgb_image(output);
        Ok(())
    }
}

/// A [`PixelBuffer`] paired with the filter used for resampling.
#[derive(Debug)]
pub struct BufferSink<'a> {
    pub buffer: &'a mut PixelBuffer,
    pub filter: FilterType,
}

impl<'a> BufferSink<'a> {
    pub fn new(buffer: &'a mut PixelBuffer, filter: FilterType) -> Self {
        Self { buffer, filter }
    }
}

impl PixelSink for BufferSink<'_> {
    fn apply(&mut self, _: PixelHandle, directive: &PixelDirective) -> Result<(), PixelError> {
        self.buffer.apply_directive(directive, self.filter)
    }
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(width: u32, height: u32) -> ImageGeometry {
        ImageGeometry::new(width, height).unwrap()
    }

    /// A buffer where each pixel encodes its own coordinates.
    fn coordinate_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(x as u8);
                pixels.push(y as u8);
                pixels.push(0);
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_buffer_size_checked() {
        assert!(PixelBuffer::new(2, 2, vec![0; 12]).is_ok());
        assert_eq!(
            PixelBuffer::new(2, 2, vec![0; 11]),
            Err(PixelError::BufferSizeMismatch {
                expected: 12,
                actual: 11,
            })
        );
        assert_eq!(PixelBuffer::new(0, 5, vec![]), Err(PixelError::EmptyBuffer));
    }

    #[test]
    fn test_identity_directives() {
        let half_turn_back = PixelDirective::Rotate {
            turns: 0,
            direction: Direction::CounterClockwise,
        };
        assert!(half_turn_back.is_identity());

        let same = PixelDirective::Resample {
            from: geom(10, 10),
            to: geom(10, 10),
        };
        assert!(same.is_identity());

        let quarter = PixelDirective::Rotate {
            turns: 1,
            direction: Direction::Clockwise,
        };
        assert!(!quarter.is_identity());
    }

    #[test]
    fn test_rotate_clockwise_moves_pixels() {
        let mut buffer = coordinate_image(3, 2);
        let directive = PixelDirective::Rotate {
            turns: 1,
            direction: Direction::Clockwise,
        };
        buffer.apply_directive(&directive, FilterType::Nearest).unwrap();

        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.height(), 3);
        // The bottom-left source pixel (0, 1) ends up top-left after a clockwise turn
        assert_eq!(buffer.pixel(0, 0), Some([0, 1, 0]));
        // The top-left source pixel (0, 0) ends up top-right
        assert_eq!(buffer.pixel(1, 0), Some([0, 0, 0]));
    }

    #[test]
    fn test_counter_clockwise_matches_three_clockwise() {
        let mut ccw = coordinate_image(4, 3);
        let mut cw = coordinate_image(4, 3);

        ccw.apply_directive(
            &PixelDirective::Rotate {
                turns: 1,
                direction: Direction::CounterClockwise,
            },
            FilterType::Nearest,
        )
        .unwrap();
        cw.apply_directive(
            &PixelDirective::Rotate {
                turns: 3,
                direction: Direction::Clockwise,
            },
            FilterType::Nearest,
        )
        .unwrap();

        assert_eq!(ccw, cw);
    }

    #[test]
    fn test_half_turn_keeps_dimensions() {
        let mut buffer = coordinate_image(4, 3);
        buffer
            .apply_directive(
                &PixelDirective::Rotate {
                    turns: 2,
                    direction: Direction::Clockwise,
                },
                FilterType::Nearest,
            )
            .unwrap();
        assert_eq!(buffer.geometry().unwrap(), geom(4, 3));
        assert_eq!(buffer.pixel(0, 0), Some([3, 2, 0]));
    }

    #[test]
    fn test_resample() {
        let mut buffer = PixelBuffer::filled(geom(30, 20), [200, 100, 50]);
        let directive = PixelDirective::Resample {
            from: geom(30, 20),
            to: geom(15, 10),
        };
        buffer.apply_directive(&directive, FilterType::Bilinear).unwrap();

        assert_eq!(buffer.geometry().unwrap(), geom(15, 10));
        assert_eq!(buffer.pixels().len(), 15 * 10 * 3);
        // A flat color survives resampling
        assert_eq!(buffer.pixel(7, 5), Some([200, 100, 50]));
    }

    #[test]
    fn test_resample_geometry_mismatch() {
        let mut buffer = PixelBuffer::filled(geom(30, 20), [0, 0, 0]);
        let directive = PixelDirective::Resample {
            from: geom(300, 200),
            to: geom(15, 10),
        };
        assert_eq!(
            buffer.apply_directive(&directive, FilterType::Bilinear),
            Err(PixelError::GeometryMismatch {
                expected: geom(300, 200),
                actual: geom(30, 20),
            })
        );
        // Buffer is untouched
        assert_eq!(buffer.geometry().unwrap(), geom(30, 20));
    }

    #[test]
    fn test_recording_sink() {
        let mut recorded: Vec<(PixelHandle, PixelDirective)> = Vec::new();
        let directive = PixelDirective::Rotate {
            turns: 2,
            direction: Direction::Clockwise,
        };
        recorded.apply(PixelHandle::new(7), &directive).unwrap();
        assert_eq!(recorded, vec![(PixelHandle::new(7), directive)]);
    }

    #[test]
    fn test_buffer_sink() {
        let mut buffer = PixelBuffer::filled(geom(8, 4), [1, 2, 3]);
        let mut sink = BufferSink::new(&mut buffer, FilterType::Nearest);
        sink.apply(
            PixelHandle::new(1),
            &PixelDirective::Rotate {
                turns: 1,
                direction: Direction::Clockwise,
            },
        )
        .unwrap();
        assert_eq!(buffer.geometry().unwrap(), geom(4, 8));
    }

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }
}
