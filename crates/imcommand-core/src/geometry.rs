//! Image geometry: pixel dimensions and the orientation derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transform::TransformError;

/// Orientation of an image, derived from its dimensions.
///
/// Square images count as landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Width is greater than or equal to height.
    Landscape,
    /// Height is greater than width.
    Portrait,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of an image. Both sides are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct ImageGeometry {
    width: u32,
    height: u32,
}

impl ImageGeometry {
    /// Create a geometry, rejecting zero-sized sides.
    pub fn new(width: u32, height: u32) -> Result<Self, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidGeometry {
                width: width as f64,
                height: height as f64,
            });
        }
        Ok(Self { width, height })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Derived orientation; never stored.
    pub fn orientation(&self) -> Orientation {
        if self.width >= self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// The same geometry with width and height exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Height divided by width.
    pub fn aspect_ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for ImageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Deserialize)]
struct RawGeometry {
    width: u32,
    height: u32,
}

impl TryFrom<RawGeometry> for ImageGeometry {
    type Error = TransformError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        ImageGeometry::new(raw.width, raw.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sides_rejected() {
        assert!(ImageGeometry::new(0, 10).is_err());
        assert!(ImageGeometry::new(10, 0).is_err());
        assert!(ImageGeometry::new(1, 1).is_ok());
    }

    #[test]
    fn test_orientation() {
        let landscape = ImageGeometry::new(300, 200).unwrap();
        let portrait = ImageGeometry::new(200, 300).unwrap();
        let square = ImageGeometry::new(100, 100).unwrap();

        assert_eq!(landscape.orientation(), Orientation::Landscape);
        assert_eq!(portrait.orientation(), Orientation::Portrait);
        // Square images are landscape
        assert_eq!(square.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_swapped() {
        let geometry = ImageGeometry::new(300, 200).unwrap();
        let swapped = geometry.swapped();
        assert_eq!(swapped.width(), 200);
        assert_eq!(swapped.height(), 300);
        assert_eq!(swapped.swapped(), geometry);
    }

    #[test]
    fn test_display() {
        let geometry = ImageGeometry::new(640, 480).unwrap();
        assert_eq!(geometry.to_string(), "640x480");
        assert_eq!(geometry.orientation().to_string(), "landscape");
        assert_eq!(Orientation::Portrait.to_string(), "portrait");
    }

    #[test]
    fn test_aspect_ratio_and_pixel_count() {
        let geometry = ImageGeometry::new(300, 200).unwrap();
        assert!((geometry.aspect_ratio() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(geometry.pixel_count(), 60_000);

        let huge = ImageGeometry::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(huge.pixel_count(), u32::MAX as u64 * u32::MAX as u64);
    }
}
