//! Shared types for geometry transforms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TransformConfig;
use crate::geometry::ImageGeometry;

/// Error types for geometry transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A side rounded to zero or below, or does not fit in a pixel count.
    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry { width: f64, height: f64 },

    /// A side is larger than the configured maximum.
    #[error("Geometry {width}x{height} exceeds the maximum dimension {limit}")]
    ExceedsLimit { width: u32, height: u32, limit: u32 },
}

/// How fractional dimensions are turned into pixel counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round to the nearest integer, ties away from zero.
    #[default]
    Nearest,
    /// Round down.
    Floor,
    /// Round up.
    Ceil,
}

impl RoundingMode {
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::Nearest => value.round(),
            RoundingMode::Floor => value.floor(),
            RoundingMode::Ceil => value.ceil(),
        }
    }

    /// Round `numerator / denominator` with integer arithmetic.
    ///
    /// `None` if `denominator` is zero or the intermediate sum overflows.
    pub fn round_ratio(self, numerator: u128, denominator: u128) -> Option<u128> {
        if denominator == 0 {
            return None;
        }
        match self {
            RoundingMode::Nearest => Some(numerator.checked_add(denominator / 2)? / denominator),
            RoundingMode::Floor => Some(numerator / denominator),
            RoundingMode::Ceil => Some(numerator.div_ceil(denominator)),
        }
    }
}

/// Round an exact `numerator / denominator` side into a pixel count, if it is
/// a valid one.
pub(crate) fn exact_dimension(
    numerator: u128,
    denominator: u128,
    rounding: RoundingMode,
) -> Option<u32> {
    let rounded = rounding.round_ratio(numerator, denominator)?;
    if rounded == 0 {
        return None;
    }
    u32::try_from(rounded).ok()
}

/// Round a fractional side into a pixel count, if it is a valid one.
pub(crate) fn to_dimension(value: f64, rounding: RoundingMode) -> Option<u32> {
    let rounded = rounding.round(value);
    if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}

/// Apply the configured dimension cap to already rounded sides.
pub(crate) fn limited_geometry(
    w: u32,
    h: u32,
    config: &TransformConfig,
) -> Result<ImageGeometry, TransformError> {
    if let Some(limit) = config.max_dimension {
        if w > limit || h > limit {
            return Err(TransformError::ExceedsLimit {
                width: w,
                height: h,
                limit,
            });
        }
    }

    ImageGeometry::new(w, h)
}
