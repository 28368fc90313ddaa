//! Tunable behavior of the transform pipeline.
//!
//! `TransformConfig::default()` is what the acceptance behavior is defined
//! against: nearest rounding, no dimension cap, bilinear resampling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pixels::FilterType;
use crate::transform::RoundingMode;

/// Images at or above this many pixels have their pixel work done on a
/// background worker by [`ImageSession`](crate::session::ImageSession).
pub const DEFAULT_BACKGROUND_PIXEL_THRESHOLD: u64 = 4_000_000;

/// Error types for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_dimension must be at least 1")]
    ZeroMaxDimension,
}

/// Configuration for transform commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// How fractional sides become pixel counts.
    pub rounding: RoundingMode,
    /// Largest allowed width or height; `None` only limits to `u32::MAX`.
    pub max_dimension: Option<u32>,
    /// Resampling filter used by the reference pixel owner.
    pub filter: FilterType,
    /// Pixel count from which pixel work moves off the calling thread.
    pub background_pixel_threshold: u64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::Nearest,
            max_dimension: None,
            filter: FilterType::Bilinear,
            background_pixel_threshold: DEFAULT_BACKGROUND_PIXEL_THRESHOLD,
        }
    }
}

impl TransformConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the config for values that can never be satisfied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dimension == Some(0) {
            return Err(ConfigError::ZeroMaxDimension);
        }
        Ok(())
    }
}
