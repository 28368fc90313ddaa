//! Resizing to an absolute target size.

use super::types::{exact_dimension, limited_geometry, RoundingMode, TransformError};
use crate::command::ResizeArgs;
use crate::config::TransformConfig;
use crate::geometry::ImageGeometry;

/// Resize `geometry` to the target in `args`.
///
/// With both sides given the result is exactly `width x height` and the
/// aspect ratio is not preserved. With only a width, the height follows the
/// current aspect ratio:
///
/// ```text
/// new_height = round(height * target_width / width)
/// ```
///
/// # Errors
///
/// Returns [`TransformError::InvalidGeometry`] if a side is zero or the
/// derived height rounds to zero, and [`TransformError::ExceedsLimit`] if a
/// side is above the configured maximum.
pub fn resize(
    geometry: ImageGeometry,
    args: &ResizeArgs,
    config: &TransformConfig,
) -> Result<ImageGeometry, TransformError> {
    let height = match args.height {
        Some(height) => Some(height),
        None => derived_height(geometry, args.width, config.rounding),
    };
    let Some(height) = height else {
        return Err(TransformError::InvalidGeometry {
            width: args.width as f64,
            height: geometry.height() as f64 * args.width as f64 / geometry.width() as f64,
        });
    };

    limited_geometry(args.width, height, config)
}

/// Height that keeps the aspect ratio of `geometry` at `target_width`,
/// rounded exactly.
fn derived_height(geometry: ImageGeometry, target_width: u32, rounding: RoundingMode) -> Option<u32> {
    exact_dimension(
        u128::from(geometry.height()) * u128::from(target_width),
        u128::from(geometry.width()),
        rounding,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=10_000, 1u32..=10_000)
    }

    proptest! {
        /// Property: single-argument resize keeps the aspect ratio within rounding.
        ///
        /// Rounding moves the height by at most half a pixel, so the ratio
        /// moves by at most `0.5 / new_width`.
        #[test]
        fn prop_aspect_ratio_preserved(
            (width, height) in dimensions_strategy(),
            target in 1u32..=10_000,
        ) {
            let geometry = ImageGeometry::new(width, height).unwrap();
            let args = ResizeArgs { width: target, height: None };

            if let Ok(result) = resize(geometry, &args, &TransformConfig::default()) {
                prop_assert_eq!(result.width(), target);
                let epsilon = 0.5 / result.width() as f64 + 1e-9;
                prop_assert!(
                    (result.aspect_ratio() - geometry.aspect_ratio()).abs() <= epsilon,
                    "ratio {} vs {}", result.aspect_ratio(), geometry.aspect_ratio()
                );
            }
        }

        /// Property: two-argument resize ignores the current geometry.
        #[test]
        fn prop_exact_resize(
            (width, height) in dimensions_strategy(),
            (target_w, target_h) in dimensions_strategy(),
        ) {
            let geometry = ImageGeometry::new(width, height).unwrap();
            let args = ResizeArgs { width: target_w, height: Some(target_h) };
            let result = resize(geometry, &args, &TransformConfig::default()).unwrap();

            prop_assert_eq!(result, ImageGeometry::new(target_w, target_h).unwrap());
        }
    }
}
