//! Rescaling by a factor per axis.

use std::num::NonZeroU32;

use super::types::{exact_dimension, limited_geometry, to_dimension, RoundingMode, TransformError};
use crate::command::{Factor, RescaleArgs};
use crate::config::TransformConfig;
use crate::geometry::ImageGeometry;

/// Scale `geometry` once by the factors in `args`.
///
/// `new_width = round(width * sx)` and `new_height = round(height * sy)`,
/// using the configured [`RoundingMode`]. Factors are exact decimals, so a
/// product ending in `.5` is a true tie.
///
/// # Errors
///
/// Returns [`TransformError::InvalidGeometry`] if a side rounds to zero or
/// past `u32::MAX`, and [`TransformError::ExceedsLimit`] if a side is above
/// the configured maximum.
pub fn rescale(
    geometry: ImageGeometry,
    args: &RescaleArgs,
    config: &TransformConfig,
) -> Result<ImageGeometry, TransformError> {
    rescale_repeated(geometry, args, NonZeroU32::MIN, config)
}

/// Scale by `factor^count` on each axis, rounding once at the end.
///
/// The power is evaluated with exact integer arithmetic while it fits in
/// `u128`; beyond that the side is far enough from a tie that `f64` is
/// used. Either way the cost does not depend on `count`.
pub fn rescale_repeated(
    geometry: ImageGeometry,
    args: &RescaleArgs,
    count: NonZeroU32,
    config: &TransformConfig,
) -> Result<ImageGeometry, TransformError> {
    let (sx, sy) = args.factors();
    let count = count.get();

    let width = scale_side(geometry.width(), sx, count, config.rounding);
    let height = scale_side(geometry.height(), sy, count, config.rounding);
    let (Some(width), Some(height)) = (width, height) else {
        return Err(TransformError::InvalidGeometry {
            width: approximate_side(geometry.width(), sx, count),
            height: approximate_side(geometry.height(), sy, count),
        });
    };

    limited_geometry(width, height, config)
}

/// `round(side * factor^count)`, if it is a valid pixel count.
fn scale_side(side: u32, factor: Factor, count: u32, rounding: RoundingMode) -> Option<u32> {
    let exact = u128::from(factor.numerator())
        .checked_pow(count)
        .zip(u128::from(factor.denominator()).checked_pow(count))
        .and_then(|(numerator, denominator)| {
            Some((u128::from(side).checked_mul(numerator)?, denominator))
        });

    match exact {
        Some((numerator, denominator)) => exact_dimension(numerator, denominator, rounding),
        None => to_dimension(approximate_side(side, factor, count), rounding),
    }
}

fn approximate_side(side: u32, factor: Factor, count: u32) -> f64 {
    side as f64 * factor.as_f64().powf(count as f64)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=5_000, 1u32..=5_000)
    }

    /// Factors from 0.100 to 4.000 in steps of 0.001, as `numerator / 1000`.
    fn thousandths_strategy() -> impl Strategy<Value = u64> {
        100u64..=4_000
    }

    proptest! {
        /// Property: rescale(a) then rescale(b) stays close to rescale(a * b).
        ///
        /// The first rounding error is carried through `b`, so the bound is
        /// one pixel for `b <= 1` and grows with `b` above that.
        #[test]
        fn prop_composition_bounded_error(
            (width, height) in dimensions_strategy(),
            a in thousandths_strategy(),
            b in thousandths_strategy(),
        ) {
            let config = TransformConfig::default();
            let geometry = ImageGeometry::new(width, height).unwrap();
            let by = |numerator: u64, scale: u32| RescaleArgs {
                sx: Factor::new(numerator, scale).unwrap(),
                sy: None,
            };

            let two_step = rescale(geometry, &by(a, 3), &config)
                .and_then(|g| rescale(g, &by(b, 3), &config));
            let one_step = rescale(geometry, &by(a * b, 6), &config);

            if let (Ok(two), Ok(one)) = (two_step, one_step) {
                let tolerance = (0.5 * b as f64 / 1000.0 + 0.5).ceil() as i64;
                prop_assert!((two.width() as i64 - one.width() as i64).abs() <= tolerance);
                prop_assert!((two.height() as i64 - one.height() as i64).abs() <= tolerance);
            }
        }

        /// Property: exact rounding agrees with the decimal tie rule.
        #[test]
        fn prop_nearest_matches_decimal_rounding(
            side in 1u32..=10_000,
            thousandths in 1u64..=9_999,
        ) {
            let geometry = ImageGeometry::new(side, side).unwrap();
            let args = RescaleArgs { sx: Factor::new(thousandths, 3).unwrap(), sy: None };
            let expected = (u64::from(side) * thousandths + 500) / 1000;

            match rescale(geometry, &args, &TransformConfig::default()) {
                Ok(result) => prop_assert_eq!(u64::from(result.width()), expected),
                Err(err) => prop_assert!(expected == 0, "unexpected error {:?}", err),
            }
        }

        /// Property: a successful rescale always yields positive sides.
        #[test]
        fn prop_result_positive(
            (width, height) in dimensions_strategy(),
            sx in 1u64..=40_000,
            sy in 1u64..=40_000,
            repeat in 1u32..=64,
        ) {
            let geometry = ImageGeometry::new(width, height).unwrap();
            let args = RescaleArgs {
                sx: Factor::new(sx, 4).unwrap(),
                sy: Some(Factor::new(sy, 4).unwrap()),
            };
            let repeat = NonZeroU32::new(repeat).unwrap();
            match rescale_repeated(geometry, &args, repeat, &TransformConfig::default()) {
                Ok(result) => {
                    prop_assert!(result.width() >= 1);
                    prop_assert!(result.height() >= 1);
                }
                Err(err) => prop_assert!(
                    matches!(err, TransformError::InvalidGeometry { .. }),
                    "unexpected error {:?}",
                    err
                ),
            }
        }
    }
}
