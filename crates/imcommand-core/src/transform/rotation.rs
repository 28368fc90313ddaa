//! Quarter-turn rotation.
//!
//! A rotate command carries a repeat count and a direction. Both collapse
//! into the net number of clockwise quarter turns:
//!
//! ```text
//! effective = (direction * count) mod 4      direction = +1 | -1
//! ```
//!
//! Odd turn counts swap width and height, even ones leave them alone.
//! Three counter-clockwise turns and one clockwise turn are the same
//! geometry.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::geometry::ImageGeometry;
use crate::pixels::PixelDirective;

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn from_counter_clockwise(counter_clockwise: bool) -> Self {
        if counter_clockwise {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// `+1` for clockwise, `-1` for counter-clockwise.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Net clockwise quarter turns in `0..4`.
pub fn effective_turns(count: u32, direction: Direction) -> u8 {
    (direction.sign() * count as i64).rem_euclid(4) as u8
}

/// Geometry after `turns` clockwise quarter turns.
pub fn rotated_geometry(geometry: ImageGeometry, turns: u8) -> ImageGeometry {
    if turns % 2 == 1 {
        geometry.swapped()
    } else {
        geometry
    }
}

/// Rotate `count` quarter turns in `direction`.
///
/// Rotation never fails: swapping two valid sides is always valid.
pub fn rotate(
    geometry: ImageGeometry,
    count: NonZeroU32,
    direction: Direction,
) -> (ImageGeometry, PixelDirective) {
    let directive = PixelDirective::Rotate {
        turns: (count.get() % 4) as u8,
        direction,
    };
    let turns = effective_turns(count.get(), direction);
    (rotated_geometry(geometry, turns), directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(width: u32, height: u32) -> ImageGeometry {
        ImageGeometry::new(width, height).unwrap()
    }

    fn count(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_effective_turns_clockwise() {
        assert_eq!(effective_turns(1, Direction::Clockwise), 1);
        assert_eq!(effective_turns(2, Direction::Clockwise), 2);
        assert_eq!(effective_turns(4, Direction::Clockwise), 0);
        assert_eq!(effective_turns(7, Direction::Clockwise), 3);
    }

    #[test]
    fn test_effective_turns_counter_clockwise() {
        assert_eq!(effective_turns(1, Direction::CounterClockwise), 3);
        assert_eq!(effective_turns(2, Direction::CounterClockwise), 2);
        assert_eq!(effective_turns(3, Direction::CounterClockwise), 1);
        assert_eq!(effective_turns(4, Direction::CounterClockwise), 0);
    }

    #[test]
    fn test_effective_turns_large_count() {
        assert_eq!(effective_turns(u32::MAX, Direction::Clockwise), 3);
        assert_eq!(effective_turns(u32::MAX, Direction::CounterClockwise), 1);
    }

    #[test]
    fn test_single_turn_swaps() {
        let (rotated, _) = rotate(geom(300, 200), count(1), Direction::Clockwise);
        assert_eq!(rotated, geom(200, 300));
    }

    #[test]
    fn test_half_turn_keeps_dimensions() {
        let (rotated, _) = rotate(geom(300, 200), count(2), Direction::Clockwise);
        assert_eq!(rotated, geom(300, 200));
    }

    #[test]
    fn test_three_counter_clockwise_equals_one_clockwise() {
        let (ccw, _) = rotate(geom(200, 300), count(3), Direction::CounterClockwise);
        let (cw, _) = rotate(geom(200, 300), count(1), Direction::Clockwise);
        assert_eq!(ccw, cw);
        assert_eq!(ccw, geom(300, 200));
    }

    #[test]
    fn test_directive_carries_raw_turns() {
        let (_, directive) = rotate(geom(10, 20), count(3), Direction::CounterClockwise);
        assert_eq!(
            directive,
            PixelDirective::Rotate {
                turns: 3,
                direction: Direction::CounterClockwise,
            }
        );
        assert_eq!(directive.effective_turns(), 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
