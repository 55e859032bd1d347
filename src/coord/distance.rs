//! Distance gate
//!
//! Great-circle distance on a spherical Earth, and the pre-check that keeps
//! routing requests inside the provider's supported range.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// Outcome of [`check_within_limit`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LimitCheck {
    /// Distance is at or below the limit; routing may proceed
    Within,
    /// Distance is above the limit; routing must not be attempted
    Exceeded { distance_meters: f64 },
}

impl LimitCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Within)
    }
}

/// Calculate the distance between two points in meters (Haversine formula)
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in meters. The result is symmetric and is exactly 0.0 for
/// identical points.
pub fn great_circle_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Check whether `a` and `b` are close enough to be routed
///
/// A distance equal to the limit is accepted.
pub fn check_within_limit(a: Coordinate, b: Coordinate, limit_meters: f64) -> LimitCheck {
    let distance_meters = great_circle_meters(a, b);
    if distance_meters > limit_meters {
        LimitCheck::Exceeded { distance_meters }
    } else {
        LimitCheck::Within
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::routing::DISTANCE_LIMIT_METERS;
    use approx::assert_relative_eq;

    fn lagos() -> Coordinate {
        Coordinate::new(6.5244, 3.3792)
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let distance = great_circle_meters(Coordinate::new(40.7128, -74.0060), Coordinate::new(41.7128, -74.0060));
        assert_relative_eq!(distance, 111_195.0, max_relative = 0.001);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (lagos(), Coordinate::new(6.4281, 3.4219)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(51.5074, -0.1278)),
            (Coordinate::new(89.9, 179.9), Coordinate::new(-89.9, -179.9)),
        ];

        for (a, b) in pairs {
            assert_eq!(great_circle_meters(a, b), great_circle_meters(b, a));
        }
    }

    #[test]
    fn test_same_point_is_zero() {
        for p in [lagos(), Coordinate::new(-90.0, 180.0), Coordinate::new(0.0, 0.0)] {
            assert_eq!(great_circle_meters(p, p), 0.0);
        }
    }

    #[test]
    fn test_reproducible() {
        let b = Coordinate::new(6.4281, 3.4219);
        let first = great_circle_meters(lagos(), b);
        let second = great_circle_meters(lagos(), b);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_lagos_island_within_limit() {
        let destination = Coordinate::new(6.4281, 3.4219);
        let distance = great_circle_meters(lagos(), destination);
        assert!((9_000.0..13_000.0).contains(&distance), "distance was {}", distance);

        assert_eq!(
            check_within_limit(lagos(), destination, DISTANCE_LIMIT_METERS),
            LimitCheck::Within
        );
    }

    #[test]
    fn test_abuja_exceeds_limit() {
        let abuja = Coordinate::new(9.0765, 7.3986);
        match check_within_limit(lagos(), abuja, DISTANCE_LIMIT_METERS) {
            LimitCheck::Exceeded { distance_meters } => {
                assert!(distance_meters > DISTANCE_LIMIT_METERS);
            }
            LimitCheck::Within => panic!("Lagos to Abuja should exceed the limit"),
        }
    }

    #[test]
    fn test_limit_is_inclusive() {
        let b = Coordinate::new(6.4281, 3.4219);
        let exact = great_circle_meters(lagos(), b);
        assert!(check_within_limit(lagos(), b, exact).is_ok());
        assert!(!check_within_limit(lagos(), b, exact - 1.0).is_ok());
    }
}
