// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotated square footprints and vertex clean-up

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

/// Decimal precision vertices are rounded to before deduplication
const DEDUPE_DECIMALS: i32 = 3;

/// Corner sign pattern; order is fixed so every footprint winds the same way
const CORNER_SIGNS: [(f64, f64); 4] = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)];

/// The 4 corners of a square of half-width `half_extent` centred at `center`
/// and rotated by `yaw` about the vertical axis.
///
/// Corners come back in the same (clockwise) order for every call.
pub fn square_footprint(center: &Point2<f64>, half_extent: f64, yaw: f64) -> [Point2<f64>; 4] {
    let (sin, cos) = yaw.sin_cos();
    CORNER_SIGNS.map(|(sx, sy)| {
        let local = Vector2::new(sx * half_extent, sy * half_extent);
        center + Vector2::new(cos * local.x - sin * local.y, sin * local.x + cos * local.y)
    })
}

/// Remove vertices closer than `tolerance` to an earlier kept vertex
///
/// Coordinates are rounded to 3 decimals first. Each vertex that has not been
/// banned yet bans every other vertex within `tolerance` of it; banned
/// vertices never ban anything themselves. Survivors keep their order and
/// come back rounded.
pub fn dedupe_vertices(ring: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    let scale = 10f64.powi(DEDUPE_DECIMALS);
    let rounded: Vec<Point2<f64>> = ring
        .iter()
        .map(|p| Point2::new((p.x * scale).round() / scale, (p.y * scale).round() / scale))
        .collect();

    let mut banned: SmallVec<[bool; 32]> = SmallVec::from_elem(false, rounded.len());
    for i in 0..rounded.len() {
        if banned[i] {
            continue;
        }
        for j in 0..rounded.len() {
            if j != i && (rounded[j] - rounded[i]).norm() < tolerance {
                banned[j] = true;
            }
        }
    }

    rounded
        .into_iter()
        .zip(banned)
        .filter_map(|(p, ban)| (!ban).then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool2d::compute_signed_area;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_square_footprint_axis_aligned() {
        let corners = square_footprint(&Point2::new(1.0, 2.0), 0.5, 0.0);
        assert_eq!(corners[0], Point2::new(1.5, 2.5));
        assert_eq!(corners[1], Point2::new(1.5, 1.5));
        assert_eq!(corners[2], Point2::new(0.5, 1.5));
        assert_eq!(corners[3], Point2::new(0.5, 2.5));
    }

    #[test]
    fn test_square_footprint_rotated_keeps_area_and_winding() {
        let a = square_footprint(&Point2::origin(), 0.35, 0.3);
        let b = square_footprint(&Point2::origin(), 0.35, 2.1);
        assert_relative_eq!(compute_signed_area(&a), -0.49, epsilon = 1e-12);
        assert_relative_eq!(compute_signed_area(&b), -0.49, epsilon = 1e-12);
    }

    #[test]
    fn test_square_footprint_diagonal_yaw() {
        let corners = square_footprint(&Point2::origin(), 1.0, FRAC_PI_4);
        // (1, 1) rotated by 45 degrees lands on the +y axis
        assert_relative_eq!(corners[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(corners[0].y, 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_dedupe_removes_near_duplicates() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0004, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.005, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let cleaned = dedupe_vertices(&ring, 0.01);
        assert_eq!(
            cleaned,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_dedupe_banned_vertex_is_not_a_seed() {
        // b is banned by a; c is 0.008 from b but 0.016 from a, so c survives
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.008, 0.0),
            Point2::new(0.016, 0.0),
        ];
        let cleaned = dedupe_vertices(&ring, 0.01);
        assert_eq!(cleaned, vec![Point2::new(0.0, 0.0), Point2::new(0.016, 0.0)]);
    }
}
