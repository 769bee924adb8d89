// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Random wall polygon synthesis
//!
//! A candidate is built by Delaunay-triangulating random points in the room
//! extent, carving away some boundary triangles, and unioning the rest. Only
//! single simple contours without holes whose area falls inside the
//! requested bounds are accepted.

use crate::error::{Error, Result};
use delaunator::{triangulate, Point as DelaunayPoint, EMPTY};
use nalgebra::Point2;
use rand::seq::SliceRandom;
use rand::Rng;
use roomor_geometry::bool2d::{
    compute_signed_area, ensure_ccw, is_simple_contour, is_valid_contour,
};
use roomor_geometry::{dedupe_vertices, offset_inward, union_to_profiles};
use tracing::debug;

/// Vertices of boolean-op output closer than this are merged
pub const DEDUPE_TOLERANCE: f64 = 0.01;

/// Rectangular extent and area bounds for wall candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpec {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub area_min: f64,
    pub area_max: f64,
    pub point_count: usize,
}

impl WallSpec {
    /// Square extent `[-L/2, L/2]²`
    pub fn square(length: f64, area_min: f64, area_max: f64, point_count: usize) -> Self {
        let half = length / 2.0;
        Self {
            x_range: (-half, half),
            y_range: (-half, half),
            area_min,
            area_max,
            point_count,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.x_range.0 < self.x_range.1 && self.y_range.0 < self.y_range.1) {
            return Err(Error::invalid("wall extent ranges must be non-empty"));
        }
        if self.area_min > self.area_max {
            return Err(Error::invalid(format!(
                "wall area_min {} exceeds area_max {}",
                self.area_min, self.area_max
            )));
        }
        if self.point_count < 3 {
            return Err(Error::invalid("wall synthesis needs at least 3 points"));
        }
        Ok(())
    }
}

/// Draw wall candidates until one is accepted
///
/// Returns a counter-clockwise simple polygon, or `GenerationTimeout` after
/// `max_attempts` rejected candidates.
pub fn generate_wall_polygon<R: Rng + ?Sized>(
    spec: &WallSpec,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<Point2<f64>>> {
    spec.validate()?;

    for attempt in 1..=max_attempts {
        if let Some(polygon) = try_wall_polygon(spec, rng)? {
            debug!(attempt, vertices = polygon.len(), "Wall polygon accepted");
            return Ok(polygon);
        }
    }

    Err(Error::GenerationTimeout {
        stage: "wall",
        attempts: max_attempts,
    })
}

/// Build one wall candidate; `None` when it is rejected
pub fn try_wall_polygon<R: Rng + ?Sized>(
    spec: &WallSpec,
    rng: &mut R,
) -> Result<Option<Vec<Point2<f64>>>> {
    let points: Vec<DelaunayPoint> = (0..spec.point_count)
        .map(|_| DelaunayPoint {
            x: rng.gen_range(spec.x_range.0..spec.x_range.1),
            y: rng.gen_range(spec.y_range.0..spec.y_range.1),
        })
        .collect();

    let delaunay = triangulate(&points);
    let triangle_count = delaunay.triangles.len() / 3;
    if triangle_count == 0 {
        return Ok(None);
    }

    let mut kept = vec![true; triangle_count];
    let carve = rng.gen_range(0..=triangle_count / 3);
    for _ in 0..carve {
        let boundary: Vec<usize> = (0..triangle_count)
            .filter(|&t| {
                kept[t]
                    && (3 * t..3 * t + 3).any(|e| {
                        let twin = delaunay.halfedges[e];
                        twin == EMPTY || !kept[twin / 3]
                    })
            })
            .collect();
        match boundary.choose(rng) {
            Some(&t) => kept[t] = false,
            None => break,
        }
    }

    let contours: Vec<Vec<Point2<f64>>> = (0..triangle_count)
        .filter(|&t| kept[t])
        .map(|t| {
            (0..3)
                .map(|k| {
                    let p = &points[delaunay.triangles[3 * t + k]];
                    Point2::new(p.x, p.y)
                })
                .collect()
        })
        .collect();

    let union = union_to_profiles(&contours)?;
    let [profile] = union.as_slice() else {
        return Ok(None);
    };
    if !profile.holes.is_empty() {
        return Ok(None);
    }

    let ring = dedupe_vertices(&profile.outer, DEDUPE_TOLERANCE);
    if ring.len() < 3 || !is_simple_contour(&ring) {
        return Ok(None);
    }

    let area = compute_signed_area(&ring).abs();
    if area < spec.area_min || area > spec.area_max {
        return Ok(None);
    }

    Ok(Some(ensure_ccw(&ring)))
}

/// Inner face of a wall of `thickness` built on `polygon`
///
/// `None` when the offset vanishes or splits the room into several parts.
pub fn wall_interior(polygon: &[Point2<f64>], thickness: f64) -> Result<Option<Vec<Point2<f64>>>> {
    let pieces = offset_inward(polygon, thickness)?;
    let [piece] = pieces.as_slice() else {
        return Ok(None);
    };

    let ring = dedupe_vertices(&piece.outer, DEDUPE_TOLERANCE);
    if !is_valid_contour(&ring) {
        return Ok(None);
    }
    Ok(Some(ensure_ccw(&ring)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wall_is_simple_and_within_bounds() {
        let spec = WallSpec::square(9.0, 20.0, 60.0, 12);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..5 {
            let wall = generate_wall_polygon(&spec, 1000, &mut rng).unwrap();
            let area = compute_signed_area(&wall);
            assert!(area > 0.0, "wall must be counter-clockwise");
            assert!((20.0..=60.0).contains(&area), "area {} out of bounds", area);
            assert!(is_simple_contour(&wall));
            for p in &wall {
                assert!(p.x.abs() <= 4.5 + 1e-9 && p.y.abs() <= 4.5 + 1e-9);
            }
        }
    }

    #[test]
    fn test_unreachable_area_times_out() {
        let spec = WallSpec::square(2.0, 3.9, 4.0, 5);
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_wall_polygon(&spec, 20, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::GenerationTimeout {
                stage: "wall",
                attempts: 20
            }
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let spec = WallSpec::square(9.0, 50.0, 10.0, 12);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_wall_polygon(&spec, 10, &mut rng),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_wall_interior_of_square() {
        let square = vec![
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ];
        let interior = wall_interior(&square, 0.05).unwrap().unwrap();
        assert_eq!(interior.len(), 4);
        assert!((compute_signed_area(&interior) - 3.9 * 3.9).abs() < 1e-6);
        assert!(wall_interior(&square, 2.5).unwrap().is_none());
    }
}
