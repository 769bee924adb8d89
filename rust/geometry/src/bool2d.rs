// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Footprints and Room Boundaries
//!
//! This module wraps the i_overlay crate for the polygon operations the layout
//! pipeline needs: unions of obstacle footprints, the union of carved wall
//! triangles and the inward offset (erosion) that turns a wall boundary into its
//! interior (and an interior into the region obstacles may be placed in).
//!
//! i_overlay output orientation is never trusted: every ring is re-oriented
//! here, outer rings counter-clockwise and holes clockwise.

use crate::error::{Error, Result};
use crate::profile::Profile2D;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::{Point2, Vector2};

/// Epsilon for floating point comparisons in 2D operations
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Segments of the polygon standing in for the disk around each vertex
const VERTEX_DISK_SEGMENTS: usize = 16;

/// Union multiple contours into a set of polygons-with-holes
///
/// Every input contour is treated as a filled region regardless of its
/// winding. Disjoint inputs come back as separate profiles.
pub fn union_to_profiles(contours: &[Vec<Point2<f64>>]) -> Result<Vec<Profile2D>> {
    let valid: Vec<&Vec<Point2<f64>>> = contours.iter().filter(|c| c.len() >= 3).collect();

    if valid.is_empty() {
        return Ok(Vec::new());
    }

    // Same winding everywhere so NonZero fills overlaps instead of cancelling them
    let subject: Vec<Vec<[f64; 2]>> = vec![contour_to_path(&ensure_ccw(valid[0]))];
    let clip: Vec<Vec<[f64; 2]>> = valid
        .iter()
        .skip(1)
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    Ok(shapes_to_profiles(&result))
}

/// Union multiple contours and return only the outer boundaries
///
/// Useful for turning overlapping footprints into hole rings.
pub fn union_contours(contours: &[Vec<Point2<f64>>]) -> Result<Vec<Vec<Point2<f64>>>> {
    Ok(union_to_profiles(contours)?
        .into_iter()
        .map(|p| p.outer)
        .collect())
}

/// Inward offset (erosion) of a simple polygon
///
/// The polygon minus everything within `distance` of its boundary: one band
/// of half-width `distance` per edge and one circumscribed disk per vertex
/// are unioned and subtracted from the ring in a single overlay. Every
/// returned point lies inside `contour` and at least `distance` from its
/// boundary. Narrow necks split the result into several pieces.
///
/// Returns an empty vector when the polygon vanishes under the offset.
pub fn offset_inward(contour: &[Point2<f64>], distance: f64) -> Result<Vec<Profile2D>> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(Error::InvalidPolygon(format!(
            "Offset distance must be finite and non-negative, got {}",
            distance
        )));
    }

    let ring = simplify_contour(&ensure_ccw(contour), EPSILON_2D);
    if !is_valid_contour(&ring) {
        return Err(Error::DegenerateGeometry(
            "Cannot offset a polygon without area".to_string(),
        ));
    }

    if distance == 0.0 {
        return Ok(vec![Profile2D::new(ring)]);
    }

    let subject = vec![contour_to_path(&ring)];
    let clip = boundary_band(&ring, distance);
    let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);

    Ok(shapes_to_profiles(&result)
        .into_iter()
        .filter(|p| p.area() > MIN_AREA_THRESHOLD)
        .collect())
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Check if a contour is a simple polygon: no repeated vertices and no two
/// non-adjacent edges touching.
pub fn is_simple_contour(contour: &[Point2<f64>]) -> bool {
    let n = contour.len();
    if n < 3 || !is_valid_contour(contour) {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if (contour[i] - contour[j]).norm() < EPSILON_2D {
                return false;
            }
        }
    }

    for i in 0..n {
        let a0 = contour[i];
        let a1 = contour[(i + 1) % n];
        for j in (i + 1)..n {
            // Adjacent edges share a vertex by construction
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let b0 = contour[j];
            let b1 = contour[(j + 1) % n];
            if segments_intersect(&a0, &a1, &b0, &b1) {
                return false;
            }
        }
    }

    true
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Simplify a contour by removing collinear points
pub fn simplify_contour(contour: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    if contour.len() <= 3 {
        return contour.to_vec();
    }

    let mut result = Vec::with_capacity(contour.len());
    let n = contour.len();

    for i in 0..n {
        let prev = &contour[(i + n - 1) % n];
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];

        let cross = (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);

        if cross.abs() > epsilon {
            result.push(*curr);
        }
    }

    if result.len() < 3 {
        return contour.to_vec();
    }

    result
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Shortest distance from a point to the boundary of a closed contour
pub fn distance_to_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> f64 {
    let n = contour.len();
    if n == 0 {
        return f64::INFINITY;
    }

    (0..n)
        .map(|i| distance_to_segment(point, &contour[i], &contour[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Paths covering every point within `distance` of the ring boundary
///
/// All paths are counter-clockwise so NonZero fills their overlaps.
fn boundary_band(ring: &[Point2<f64>], distance: f64) -> Vec<Vec<[f64; 2]>> {
    let n = ring.len();
    let mut band = Vec::with_capacity(2 * n);

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let d = b - a;
        if d.norm() < EPSILON_2D {
            continue;
        }
        let normal = Vector2::new(-d.y, d.x).normalize() * distance;
        band.push(contour_to_path(&[a - normal, b - normal, b + normal, a + normal]));
    }

    // Polygon vertices sit on radius r / cos(pi / k) so the polygon contains the disk
    let radius = distance / (std::f64::consts::PI / VERTEX_DISK_SEGMENTS as f64).cos();
    for v in ring {
        let disk: Vec<[f64; 2]> = (0..VERTEX_DISK_SEGMENTS)
            .map(|k| {
                let angle = 2.0 * std::f64::consts::PI * k as f64 / VERTEX_DISK_SEGMENTS as f64;
                [v.x + radius * angle.cos(), v.y + radius * angle.sin()]
            })
            .collect();
        band.push(disk);
    }

    band
}

fn distance_to_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < EPSILON_2D * EPSILON_2D {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON_2D
        && p.x <= a.x.max(b.x) + EPSILON_2D
        && p.y >= a.y.min(b.y) - EPSILON_2D
        && p.y <= a.y.max(b.y) + EPSILON_2D
}

fn segments_intersect(
    a0: &Point2<f64>,
    a1: &Point2<f64>,
    b0: &Point2<f64>,
    b1: &Point2<f64>,
) -> bool {
    let d1 = orientation(b0, b1, a0);
    let d2 = orientation(b0, b1, a1);
    let d3 = orientation(a0, a1, b0);
    let d4 = orientation(a0, a1, b1);

    if ((d1 > EPSILON_2D && d2 < -EPSILON_2D) || (d1 < -EPSILON_2D && d2 > EPSILON_2D))
        && ((d3 > EPSILON_2D && d4 < -EPSILON_2D) || (d3 < -EPSILON_2D && d4 > EPSILON_2D))
    {
        return true;
    }

    (d1.abs() <= EPSILON_2D && on_segment(b0, b1, a0))
        || (d2.abs() <= EPSILON_2D && on_segment(b0, b1, a1))
        || (d3.abs() <= EPSILON_2D && on_segment(a0, a1, b0))
        || (d4.abs() <= EPSILON_2D && on_segment(a0, a1, b1))
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes to profiles
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_profiles(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Profile2D> {
    let mut profiles = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some(outer_path) = shape.first() else {
            continue;
        };
        let outer = path_to_contour(outer_path);
        if !is_valid_contour(&outer) {
            continue;
        }

        let holes = shape
            .iter()
            .skip(1)
            .map(|c| path_to_contour(c))
            .filter(|h| is_valid_contour(h))
            .map(|h| ensure_cw(&h))
            .collect();

        profiles.push(Profile2D::with_holes(ensure_ccw(&outer), holes));
    }

    profiles
}
