// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convex hulls in 2D and 3D
//!
//! The 2D hull is Andrew's monotone chain. The 3D hull enumerates supporting
//! planes over point triples, which is exact and plenty fast for the small
//! clouds produced by extruding a zone outline (tens of points).

use crate::error::{Error, Result};
use crate::mesh::SurfaceMesh;
use nalgebra::{Point2, Point3, Vector3};
use std::cmp::Ordering;

/// Points closer than this are merged before hull construction
const HULL_MERGE_EPSILON: f64 = 1e-12;

/// Relative tolerance for plane-side tests in the 3D hull
const PLANE_EPSILON: f64 = 1e-9;

/// Convex hull of a 2D point set, counter-clockwise, collinear points dropped
pub fn convex_hull_2d(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    convex_hull_indices(points)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Indices of the convex hull vertices, counter-clockwise
///
/// Fewer than three distinct points come back as-is (deduplicated).
pub fn convex_hull_indices(points: &[Point2<f64>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        match points[a].x.partial_cmp(&points[b].x).unwrap_or(Ordering::Equal) {
            Ordering::Equal => points[a].y.partial_cmp(&points[b].y).unwrap_or(Ordering::Equal),
            o => o,
        }
    });
    order.dedup_by(|a, b| (points[*a] - points[*b]).norm() < HULL_MERGE_EPSILON);

    if order.len() < 3 {
        return order;
    }

    let mut lower: Vec<usize> = Vec::with_capacity(order.len());
    for &i in &order {
        while lower.len() >= 2
            && cross(&points[lower[lower.len() - 2]], &points[lower[lower.len() - 1]], &points[i])
                <= 0.0
        {
            lower.pop();
        }
        lower.push(i);
    }

    let mut upper: Vec<usize> = Vec::with_capacity(order.len());
    for &i in order.iter().rev() {
        while upper.len() >= 2
            && cross(&points[upper[upper.len() - 2]], &points[upper[upper.len() - 1]], &points[i])
                <= 0.0
        {
            upper.pop();
        }
        upper.push(i);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Convex hull of a 3D point cloud as a closed triangle mesh
///
/// Facets are planar polygons (cap faces of a prism stay single facets),
/// fan-triangulated with outward-facing winding.
pub fn convex_hull_3d(points: &[Point3<f64>]) -> Result<SurfaceMesh> {
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !vertices.iter().any(|v| (v - p).norm() < HULL_MERGE_EPSILON) {
            vertices.push(*p);
        }
    }

    if vertices.len() < 4 {
        return Err(Error::DegenerateGeometry(format!(
            "3D hull needs at least 4 distinct points, got {}",
            vertices.len()
        )));
    }

    let extent = cloud_extent(&vertices);
    let eps = PLANE_EPSILON * extent.max(1.0);

    let mut planes: Vec<(Vector3<f64>, f64)> = Vec::new();
    let n = vertices.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let normal = (vertices[j] - vertices[i]).cross(&(vertices[k] - vertices[i]));
                let len = normal.norm();
                if len < eps * extent.max(1.0) {
                    continue;
                }
                let normal = normal / len;
                let offset = normal.dot(&vertices[i].coords);

                let mut above = false;
                let mut below = false;
                for v in &vertices {
                    let side = normal.dot(&v.coords) - offset;
                    if side > eps {
                        above = true;
                    } else if side < -eps {
                        below = true;
                    }
                    if above && below {
                        break;
                    }
                }

                let (normal, offset) = match (above, below) {
                    (false, _) => (normal, offset),
                    (true, false) => (-normal, -offset),
                    (true, true) => continue,
                };

                let known = planes
                    .iter()
                    .any(|(n2, o2)| n2.dot(&normal) > 1.0 - PLANE_EPSILON && (o2 - offset).abs() < eps);
                if !known {
                    planes.push((normal, offset));
                }
            }
        }
    }

    if planes.len() < 4 {
        return Err(Error::DegenerateGeometry(
            "3D hull point cloud is coplanar".to_string(),
        ));
    }

    let mut mesh = SurfaceMesh::with_vertices(vertices);
    for (normal, offset) in planes {
        let members: Vec<usize> = (0..mesh.vertices.len())
            .filter(|&v| (normal.dot(&mesh.vertices[v].coords) - offset).abs() <= eps)
            .collect();

        // In-plane basis (u, v) with u x v = normal, so CCW in (u, v) faces outward
        let u = any_perpendicular(&normal);
        let v = normal.cross(&u);
        let projected: Vec<Point2<f64>> = members
            .iter()
            .map(|&m| {
                let p = mesh.vertices[m].coords;
                Point2::new(p.dot(&u), p.dot(&v))
            })
            .collect();

        let ring: Vec<usize> = convex_hull_indices(&projected)
            .into_iter()
            .map(|local| members[local])
            .collect();
        if ring.len() < 3 {
            continue;
        }
        for w in 1..ring.len() - 1 {
            mesh.add_triangle(ring[0], ring[w], ring[w + 1]);
        }
    }

    Ok(mesh)
}

#[inline]
fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn cloud_extent(points: &[Point3<f64>]) -> f64 {
    let mut min = points[0];
    let mut max = points[0];
    for p in points.iter().skip(1) {
        min = min.inf(p);
        max = max.sup(p);
    }
    (max - min).norm()
}

fn any_perpendicular(normal: &Vector3<f64>) -> Vector3<f64> {
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normal.cross(&helper).normalize()
}
