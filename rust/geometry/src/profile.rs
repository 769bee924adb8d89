// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon-with-holes and triangulation

use crate::bool2d::{compute_signed_area, point_in_contour};
use crate::error::{Error, Result};
use crate::transform::transform_contour;
use nalgebra::{Matrix3, Point2};

/// 2D Profile with optional holes
///
/// Used for wall interiors, zone footprints and free-space polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a profile with holes
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self { outer, holes }
    }

    /// Net area: outer area minus hole areas
    pub fn area(&self) -> f64 {
        let outer = compute_signed_area(&self.outer).abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        outer - holes
    }

    /// Point containment: inside the outer ring and outside every hole.
    ///
    /// Overlapping holes still count as excluded once, which is what an
    /// occupancy consumer expects.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point_in_contour(point, &self.outer)
            && !self.holes.iter().any(|h| point_in_contour(point, h))
    }

    /// Apply a 2D homogeneous transform to every ring
    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            outer: transform_contour(matrix, &self.outer),
            holes: self
                .holes
                .iter()
                .map(|h| transform_contour(matrix, h))
                .collect(),
        }
    }

    /// Triangulate the profile using earcutr
    /// Returns triangle indices into the flattened vertex array
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidPolygon(
                "Profile must have at least 3 vertices".to_string(),
            ));
        }

        // Flatten vertices for earcutr
        let mut vertices = Vec::with_capacity(
            (self.outer.len() + self.holes.iter().map(|h| h.len()).sum::<usize>()) * 2,
        );

        for p in &self.outer {
            vertices.push(p.x);
            vertices.push(p.y);
        }

        let mut hole_indices = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            hole_indices.push(vertices.len() / 2);
            for p in hole {
                vertices.push(p.x);
                vertices.push(p.y);
            }
        }

        let indices = earcutr::earcut(&vertices, &hole_indices, 2)
            .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

        let points = vertices
            .chunks_exact(2)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();

        Ok(Triangulation { points, indices })
    }
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// All vertices (outer + holes)
    pub points: Vec<Point2<f64>>,
    /// Triangle indices
    pub indices: Vec<usize>,
}

impl Triangulation {
    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point2<f64>; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.points[t[0]], self.points[t[1]], self.points[t[2]]])
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
