// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle surface meshes and surface point sampling

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Oversampling factor for even surface sampling
const EVEN_OVERSAMPLE: usize = 5;

/// Closed triangle surface in f64 (hull solids are small, precision matters)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex positions
    pub vertices: Vec<Point3<f64>>,
    /// Triangle vertex indices, outward-facing counter-clockwise winding
    pub triangles: Vec<[usize; 3]>,
}

/// A point drawn from a mesh surface together with the triangle it lies on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub point: Point3<f64>,
    pub triangle: usize,
}

impl SurfaceMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh over existing vertices with no triangles yet
    pub fn with_vertices(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            triangles: Vec::new(),
        }
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize) {
        self.triangles.push([i0, i1, i2]);
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions of one triangle
    #[inline]
    pub fn triangle(&self, index: usize) -> [Point3<f64>; 3] {
        self.triangles[index].map(|i| self.vertices[i])
    }

    /// Unit normal of one triangle (zero for degenerate triangles)
    pub fn triangle_normal(&self, index: usize) -> Vector3<f64> {
        let [a, b, c] = self.triangle(index);
        (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    pub fn triangle_area(&self, index: usize) -> f64 {
        let [a, b, c] = self.triangle(index);
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        (0..self.triangle_count()).map(|t| self.triangle_area(t)).sum()
    }

    /// Whether all three corners share one height (a cap face)
    pub fn is_horizontal(&self, index: usize) -> bool {
        let [a, b, c] = self.triangle(index);
        a.z == b.z && b.z == c.z
    }

    /// Get bounding box (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let Some(first) = self.vertices.first() else {
            return (Point3::origin(), Point3::origin());
        };
        self.vertices
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)))
    }

    /// Draw `count` points uniformly over the surface (area-weighted)
    ///
    /// Points drawn from a horizontal triangle carry that triangle's exact
    /// height, so cap points can be recognised by exact comparison.
    pub fn sample_surface<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SurfaceSample>> {
        let areas: Vec<f64> = (0..self.triangle_count())
            .map(|t| self.triangle_area(t))
            .collect();
        let picker = WeightedIndex::new(&areas).map_err(|e| {
            Error::EmptySampleSpace(format!("Mesh has no sampleable area: {}", e))
        })?;

        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let triangle = picker.sample(rng);
            let [a, b, c] = self.triangle(triangle);

            let mut r1: f64 = rng.gen();
            let mut r2: f64 = rng.gen();
            if r1 + r2 > 1.0 {
                r1 = 1.0 - r1;
                r2 = 1.0 - r2;
            }
            let mut point = a + (b - a) * r1 + (c - a) * r2;
            if self.is_horizontal(triangle) {
                point.z = a.z;
            }
            samples.push(SurfaceSample { point, triangle });
        }

        Ok(samples)
    }

    /// Draw up to `count` surface points that are roughly evenly spaced
    ///
    /// Oversamples, then greedily keeps points at least
    /// `sqrt(area / (3 * count))` apart. May return fewer than `count`.
    pub fn sample_surface_even<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SurfaceSample>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let radius = (self.area() / (3.0 * count as f64)).sqrt();
        let candidates = self.sample_surface(count * EVEN_OVERSAMPLE, rng)?;

        let mut kept: Vec<SurfaceSample> = Vec::with_capacity(count);
        for candidate in candidates {
            if kept.len() == count {
                break;
            }
            if kept
                .iter()
                .all(|k| (k.point - candidate.point).norm() >= radius)
            {
                kept.push(candidate);
            }
        }

        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extrusion::{extrude_vertically, lift_to_3d};
    use crate::hull::convex_hull_3d;
    use nalgebra::Point2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_prism(height: f64) -> SurfaceMesh {
        let base = lift_to_3d(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            0.0,
        );
        convex_hull_3d(&extrude_vertically(&base, height)).unwrap()
    }

    #[test]
    fn test_bounds() {
        let (min, max) = unit_prism(0.7).bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.7));
    }

    #[test]
    fn test_samples_lie_on_surface() {
        let mesh = unit_prism(0.7);
        let mut rng = StdRng::seed_from_u64(7);
        for s in mesh.sample_surface(500, &mut rng).unwrap() {
            let p = s.point;
            let on_side = p.x.abs() < 1e-9
                || (p.x - 1.0).abs() < 1e-9
                || p.y.abs() < 1e-9
                || (p.y - 1.0).abs() < 1e-9;
            let on_cap = p.z == 0.0 || p.z == 0.7;
            assert!(on_side || on_cap, "point {:?} off the surface", p);
        }
    }

    #[test]
    fn test_cap_samples_have_exact_height() {
        let mesh = unit_prism(0.7);
        let mut rng = StdRng::seed_from_u64(11);
        for s in mesh.sample_surface(500, &mut rng).unwrap() {
            if mesh.is_horizontal(s.triangle) {
                assert!(s.point.z == 0.0 || s.point.z == 0.7);
            }
        }
    }

    #[test]
    fn test_even_sampling_respects_spacing() {
        let mesh = unit_prism(0.7);
        let mut rng = StdRng::seed_from_u64(3);
        let samples = mesh.sample_surface_even(100, &mut rng).unwrap();
        assert!(!samples.is_empty());
        assert!(samples.len() <= 100);

        let radius = (mesh.area() / 300.0).sqrt();
        for (i, a) in samples.iter().enumerate() {
            for b in samples.iter().skip(i + 1) {
                assert!((a.point - b.point).norm() >= radius);
            }
        }
    }

    #[test]
    fn test_sampling_empty_mesh_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SurfaceMesh::new().sample_surface(10, &mut rng).is_err());
    }
}
