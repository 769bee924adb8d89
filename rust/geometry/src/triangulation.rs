// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform point sampling inside polygon regions
//!
//! Regions are earcut-triangulated once; each draw picks a triangle with
//! probability proportional to its area and a uniform point inside it.

use crate::bool2d::compute_signed_area;
use crate::error::{Error, Result};
use crate::profile::Profile2D;
use nalgebra::Point2;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Area-weighted sampler over one or more polygons-with-holes
#[derive(Debug, Clone)]
pub struct RegionSampler {
    triangles: Vec<[Point2<f64>; 3]>,
    picker: WeightedIndex<f64>,
    area: f64,
}

impl RegionSampler {
    /// Triangulate every profile and prepare area weights
    pub fn new(region: &[Profile2D]) -> Result<Self> {
        let mut triangles = Vec::new();
        let mut weights = Vec::new();

        for profile in region {
            let tri = profile.triangulate()?;
            for t in tri.triangles() {
                let area = compute_signed_area(&t).abs();
                if area > 0.0 {
                    triangles.push(t);
                    weights.push(area);
                }
            }
        }

        let area = weights.iter().sum();
        let picker = WeightedIndex::new(&weights).map_err(|e| {
            Error::EmptySampleSpace(format!("Region has no sampleable area: {}", e))
        })?;

        Ok(Self {
            triangles,
            picker,
            area,
        })
    }

    /// Total triangulated area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Draw one point uniformly from the region
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2<f64> {
        let [a, b, c] = self.triangles[self.picker.sample(rng)];

        let mut r1: f64 = rng.gen();
        let mut r2: f64 = rng.gen();
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        a + (b - a) * r1 + (c - a) * r2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ring(x0: f64, y0: f64, side: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + side, y0),
            Point2::new(x0 + side, y0 + side),
            Point2::new(x0, y0 + side),
        ]
    }

    #[test]
    fn test_samples_stay_inside_region() {
        let region = vec![Profile2D::with_holes(
            ring(0.0, 0.0, 4.0),
            vec![ring(1.0, 1.0, 2.0)],
        )];
        let sampler = RegionSampler::new(&region).unwrap();
        assert_relative_eq!(sampler.area(), 12.0, epsilon = 1e-9);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let p = sampler.sample(&mut rng);
            assert!(p.x >= 0.0 && p.x <= 4.0 && p.y >= 0.0 && p.y <= 4.0);
            assert!(!(p.x > 1.0 && p.x < 3.0 && p.y > 1.0 && p.y < 3.0));
        }
    }

    #[test]
    fn test_samples_split_by_area() {
        // 1x1 and 3x3 squares: about 10% of samples in the small one
        let region = vec![
            Profile2D::new(ring(0.0, 0.0, 1.0)),
            Profile2D::new(ring(10.0, 0.0, 3.0)),
        ];
        let sampler = RegionSampler::new(&region).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let small = (0..10_000)
            .filter(|_| sampler.sample(&mut rng).x < 5.0)
            .count();
        assert!((800..1200).contains(&small), "small square got {}", small);
    }

    #[test]
    fn test_empty_region_fails() {
        assert!(RegionSampler::new(&[]).is_err());
    }
}
