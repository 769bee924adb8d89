// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Obstacle placement inside the wall interior

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector3};
use rand::Rng;
use roomor_geometry::{offset_inward, square_footprint, Profile2D, RegionSampler};
use std::f64::consts::TAU;

/// A cube obstacle resting on the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Centre of the cube; z is half the height
    pub position: Point3<f64>,
    /// Rotation about the vertical axis in radians, `[0, 2π)`
    pub yaw: f64,
    pub size: Vector3<f64>,
}

impl Obstacle {
    pub fn new(center: Point2<f64>, yaw: f64, size: f64) -> Self {
        Self {
            position: Point3::new(center.x, center.y, size / 2.0),
            yaw,
            size: Vector3::repeat(size),
        }
    }

    /// Floor position
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        self.position.xy()
    }

    /// Rotated square footprint on the floor
    pub fn footprint(&self) -> [Point2<f64>; 4] {
        square_footprint(&self.center(), self.size.x / 2.0, self.yaw)
    }
}

/// Shrink the free area so any obstacle centred inside keeps `margin` clearance
///
/// An empty result means no obstacle fits.
pub fn placement_region(
    free_area: &[Point2<f64>],
    size: f64,
    margin: f64,
) -> Result<Vec<Profile2D>> {
    Ok(offset_inward(free_area, margin + size)?)
}

/// Draw `count` obstacles uniformly from an already shrunk region
pub fn sample_obstacles<R: Rng + ?Sized>(
    region: &[Profile2D],
    count: usize,
    size: f64,
    rng: &mut R,
) -> Result<Vec<Obstacle>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let sampler = RegionSampler::new(region)?;
    Ok((0..count)
        .map(|_| {
            let center = sampler.sample(rng);
            Obstacle::new(center, rng.gen_range(0.0..TAU), size)
        })
        .collect())
}

/// Place `count` obstacles inside `free_area` with `margin` clearance
pub fn place_obstacles<R: Rng + ?Sized>(
    free_area: &[Point2<f64>],
    count: usize,
    size: f64,
    margin: f64,
    rng: &mut R,
) -> Result<Vec<Obstacle>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let region = placement_region(free_area, size, margin)?;
    if region.is_empty() {
        return Err(Error::invalid(format!(
            "no usable free area after shrinking by margin {} + size {}",
            margin, size
        )));
    }

    sample_obstacles(&region, count, size, rng)
}
