// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target and key placement on zone hull surfaces
//!
//! Placements sit next to a zone: candidates are drawn evenly over the hull
//! solid and those on the top or bottom cap are discarded. The chosen point
//! is dropped to the floor.

use crate::config::Placeable;
use crate::error::{Error, Result};
use crate::zone::Zone;
use nalgebra::Point3;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Position and heading of a placed entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f64>,
    /// Rotation about the vertical axis in radians
    pub yaw: f64,
}

/// Samples one pose per zone from the zone hull solids
#[derive(Debug, Clone, Copy)]
pub struct ZoneSampler {
    /// Height of the hull solids; points at z = 0 or this height are caps
    pub cap_height: f64,
    /// Initial even-sampling budget per zone
    pub surface_samples: usize,
    /// Budget doublings before giving up on a zone
    pub max_attempts: usize,
}

impl ZoneSampler {
    pub fn new(cap_height: f64, surface_samples: usize, max_attempts: usize) -> Self {
        Self {
            cap_height,
            surface_samples,
            max_attempts,
        }
    }

    /// Pick one side-face point of `zone` and rest an entity of `size` there
    pub fn sample_zone<R: Rng + ?Sized>(
        &self,
        zone: &Zone,
        zone_index: usize,
        size: f64,
        rng: &mut R,
    ) -> Result<Pose> {
        let mut budget = self.surface_samples.max(1);

        for attempt in 1..=self.max_attempts {
            let candidates: Vec<Point3<f64>> = zone
                .hull_solid
                .sample_surface_even(budget, rng)?
                .into_iter()
                .map(|s| s.point)
                .filter(|p| p.z != 0.0 && p.z != self.cap_height)
                .collect();

            if let Some(point) = candidates.choose(rng) {
                return Ok(Pose {
                    position: Point3::new(point.x, point.y, size / 2.0),
                    yaw: 0.0,
                });
            }

            debug!(zone = zone_index, attempt, budget, "No side-face candidates, resampling");
            budget = budget.saturating_mul(2);
        }

        Err(Error::SamplingExhausted {
            zone: zone_index,
            attempts: self.max_attempts,
        })
    }

    /// One independent pose per zone for `placeable`
    pub fn place<R: Rng + ?Sized>(
        &self,
        zones: &[Zone],
        placeable: &Placeable,
        rng: &mut R,
    ) -> Result<Vec<Pose>> {
        zones
            .iter()
            .enumerate()
            .map(|(i, zone)| self.sample_zone(zone, i, placeable.size, rng))
            .collect()
    }
}
