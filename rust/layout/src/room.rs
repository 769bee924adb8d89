// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room generation pipeline
//!
//! Wall synthesis, obstacle placement, clustering, zone building and
//! target/key sampling run in that order inside one `generate()` call. A
//! layout is only returned once every stage succeeded.

use crate::cluster::cluster;
use crate::config::{EntityKind, RoomConfig};
use crate::error::{Error, Result};
use crate::free_space::{free_space_polygon, free_zone_polygon};
use crate::obstacle::{placement_region, sample_obstacles, Obstacle};
use crate::sampler::{Pose, ZoneSampler};
use crate::wall::{try_wall_polygon, wall_interior, WallSpec};
use crate::zone::{build_zones, Zone};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use roomor_geometry::Profile2D;
use std::time::Instant;
use tracing::{debug, info};

/// Poses of one placeable kind, one per zone
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: EntityKind,
    /// Cube edge length
    pub size: f64,
    pub poses: Vec<Pose>,
}

/// A generated room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    /// Synthesized outer wall boundary, counter-clockwise
    pub wall_polygon: Vec<Point2<f64>>,
    /// Inner face of the wall, counter-clockwise
    pub wall_interior: Vec<Point2<f64>>,
    pub obstacles: Vec<Obstacle>,
    pub zones: Vec<Zone>,
    /// Target (and key) poses, in config order
    pub placements: Vec<Placement>,
    /// Wall interior with zone footprints as holes
    pub free_space_polygon: Profile2D,
}

impl RoomLayout {
    /// Poses of a placeable kind, if it was generated
    pub fn poses(&self, kind: EntityKind) -> Option<&[Pose]> {
        self.placement(kind).map(|p| p.poses.as_slice())
    }

    pub fn placement(&self, kind: EntityKind) -> Option<&Placement> {
        self.placements.iter().find(|p| p.kind == kind)
    }

    pub fn targets(&self) -> &[Pose] {
        self.poses(EntityKind::Target).unwrap_or(&[])
    }

    pub fn keys(&self) -> Option<&[Pose]> {
        self.poses(EntityKind::Key)
    }

    /// Zone index of every obstacle
    pub fn obstacle_labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.obstacles.len()];
        for (z, zone) in self.zones.iter().enumerate() {
            for &m in &zone.member_indices {
                labels[m] = z;
            }
        }
        labels
    }

    /// Wall interior with the union of raw obstacle footprints as holes
    pub fn free_zone_polygon(&self) -> Result<Profile2D> {
        free_zone_polygon(&self.wall_interior, &self.obstacles)
    }
}

/// Seeded room generator
///
/// Each call to [`generate`](Self::generate) draws a new room from the same
/// parameter set; with a fixed seed the sequence of rooms is reproducible.
pub struct RoomGenerator {
    config: RoomConfig,
    rng: StdRng,
}

impl RoomGenerator {
    /// Validate `config` and seed the generator
    pub fn new(config: RoomConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Generate a complete room
    pub fn generate(&mut self) -> Result<RoomLayout> {
        let start = Instant::now();
        let (wall_polygon, wall_interior, region) = self.synthesize_shell()?;

        let config = &self.config;
        let obstacles = sample_obstacles(
            &region,
            config.obstacle_count,
            config.obstacle_size,
            &mut self.rng,
        )?;

        let centers: Vec<Point2<f64>> = obstacles.iter().map(Obstacle::center).collect();
        let labels = cluster(&centers, config.effective_cluster_threshold());
        let zones = build_zones(&obstacles, &labels, config.obstacle_size)?;
        debug!(obstacles = obstacles.len(), zones = zones.len(), "Zones built");

        let sampler = self.zone_sampler();
        let mut placements = Vec::with_capacity(config.placeables.len());
        for placeable in &config.placeables {
            placements.push(Placement {
                kind: placeable.kind,
                size: placeable.size,
                poses: sampler.place(&zones, placeable, &mut self.rng)?,
            });
        }

        let free_space_polygon = free_space_polygon(&wall_interior, &zones);

        info!(
            wall_vertices = wall_polygon.len(),
            obstacles = obstacles.len(),
            zones = zones.len(),
            free_area = free_space_polygon.area(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Room generated"
        );

        Ok(RoomLayout {
            wall_polygon,
            wall_interior,
            obstacles,
            zones,
            placements,
            free_space_polygon,
        })
    }

    /// Redraw the poses of one placeable kind from the existing zones
    ///
    /// Only that kind's poses change. On error `layout` is left untouched.
    pub fn reposition(&mut self, layout: &mut RoomLayout, kind: EntityKind) -> Result<()> {
        let placeable = *self.config.placeable(kind).ok_or_else(|| {
            Error::invalid(format!("{} is not an enabled placeable kind", kind))
        })?;

        let poses = self
            .zone_sampler()
            .place(&layout.zones, &placeable, &mut self.rng)?;

        match layout.placements.iter_mut().find(|p| p.kind == kind) {
            Some(placement) => {
                placement.size = placeable.size;
                placement.poses = poses;
            }
            None => layout.placements.push(Placement {
                kind,
                size: placeable.size,
                poses,
            }),
        }

        debug!(kind = %kind, zones = layout.zones.len(), "Repositioned");
        Ok(())
    }

    fn zone_sampler(&self) -> ZoneSampler {
        ZoneSampler::new(
            self.config.obstacle_size,
            self.config.surface_samples,
            self.config.max_sampling_attempts,
        )
    }

    /// Wall polygon, its interior, and the obstacle placement region
    ///
    /// Candidates whose interior or placement region comes out empty count
    /// against the same attempt budget as rejected wall shapes.
    #[allow(clippy::type_complexity)]
    fn synthesize_shell(&mut self) -> Result<(Vec<Point2<f64>>, Vec<Point2<f64>>, Vec<Profile2D>)> {
        let config = &self.config;
        let spec = WallSpec::square(
            config.room_length_max,
            config.room_area_min,
            config.room_area_max,
            config.wall_point_count,
        );

        for attempt in 1..=config.max_wall_attempts {
            let Some(polygon) = try_wall_polygon(&spec, &mut self.rng)? else {
                continue;
            };
            let Some(interior) = wall_interior(&polygon, config.wall_thickness)? else {
                debug!(attempt, "Wall interior vanished, retrying");
                continue;
            };

            let region = if config.obstacle_count == 0 {
                Vec::new()
            } else {
                placement_region(&interior, config.obstacle_size, config.wall_margin)?
            };
            if config.obstacle_count > 0 && region.is_empty() {
                debug!(attempt, "No room left for obstacles, retrying");
                continue;
            }

            debug!(attempt, vertices = polygon.len(), "Room shell accepted");
            return Ok((polygon, interior, region));
        }

        Err(Error::GenerationTimeout {
            stage: "wall",
            attempts: config.max_wall_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = RoomConfig::default().with_area_bounds(30.0, 10.0);
        assert!(matches!(
            RoomGenerator::new(config),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_seed_makes_generation_reproducible() {
        let config = RoomConfig::default().with_seed(7).with_obstacle_count(4);
        let a = RoomGenerator::new(config.clone()).unwrap().generate().unwrap();
        let b = RoomGenerator::new(config).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_obstacles_is_empty_success() {
        let config = RoomConfig::default().with_seed(3).with_obstacle_count(0);
        let layout = RoomGenerator::new(config).unwrap().generate().unwrap();
        assert!(layout.obstacles.is_empty());
        assert!(layout.zones.is_empty());
        assert!(layout.targets().is_empty());
        assert!(layout.free_space_polygon.holes.is_empty());
    }

    #[test]
    fn test_reposition_rejects_disabled_kind() {
        let config = RoomConfig::cube_room().with_seed(5).with_obstacle_count(2);
        let mut generator = RoomGenerator::new(config).unwrap();
        let mut layout = generator.generate().unwrap();
        let before = layout.clone();

        for kind in [EntityKind::Key, EntityKind::Wall, EntityKind::Obstacle] {
            assert!(matches!(
                generator.reposition(&mut layout, kind),
                Err(Error::InvalidParameters(_))
            ));
        }
        assert_eq!(layout, before);
    }

    #[test]
    fn test_labels_follow_zones() {
        let config = RoomConfig::default().with_seed(11);
        let layout = RoomGenerator::new(config).unwrap().generate().unwrap();
        let labels = layout.obstacle_labels();
        for (z, zone) in layout.zones.iter().enumerate() {
            assert!(zone.member_indices.iter().all(|&m| labels[m] == z));
        }
    }
}
