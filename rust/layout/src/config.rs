// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation parameters
//!
//! A `RoomConfig` fully determines the admissible output space of the
//! generator. Entity kinds that sit next to zones (targets, keys) are
//! configured through a table of [`Placeable`] entries rather than through
//! separate room types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge length of targets and keys unless configured otherwise
pub const DEFAULT_PLACEABLE_SIZE: f64 = 0.2;

/// Class of a spawned entity, with a stable tag for naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Wall,
    Obstacle,
    Target,
    Key,
}

impl EntityKind {
    /// All kinds in spawn order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Wall,
        EntityKind::Obstacle,
        EntityKind::Target,
        EntityKind::Key,
    ];

    /// Stable tag used in entity names
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Wall => "wall",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Target => "target",
            EntityKind::Key => "key",
        }
    }

    /// Parse a tag back into a kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Whether this kind is sampled on zone hull surfaces
    pub fn is_placeable(self) -> bool {
        matches!(self, EntityKind::Target | EntityKind::Key)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A zone-adjacent entity kind and its cube edge length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placeable {
    pub kind: EntityKind,
    pub size: f64,
}

/// Room generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Number of obstacles to place
    pub obstacle_count: usize,
    /// Obstacle cube edge length
    pub obstacle_size: f64,
    /// Agent footprint used for the clustering threshold
    pub agent_size: f64,
    /// Overrides `sqrt(2) * obstacle_size + agent_size / 2`
    pub cluster_threshold: Option<f64>,
    /// Entities sampled once per zone
    pub placeables: Vec<Placeable>,
    /// Wall points are drawn from `[-L/2, L/2]²`
    pub room_length_max: f64,
    pub room_area_min: f64,
    pub room_area_max: f64,
    /// Random points triangulated for each wall candidate
    pub wall_point_count: usize,
    pub wall_thickness: f64,
    pub wall_height: f64,
    /// Clearance between the wall interior and obstacle footprints
    pub wall_margin: f64,
    /// Even surface samples drawn per zone for target/key placement
    pub surface_samples: usize,
    pub max_wall_attempts: usize,
    pub max_sampling_attempts: usize,
    /// Fixed RNG seed; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            obstacle_count: 10,
            obstacle_size: 0.7,
            agent_size: 1.5,
            cluster_threshold: None,
            placeables: vec![Placeable {
                kind: EntityKind::Target,
                size: DEFAULT_PLACEABLE_SIZE,
            }],
            room_length_max: 9.0,
            room_area_min: 20.0,
            room_area_max: 60.0,
            wall_point_count: 12,
            wall_thickness: 0.05,
            wall_height: 0.8,
            wall_margin: 0.1,
            surface_samples: 100,
            max_wall_attempts: 1000,
            max_sampling_attempts: 8,
            seed: None,
        }
    }
}

impl RoomConfig {
    /// Walls, obstacles and one target per zone
    pub fn cube_room() -> Self {
        Self::default()
    }

    /// Cube room plus one key per zone
    pub fn chest_room() -> Self {
        Self::default().with_key(DEFAULT_PLACEABLE_SIZE)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_obstacle_count(mut self, count: usize) -> Self {
        self.obstacle_count = count;
        self
    }

    pub fn with_obstacle_size(mut self, size: f64) -> Self {
        self.obstacle_size = size;
        self
    }

    pub fn with_agent_size(mut self, size: f64) -> Self {
        self.agent_size = size;
        self
    }

    pub fn with_cluster_threshold(mut self, threshold: f64) -> Self {
        self.cluster_threshold = Some(threshold);
        self
    }

    pub fn with_area_bounds(mut self, min: f64, max: f64) -> Self {
        self.room_area_min = min;
        self.room_area_max = max;
        self
    }

    pub fn with_room_length(mut self, length: f64) -> Self {
        self.room_length_max = length;
        self
    }

    pub fn with_wall(mut self, thickness: f64, height: f64) -> Self {
        self.wall_thickness = thickness;
        self.wall_height = height;
        self
    }

    pub fn with_wall_margin(mut self, margin: f64) -> Self {
        self.wall_margin = margin;
        self
    }

    pub fn with_target(self, size: f64) -> Self {
        self.with_placeable(EntityKind::Target, size)
    }

    pub fn with_key(self, size: f64) -> Self {
        self.with_placeable(EntityKind::Key, size)
    }

    /// Enable a placeable kind or update its size
    pub fn with_placeable(mut self, kind: EntityKind, size: f64) -> Self {
        match self.placeables.iter_mut().find(|p| p.kind == kind) {
            Some(p) => p.size = size,
            None => self.placeables.push(Placeable { kind, size }),
        }
        self
    }

    pub fn with_surface_samples(mut self, samples: usize) -> Self {
        self.surface_samples = samples;
        self
    }

    pub fn with_attempts(mut self, wall: usize, sampling: usize) -> Self {
        self.max_wall_attempts = wall;
        self.max_sampling_attempts = sampling;
        self
    }

    /// Table entry for a placeable kind, if enabled
    pub fn placeable(&self, kind: EntityKind) -> Option<&Placeable> {
        self.placeables.iter().find(|p| p.kind == kind)
    }

    /// Enabled entity kinds in spawn order
    pub fn enabled_kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|k| !k.is_placeable() || self.placeable(*k).is_some())
            .collect()
    }

    /// Effective clustering distance
    pub fn effective_cluster_threshold(&self) -> f64 {
        self.cluster_threshold
            .unwrap_or_else(|| std::f64::consts::SQRT_2 * self.obstacle_size + self.agent_size / 2.0)
    }

    /// Inward shrink applied to the wall interior before obstacle sampling
    pub fn placement_shrink(&self) -> f64 {
        self.wall_margin + self.obstacle_size
    }

    /// Check basic parameter constraints
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("obstacle_size", self.obstacle_size),
            ("agent_size", self.agent_size),
            ("room_length_max", self.room_length_max),
            ("wall_thickness", self.wall_thickness),
            ("wall_height", self.wall_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !self.wall_margin.is_finite() || self.wall_margin < 0.0 {
            return Err(Error::invalid(format!(
                "wall_margin must be non-negative, got {}",
                self.wall_margin
            )));
        }
        if let Some(t) = self.cluster_threshold {
            if !t.is_finite() || t < 0.0 {
                return Err(Error::invalid(format!(
                    "cluster_threshold must be non-negative, got {}",
                    t
                )));
            }
        }

        if !(self.room_area_min > 0.0 && self.room_area_max > 0.0) {
            return Err(Error::invalid("room area bounds must be positive"));
        }
        if self.room_area_min > self.room_area_max {
            return Err(Error::invalid(format!(
                "room_area_min {} exceeds room_area_max {}",
                self.room_area_min, self.room_area_max
            )));
        }
        let extent_area = self.room_length_max * self.room_length_max;
        if self.room_area_min > extent_area {
            return Err(Error::invalid(format!(
                "room_area_min {} is unreachable within a {}x{} extent",
                self.room_area_min, self.room_length_max, self.room_length_max
            )));
        }
        if 2.0 * (self.wall_thickness + self.placement_shrink()) >= self.room_length_max {
            return Err(Error::invalid(
                "wall thickness, margin and obstacle size leave no usable room extent",
            ));
        }

        let mut seen: Vec<EntityKind> = Vec::with_capacity(self.placeables.len());
        for p in &self.placeables {
            if !p.kind.is_placeable() {
                return Err(Error::invalid(format!("{} cannot be placed on zones", p.kind)));
            }
            if seen.contains(&p.kind) {
                return Err(Error::invalid(format!("duplicate placeable kind {}", p.kind)));
            }
            if !p.size.is_finite() || p.size <= 0.0 {
                return Err(Error::invalid(format!(
                    "{} size must be positive, got {}",
                    p.kind, p.size
                )));
            }
            seen.push(p.kind);
        }

        if self.wall_point_count < 3 {
            return Err(Error::invalid("wall_point_count must be at least 3"));
        }
        if self.surface_samples == 0 {
            return Err(Error::invalid("surface_samples must be positive"));
        }
        if self.max_wall_attempts == 0 || self.max_sampling_attempts == 0 {
            return Err(Error::invalid("attempt budgets must be positive"));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
