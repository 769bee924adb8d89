// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roomor Layout
//!
//! Procedural indoor room layouts for robotics simulation.
//!
//! A [`RoomGenerator`] draws a random simple wall polygon, scatters cube
//! obstacles inside it, clusters nearby obstacles into zones, and places one
//! target (and optionally one key) next to every zone. The resulting
//! [`RoomLayout`] carries the free-space polygon used for occupancy grids and
//! converts into a [`SpawnPlan`] for a simulator.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomor_layout::{RoomConfig, RoomGenerator, SessionId, SpawnPlan};
//!
//! let config = RoomConfig::chest_room().with_seed(42);
//! let mut generator = RoomGenerator::new(config.clone())?;
//! let layout = generator.generate()?;
//! let plan = SpawnPlan::from_layout(&layout, &config, SessionId(0));
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod free_space;
pub mod obstacle;
pub mod room;
pub mod sampler;
pub mod spawn;
pub mod wall;
pub mod zone;

pub use cluster::cluster;
pub use config::{EntityKind, Placeable, RoomConfig};
pub use error::{Error, Result};
pub use free_space::{free_space_polygon, free_zone_polygon};
pub use obstacle::{place_obstacles, Obstacle};
pub use room::{Placement, RoomGenerator, RoomLayout};
pub use sampler::{Pose, ZoneSampler};
pub use spawn::{
    entity_name, is_managed_entity, is_session_entity, managed_session, EntitySpawn, SessionId,
    SimulatorBinding, SpawnPlan, SpawnShape,
};
pub use wall::{generate_wall_polygon, WallSpec};
pub use zone::{build_zones, Zone};
