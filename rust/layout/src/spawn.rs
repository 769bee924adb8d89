// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spawn plans for a simulator
//!
//! A [`SpawnPlan`] lists every entity of a layout with a pose, a shape and a
//! name of the form `mm-{session}-{tag}_{index}`. The names let a simulator
//! binding tell its own instances apart from those of other sessions and
//! from entities it does not manage at all.

use crate::config::{EntityKind, RoomConfig};
use crate::error::Result;
use crate::room::RoomLayout;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every managed entity name
pub const NAME_PREFIX: &str = "mm";

/// Identifies one generator session in entity names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geometry handed to the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnShape {
    /// Axis-aligned box in the entity frame
    Box { size: [f64; 3] },
    /// Wall of `thickness` raised `height` along a closed ring
    Extrusion {
        polygon: Vec<[f64; 2]>,
        height: f64,
        thickness: f64,
    },
}

/// One entity to instantiate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    pub name: String,
    pub kind: EntityKind,
    pub position: [f64; 3],
    /// Roll, pitch, yaw in degrees
    pub orientation_rpy_deg: [f64; 3],
    pub shape: SpawnShape,
}

/// Operations a simulator connection must provide
pub trait SimulatorBinding {
    type Error;

    /// Names of all entities currently in the world
    fn list(&mut self) -> std::result::Result<Vec<String>, Self::Error>;

    /// Create or move the given entities
    fn spawn(&mut self, entities: &[EntitySpawn]) -> std::result::Result<(), Self::Error>;

    /// Delete entities by name
    fn remove(&mut self, names: &[String]) -> std::result::Result<(), Self::Error>;
}

/// Every entity of one layout, named for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlan {
    pub session: SessionId,
    pub entities: Vec<EntitySpawn>,
}

impl SpawnPlan {
    pub fn from_layout(layout: &RoomLayout, config: &RoomConfig, session: SessionId) -> Self {
        let mut entities = Vec::with_capacity(1 + layout.obstacles.len() * 3);

        entities.push(EntitySpawn {
            name: entity_name(session, EntityKind::Wall, 0),
            kind: EntityKind::Wall,
            position: [0.0, 0.0, config.wall_height / 2.0],
            orientation_rpy_deg: [0.0; 3],
            shape: SpawnShape::Extrusion {
                polygon: layout.wall_interior.iter().map(|p| [p.x, p.y]).collect(),
                height: config.wall_height,
                thickness: config.wall_thickness,
            },
        });

        for (i, obstacle) in layout.obstacles.iter().enumerate() {
            entities.push(EntitySpawn {
                name: entity_name(session, EntityKind::Obstacle, i),
                kind: EntityKind::Obstacle,
                position: obstacle.position.coords.into(),
                orientation_rpy_deg: [0.0, 0.0, obstacle.yaw.to_degrees()],
                shape: SpawnShape::Box {
                    size: obstacle.size.into(),
                },
            });
        }

        for placement in &layout.placements {
            for (i, pose) in placement.poses.iter().enumerate() {
                entities.push(EntitySpawn {
                    name: entity_name(session, placement.kind, i),
                    kind: placement.kind,
                    position: pose.position.coords.into(),
                    orientation_rpy_deg: [0.0, 0.0, pose.yaw.to_degrees()],
                    shape: SpawnShape::Box {
                        size: [placement.size; 3],
                    },
                });
            }
        }

        Self { session, entities }
    }

    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &EntitySpawn> + '_ {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace whatever the binding holds with this plan
    ///
    /// Managed entities of other sessions and this session's entities that
    /// are not in the plan are removed first.
    pub fn apply<B: SimulatorBinding>(&self, binding: &mut B) -> std::result::Result<(), B::Error> {
        let wanted: FxHashSet<&str> = self.entities.iter().map(|e| e.name.as_str()).collect();
        let stale: Vec<String> = binding
            .list()?
            .into_iter()
            .filter(|name| is_managed_entity(name) && !wanted.contains(name.as_str()))
            .collect();

        if !stale.is_empty() {
            binding.remove(&stale)?;
        }
        binding.spawn(&self.entities)
    }

    /// Re-apply only the entities of `kind`, e.g. after a reposition
    pub fn apply_kind<B: SimulatorBinding>(
        &self,
        binding: &mut B,
        kind: EntityKind,
    ) -> std::result::Result<(), B::Error> {
        let selected: Vec<EntitySpawn> = self.entities_of(kind).cloned().collect();
        let wanted: FxHashSet<&str> = selected.iter().map(|e| e.name.as_str()).collect();

        let stale: Vec<String> = binding
            .list()?
            .into_iter()
            .filter(|name| match managed_session(name) {
                Some(session) if session != self.session => true,
                Some(_) => {
                    matches!(parse_entity_name(name), Some((_, k, _)) if k == kind)
                        && !wanted.contains(name.as_str())
                }
                None => false,
            })
            .collect();

        if !stale.is_empty() {
            binding.remove(&stale)?;
        }
        binding.spawn(&selected)
    }
}

/// `mm-{session}-{tag}_{index}`
pub fn entity_name(session: SessionId, kind: EntityKind, index: usize) -> String {
    format!("{}-{}-{}_{}", NAME_PREFIX, session, kind.tag(), index)
}

/// Split a managed entity name into its parts
pub fn parse_entity_name(name: &str) -> Option<(SessionId, EntityKind, usize)> {
    let rest = name.strip_prefix(NAME_PREFIX)?.strip_prefix('-')?;
    let (session, rest) = rest.split_once('-')?;
    let (tag, index) = rest.rsplit_once('_')?;
    Some((
        SessionId(session.parse().ok()?),
        EntityKind::from_tag(tag)?,
        index.parse().ok()?,
    ))
}

/// Session of any `mm-{digits}...` name, whatever follows the id
///
/// Stale instances left by other builds may carry tags this crate does not
/// know, so only the prefix and the numeric id are checked.
pub fn managed_session(name: &str) -> Option<SessionId> {
    let rest = name.strip_prefix(NAME_PREFIX)?.strip_prefix('-')?;
    let id = rest.split('-').next()?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok().map(SessionId)
}

pub fn is_managed_entity(name: &str) -> bool {
    managed_session(name).is_some()
}

pub fn is_session_entity(name: &str, session: SessionId) -> bool {
    managed_session(name) == Some(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        let name = entity_name(SessionId(3), EntityKind::Obstacle, 12);
        assert_eq!(name, "mm-3-obstacle_12");
        assert_eq!(
            parse_entity_name(&name),
            Some((SessionId(3), EntityKind::Obstacle, 12))
        );
    }

    #[test]
    fn test_foreign_names_are_not_managed() {
        let foreign = [
            "ground_plane",
            "mm-x-wall_0",
            "mm--wall_0",
            "mm-+1-wall_0",
            "mmm-1-wall_0",
            "sun",
        ];
        for name in foreign {
            assert!(!is_managed_entity(name), "{} parsed as managed", name);
        }
        assert!(is_session_entity("mm-2-key_0", SessionId(2)));
        assert!(!is_session_entity("mm-2-key_0", SessionId(1)));
    }

    #[test]
    fn test_unknown_tags_with_session_id_are_managed() {
        for name in ["mm-1-chair_0", "mm-1-wall", "mm-12"] {
            assert!(is_managed_entity(name), "{} not managed", name);
            assert_eq!(parse_entity_name(name), None);
        }
        assert_eq!(managed_session("mm-7-lamp_3"), Some(SessionId(7)));
    }

    #[test]
    fn test_shape_serializes_with_type_tag() {
        let json = serde_json::to_value(SpawnShape::Box { size: [1.0; 3] }).unwrap();
        assert_eq!(json["type"], "box");
    }
}
