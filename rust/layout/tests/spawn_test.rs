// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use roomor_layout::{
    is_session_entity, EntityKind, EntitySpawn, RoomConfig, RoomGenerator, SessionId,
    SimulatorBinding, SpawnPlan, SpawnShape,
};
use rustc_hash::FxHashMap;

/// In-memory world keyed by entity name
#[derive(Default)]
struct FakeWorld {
    entities: FxHashMap<String, EntitySpawn>,
    removed: Vec<String>,
}

impl FakeWorld {
    fn with_foreign(names: &[&str]) -> Self {
        let mut world = Self::default();
        for name in names {
            world.entities.insert(
                name.to_string(),
                EntitySpawn {
                    name: name.to_string(),
                    kind: EntityKind::Obstacle,
                    position: [0.0; 3],
                    orientation_rpy_deg: [0.0; 3],
                    shape: SpawnShape::Box { size: [1.0; 3] },
                },
            );
        }
        world
    }
}

impl SimulatorBinding for FakeWorld {
    type Error = String;

    fn list(&mut self) -> Result<Vec<String>, String> {
        Ok(self.entities.keys().cloned().collect())
    }

    fn spawn(&mut self, entities: &[EntitySpawn]) -> Result<(), String> {
        for e in entities {
            self.entities.insert(e.name.clone(), e.clone());
        }
        Ok(())
    }

    fn remove(&mut self, names: &[String]) -> Result<(), String> {
        for name in names {
            if self.entities.remove(name).is_none() {
                return Err(format!("no entity named {}", name));
            }
            self.removed.push(name.clone());
        }
        Ok(())
    }
}

fn chest_plan(seed: u64, session: SessionId) -> (SpawnPlan, RoomConfig) {
    let config = RoomConfig::chest_room().with_seed(seed);
    let layout = RoomGenerator::new(config.clone())
        .unwrap()
        .generate()
        .unwrap();
    (SpawnPlan::from_layout(&layout, &config, session), config)
}

#[test]
fn test_plan_lists_every_entity() {
    let config = RoomConfig::chest_room().with_seed(4);
    let layout = RoomGenerator::new(config.clone())
        .unwrap()
        .generate()
        .unwrap();
    let plan = SpawnPlan::from_layout(&layout, &config, SessionId(7));

    assert_eq!(plan.entities_of(EntityKind::Wall).count(), 1);
    assert_eq!(plan.entities_of(EntityKind::Obstacle).count(), layout.obstacles.len());
    assert_eq!(plan.entities_of(EntityKind::Target).count(), layout.zones.len());
    assert_eq!(plan.entities_of(EntityKind::Key).count(), layout.zones.len());
    assert!(plan.entities.iter().all(|e| is_session_entity(&e.name, SessionId(7))));

    let wall = plan.entities_of(EntityKind::Wall).next().unwrap();
    assert_eq!(wall.name, "mm-7-wall_0");
    assert_eq!(wall.position, [0.0, 0.0, 0.4]);
    match &wall.shape {
        SpawnShape::Extrusion {
            polygon,
            height,
            thickness,
        } => {
            assert_eq!(polygon.len(), layout.wall_interior.len());
            assert_eq!(*height, 0.8);
            assert_eq!(*thickness, 0.05);
        }
        other => panic!("wall spawned as {:?}", other),
    }

    for (spawn, obstacle) in plan.entities_of(EntityKind::Obstacle).zip(&layout.obstacles) {
        assert_eq!(spawn.position[2], 0.35);
        assert!((spawn.orientation_rpy_deg[2] - obstacle.yaw.to_degrees()).abs() < 1e-12);
        assert_eq!(spawn.shape, SpawnShape::Box { size: [0.7; 3] });
    }
}

#[test]
fn test_apply_clears_other_sessions_and_keeps_foreign_models() {
    let mut world = FakeWorld::with_foreign(&["ground_plane", "mm-1-obstacle_0", "mm-1-wall_0"]);
    let (plan, _) = chest_plan(8, SessionId(2));

    plan.apply(&mut world).unwrap();

    assert!(world.entities.contains_key("ground_plane"));
    assert!(!world.entities.contains_key("mm-1-obstacle_0"));
    assert!(!world.entities.contains_key("mm-1-wall_0"));
    assert_eq!(world.entities.len(), plan.entities.len() + 1);
}

#[test]
fn test_apply_clears_stale_entities_with_unknown_tags() {
    let mut world = FakeWorld::with_foreign(&["mm-1-chair_0", "mm-2-lamp_4", "mm-x-chair_0"]);
    let (plan, _) = chest_plan(8, SessionId(2));

    plan.apply(&mut world).unwrap();

    assert!(!world.entities.contains_key("mm-1-chair_0"));
    assert!(!world.entities.contains_key("mm-2-lamp_4"));
    assert!(world.entities.contains_key("mm-x-chair_0"));

    // A later partial update still sweeps other sessions
    world
        .spawn(&[EntitySpawn {
            name: "mm-5-chair_1".to_string(),
            ..plan.entities[0].clone()
        }])
        .unwrap();
    plan.apply_kind(&mut world, EntityKind::Target).unwrap();
    assert!(!world.entities.contains_key("mm-5-chair_1"));
}

#[test]
fn test_apply_removes_surplus_from_a_larger_previous_room() {
    let mut world = FakeWorld::default();
    let big = RoomConfig::cube_room().with_seed(3).with_obstacle_count(12);
    let small = RoomConfig::cube_room().with_seed(3).with_obstacle_count(2);

    for config in [big, small] {
        let layout = RoomGenerator::new(config.clone())
            .unwrap()
            .generate()
            .unwrap();
        SpawnPlan::from_layout(&layout, &config, SessionId(0))
            .apply(&mut world)
            .unwrap();
    }

    let obstacles = world
        .entities
        .values()
        .filter(|e| e.kind == EntityKind::Obstacle)
        .count();
    assert_eq!(obstacles, 2);
    assert!(world.removed.iter().any(|n| n == "mm-0-obstacle_11"));
}

#[test]
fn test_apply_kind_moves_only_targets() {
    let config = RoomConfig::chest_room().with_seed(12);
    let mut generator = RoomGenerator::new(config.clone()).unwrap();
    let mut layout = generator.generate().unwrap();
    let mut world = FakeWorld::default();
    SpawnPlan::from_layout(&layout, &config, SessionId(0))
        .apply(&mut world)
        .unwrap();
    let keys_before: Vec<[f64; 3]> = layout
        .keys()
        .unwrap()
        .iter()
        .map(|p| p.position.coords.into())
        .collect();

    generator.reposition(&mut layout, EntityKind::Target).unwrap();
    SpawnPlan::from_layout(&layout, &config, SessionId(0))
        .apply_kind(&mut world, EntityKind::Target)
        .unwrap();

    assert!(world.removed.is_empty());
    for (i, pose) in layout.targets().iter().enumerate() {
        let spawned = &world.entities[&format!("mm-0-target_{}", i)];
        assert_eq!(spawned.position, <[f64; 3]>::from(pose.position.coords));
    }
    for (i, position) in keys_before.iter().enumerate() {
        assert_eq!(&world.entities[&format!("mm-0-key_{}", i)].position, position);
    }
}

#[test]
fn test_plan_json_has_names_and_kinds() {
    let (plan, _) = chest_plan(1, SessionId(9));
    let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

    assert_eq!(json["session"], 9);
    let entities = json["entities"].as_array().unwrap();
    assert_eq!(entities.len(), plan.entities.len());
    assert_eq!(entities[0]["kind"], "wall");
    assert_eq!(entities[0]["shape"]["type"], "extrusion");
}
