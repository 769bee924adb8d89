// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use nalgebra::Point2;
use roomor_geometry::bool2d::{
    compute_signed_area, distance_to_contour, is_simple_contour, point_in_contour,
};
use roomor_layout::{
    build_zones, cluster, EntityKind, Error, Obstacle, RoomConfig, RoomGenerator, RoomLayout,
};

const SEEDS: [u64; 6] = [0, 1, 2, 3, 42, 1234];

fn generate(config: RoomConfig) -> RoomLayout {
    RoomGenerator::new(config)
        .expect("valid config")
        .generate()
        .expect("generation succeeds")
}

#[test]
fn test_wall_is_simple_and_within_area_bounds() {
    for seed in SEEDS {
        let config = RoomConfig::default().with_seed(seed);
        let layout = generate(config.clone());

        let area = compute_signed_area(&layout.wall_polygon);
        assert!(area >= config.room_area_min && area <= config.room_area_max);
        assert!(is_simple_contour(&layout.wall_polygon));

        let interior = compute_signed_area(&layout.wall_interior);
        assert!(interior > 0.0 && interior < area, "seed {}", seed);
    }
}

#[test]
fn test_zones_partition_obstacles() {
    for seed in SEEDS {
        let layout = generate(RoomConfig::default().with_seed(seed));
        assert_eq!(layout.obstacles.len(), 10);

        let mut seen = vec![0usize; layout.obstacles.len()];
        for zone in &layout.zones {
            for &m in &zone.member_indices {
                seen[m] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1), "seed {}: {:?}", seed, seen);

        let total: usize = layout.zones.iter().map(|z| z.member_indices.len()).sum();
        assert_eq!(total, layout.obstacles.len());
    }
}

#[test]
fn test_obstacle_footprints_inside_wall_with_margin() {
    // Crowded rooms push obstacle centres into every corner and spike of the region
    for seed in 0..300 {
        let config = RoomConfig::default()
            .with_seed(seed)
            .with_obstacle_count(25);
        let layout = generate(config.clone());

        for p in &layout.wall_interior {
            assert!(point_in_contour(p, &layout.wall_polygon), "seed {}", seed);
            assert!(
                distance_to_contour(p, &layout.wall_polygon) >= config.wall_thickness - 1e-6,
                "seed {}: interior vertex {:?} inside the wall",
                seed,
                p
            );
        }

        for obstacle in &layout.obstacles {
            for corner in obstacle.footprint() {
                assert!(point_in_contour(&corner, &layout.wall_interior));
                assert!(
                    distance_to_contour(&corner, &layout.wall_interior)
                        >= config.wall_margin - 1e-6,
                    "seed {}: corner {:?} closer than the margin",
                    seed,
                    corner
                );
            }
        }
    }
}

#[test]
fn test_hull_contains_footprint_union() {
    for seed in SEEDS {
        let layout = generate(RoomConfig::default().with_seed(seed));
        for zone in &layout.zones {
            assert!(zone.hull_area() + 1e-6 >= zone.footprint_area());
            for ring in zone.hole_rings() {
                for p in ring {
                    assert!(
                        point_in_contour(p, &zone.convex_hull_2d)
                            || distance_to_contour(p, &zone.convex_hull_2d) < 1e-6
                    );
                }
            }
        }
    }
}

#[test]
fn test_targets_and_keys_rest_beside_zones() {
    for seed in SEEDS {
        let config = RoomConfig::chest_room().with_seed(seed);
        let layout = generate(config);
        let targets = layout.targets();
        let keys = layout.keys().expect("chest room has keys");

        assert_eq!(targets.len(), layout.zones.len());
        assert_eq!(keys.len(), layout.zones.len());

        for (zone, (target, key)) in layout.zones.iter().zip(targets.iter().zip(keys)) {
            assert_eq!(target.position.z, 0.2 / 2.0);
            assert_eq!(key.position.z, 0.2 / 2.0);
            assert_eq!(target.yaw, 0.0);
            // Side faces project onto the hull outline
            for pose in [target, key] {
                let d = distance_to_contour(&pose.position.xy(), &zone.convex_hull_2d);
                assert!(d < 1e-6, "seed {}: pose {} off the hull outline", seed, d);
            }
        }
    }
}

#[test]
fn test_free_space_polygon_matches_zones() {
    let layout = generate(RoomConfig::default().with_seed(9));
    let free = &layout.free_space_polygon;

    assert_relative_eq!(
        compute_signed_area(&free.outer),
        compute_signed_area(&layout.wall_interior),
        epsilon = 1e-9
    );
    let parts: usize = layout.zones.iter().map(|z| z.footprint_polygon.len()).sum();
    assert_eq!(free.holes.len(), parts);

    for obstacle in &layout.obstacles {
        assert!(!free.contains(&obstacle.center()));
    }

    let freezone = layout.free_zone_polygon().unwrap();
    assert!(freezone.holes.len() <= layout.obstacles.len());
    for obstacle in &layout.obstacles {
        assert!(!freezone.contains(&obstacle.center()));
    }
}

#[test]
fn test_reposition_touches_only_its_kind() {
    let config = RoomConfig::chest_room().with_seed(77);
    let mut generator = RoomGenerator::new(config).unwrap();
    let mut layout = generator.generate().unwrap();
    let before = layout.clone();

    generator.reposition(&mut layout, EntityKind::Target).unwrap();

    assert_eq!(layout.wall_polygon, before.wall_polygon);
    assert_eq!(layout.wall_interior, before.wall_interior);
    assert_eq!(layout.obstacles, before.obstacles);
    assert_eq!(layout.zones, before.zones);
    assert_eq!(layout.free_space_polygon, before.free_space_polygon);
    assert_eq!(layout.keys(), before.keys());
    assert_eq!(layout.targets().len(), before.targets().len());
    assert!(layout
        .targets()
        .iter()
        .all(|t| t.position.z == 0.1 && t.yaw == 0.0));
}

#[test]
fn test_single_obstacle_room() {
    let layout = generate(RoomConfig::default().with_seed(5).with_obstacle_count(1));

    assert_eq!(layout.zones.len(), 1);
    let zone = &layout.zones[0];
    assert_eq!(zone.member_indices.as_slice(), &[0]);
    assert_eq!(zone.convex_hull_2d.len(), 4);
    assert_relative_eq!(zone.hull_area(), 0.49, epsilon = 1e-9);
    assert_eq!(layout.targets().len(), 1);
    assert_eq!(layout.free_space_polygon.holes.len(), 1);
}

#[test]
fn test_two_obstacles_against_threshold() {
    let threshold = RoomConfig::default().effective_cluster_threshold();
    let near = [
        Obstacle::new(Point2::new(0.0, 0.0), 0.0, 0.7),
        Obstacle::new(Point2::new(threshold - 0.01, 0.0), 0.5, 0.7),
    ];
    let far = [
        Obstacle::new(Point2::new(0.0, 0.0), 0.0, 0.7),
        Obstacle::new(Point2::new(threshold + 0.01, 0.0), 0.5, 0.7),
    ];

    for (obstacles, expected) in [(&near, 1), (&far, 2)] {
        let centers: Vec<Point2<f64>> = obstacles.iter().map(Obstacle::center).collect();
        let labels = cluster(&centers, threshold);
        let zones = build_zones(obstacles, &labels, 0.7).unwrap();
        assert_eq!(zones.len(), expected);
    }
}

#[test]
fn test_unreachable_room_area_times_out() {
    let config = RoomConfig::default()
        .with_seed(1)
        .with_area_bounds(80.5, 81.0)
        .with_attempts(25, 4);
    let mut generator = RoomGenerator::new(config).unwrap();
    match generator.generate() {
        Err(Error::GenerationTimeout { stage, attempts }) => {
            assert_eq!(stage, "wall");
            assert_eq!(attempts, 25);
        }
        other => panic!("expected a timeout, got {:?}", other.map(|l| l.zones.len())),
    }
}
