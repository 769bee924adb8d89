// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! roomgen: generate a random room and print it as JSON
//!
//! Usage:
//!   roomgen [--seed N] [--obstacles N] [--keys] [--reposition] [--grid N]
//!           [--resolution R] [--freezone] [--session N] [--config PATH]

mod options;

use anyhow::{Context, Result};
use options::{print_usage, Options};
use roomor_layout::{RoomGenerator, RoomLayout, SpawnPlan};
use roomor_occupancy::{rasterize, OccupancyGrid};
use serde_json::{json, Value};
use std::env;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let options = match Options::parse(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    let mut generator = RoomGenerator::new(options.config.clone())?;
    let mut layout = generator.generate().context("Room generation failed")?;

    if options.reposition {
        for placeable in options.config.placeables.clone() {
            generator
                .reposition(&mut layout, placeable.kind)
                .with_context(|| format!("Repositioning {} failed", placeable.kind))?;
        }
    }

    let (source, polygon) = if options.freezone {
        ("freezone", layout.free_zone_polygon()?)
    } else {
        ("freespace", layout.free_space_polygon.clone())
    };
    let grid = rasterize(&polygon, &options.grid)?;

    tracing::info!(
        zones = layout.zones.len(),
        free_cells = grid.free_count(),
        "Room ready"
    );

    let plan = SpawnPlan::from_layout(&layout, &options.config, options.session);
    let report = json!({
        "config": options.config,
        "wall_polygon": ring_json(layout.wall_polygon.iter().map(|p| [p.x, p.y])),
        "zones": zones_json(&layout),
        "free_space": {
            "source": source,
            "area": polygon.area(),
            "holes": polygon.holes.len(),
        },
        "occupancy": occupancy_json(&grid),
        "spawn_plan": plan,
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn ring_json(points: impl Iterator<Item = [f64; 2]>) -> Value {
    Value::Array(points.map(|p| json!(p)).collect())
}

fn zones_json(layout: &RoomLayout) -> Value {
    Value::Array(
        layout
            .zones
            .iter()
            .map(|zone| {
                json!({
                    "members": zone.member_indices.to_vec(),
                    "footprint_parts": zone.footprint_polygon.len(),
                    "footprint_area": zone.footprint_area(),
                    "hull": ring_json(zone.convex_hull_2d.iter().map(|p| [p.x, p.y])),
                    "hull_area": zone.hull_area(),
                })
            })
            .collect(),
    )
}

fn occupancy_json(grid: &OccupancyGrid) -> Value {
    let spec = grid.spec();
    json!({
        "size": spec.size,
        "resolution": spec.resolution,
        "origin_pos": spec.origin_pos,
        "origin_ori": spec.origin_ori,
        "free_cells": grid.free_count(),
        "free_fraction": grid.free_fraction(),
        "free_area": grid.free_area(),
    })
}
