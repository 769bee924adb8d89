// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Navigable area of a room as a polygon with holes

use crate::error::Result;
use crate::obstacle::Obstacle;
use crate::zone::Zone;
use nalgebra::Point2;
use roomor_geometry::bool2d::{ensure_ccw, ensure_cw};
use roomor_geometry::{union_contours, Profile2D};

/// Wall interior with every zone footprint part as a hole
pub fn free_space_polygon(wall_interior: &[Point2<f64>], zones: &[Zone]) -> Profile2D {
    Profile2D::with_holes(
        ensure_ccw(wall_interior),
        zones
            .iter()
            .flat_map(Zone::hole_rings)
            .map(|ring| ensure_cw(ring))
            .collect(),
    )
}

/// Wall interior with the union of raw obstacle footprints as holes
///
/// Ignores clustering; overlapping obstacles still merge into one hole.
pub fn free_zone_polygon(wall_interior: &[Point2<f64>], obstacles: &[Obstacle]) -> Result<Profile2D> {
    let footprints: Vec<Vec<Point2<f64>>> = obstacles.iter().map(|o| o.footprint().to_vec()).collect();
    let holes = union_contours(&footprints)?;

    Ok(Profile2D::with_holes(
        ensure_ccw(wall_interior),
        holes.iter().map(|ring| ensure_cw(ring)).collect(),
    ))
}
