// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Obstacle zones
//!
//! A zone is one cluster of obstacles treated as a single exclusion region.
//! Its footprint is the union of the member footprints; its hull solid is
//! the 2D convex hull of all member corners extruded to obstacle height.

use crate::cluster::cluster_count;
use crate::error::{Error, Result};
use crate::obstacle::Obstacle;
use nalgebra::Point2;
use roomor_geometry::bool2d::compute_signed_area;
use roomor_geometry::{
    convex_hull_2d, convex_hull_3d, extrude_vertically, lift_to_3d, union_to_profiles, Profile2D,
    SurfaceMesh,
};
use smallvec::SmallVec;

/// One spatially coherent cluster of obstacles
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Obstacle indices, ascending
    pub member_indices: SmallVec<[usize; 8]>,
    /// Union of member footprints; several parts when members do not touch
    pub footprint_polygon: Vec<Profile2D>,
    /// Convex hull of all member footprint corners, counter-clockwise
    pub convex_hull_2d: Vec<Point2<f64>>,
    /// Closed hull of the extruded convex hull, sampled for targets and keys
    pub hull_solid: SurfaceMesh,
}

impl Zone {
    /// Build a zone from the given members of `obstacles`
    pub fn build(obstacles: &[Obstacle], members: &[usize], height: f64) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::DegenerateGeometry("zone has no members".to_string()));
        }

        let mut footprints: Vec<Vec<Point2<f64>>> = Vec::with_capacity(members.len());
        for &m in members {
            let obstacle = obstacles.get(m).ok_or_else(|| {
                Error::invalid(format!("zone member {} out of range", m))
            })?;
            footprints.push(obstacle.footprint().to_vec());
        }

        let corners: Vec<Point2<f64>> = footprints.iter().flatten().copied().collect();
        let hull = convex_hull_2d(&corners);
        if hull.len() < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "zone hull has {} vertices",
                hull.len()
            )));
        }

        let footprint_polygon = union_to_profiles(&footprints)?;
        if footprint_polygon.is_empty() {
            return Err(Error::DegenerateGeometry(
                "zone footprint union is empty".to_string(),
            ));
        }

        let hull_solid = convex_hull_3d(&extrude_vertically(&lift_to_3d(&hull, 0.0), height))?;

        Ok(Self {
            member_indices: members.iter().copied().collect(),
            footprint_polygon,
            convex_hull_2d: hull,
            hull_solid,
        })
    }

    /// Area of the footprint union
    pub fn footprint_area(&self) -> f64 {
        self.footprint_polygon.iter().map(Profile2D::area).sum()
    }

    /// Area of the 2D convex hull
    pub fn hull_area(&self) -> f64 {
        compute_signed_area(&self.convex_hull_2d).abs()
    }

    /// Outer ring of every footprint part, for use as free-space holes
    pub fn hole_rings(&self) -> impl Iterator<Item = &Vec<Point2<f64>>> + '_ {
        self.footprint_polygon.iter().map(|p| &p.outer)
    }
}

/// Build one zone per cluster label
///
/// `labels[i]` is the cluster of obstacle `i`; zone `k` holds label `k`.
pub fn build_zones(obstacles: &[Obstacle], labels: &[usize], height: f64) -> Result<Vec<Zone>> {
    if labels.len() != obstacles.len() {
        return Err(Error::invalid(format!(
            "{} labels for {} obstacles",
            labels.len(),
            obstacles.len()
        )));
    }

    let mut members: Vec<SmallVec<[usize; 8]>> = vec![SmallVec::new(); cluster_count(labels)];
    for (index, &label) in labels.iter().enumerate() {
        members[label].push(index);
    }

    members
        .iter()
        .map(|m| Zone::build(obstacles, m, height))
        .collect()
}
