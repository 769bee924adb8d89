// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lifting planar point sets into 3D and extruding them into prism clouds

use nalgebra::{Point2, Point3, Vector3};

/// Append a constant z coordinate to every point
pub fn lift_to_3d(points: &[Point2<f64>], z: f64) -> Vec<Point3<f64>> {
    points.iter().map(|p| Point3::new(p.x, p.y, z)).collect()
}

/// Duplicate a vertex set, offsetting the copy along +z by `height`
///
/// The original vertices come first, the raised copy second.
pub fn extrude_vertically(points: &[Point3<f64>], height: f64) -> Vec<Point3<f64>> {
    let offset = Vector3::new(0.0, 0.0, height);
    let mut solid = Vec::with_capacity(points.len() * 2);
    solid.extend_from_slice(points);
    solid.extend(points.iter().map(|p| p + offset));
    solid
}
