// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roomor Geometry
//!
//! 2D/3D geometry for procedural room layouts: rotated footprints, polygon
//! unions and inward offsets on top of i_overlay, convex hulls, extruded
//! hull solids with surface sampling, and area-weighted sampling inside
//! polygons using earcutr triangulation. Transforms use nalgebra.

pub mod bool2d;
pub mod error;
pub mod extrusion;
pub mod footprint;
pub mod hull;
pub mod mesh;
pub mod profile;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};

pub use bool2d::{offset_inward, union_contours, union_to_profiles};
pub use error::{Error, Result};
pub use extrusion::{extrude_vertically, lift_to_3d};
pub use footprint::{dedupe_vertices, square_footprint};
pub use hull::{convex_hull_2d, convex_hull_3d};
pub use mesh::{SurfaceMesh, SurfaceSample};
pub use profile::{Profile2D, Triangulation};
pub use transform::{inverse_rigid_2d, to_homogeneous_transform};
pub use triangulation::RegionSampler;
