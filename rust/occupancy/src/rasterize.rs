// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon-with-holes to occupancy grid
//!
//! The polygon is moved into the grid's sampling frame once; every cell
//! centre is then classified independently on the rayon pool and written
//! back by index.

use crate::error::Result;
use crate::grid::{GridSpec, OccupancyGrid, FREE, OCCUPIED};
use rayon::prelude::*;
use roomor_geometry::Profile2D;
use std::time::Instant;
use tracing::debug;

/// Classify every cell centre of `spec` against `polygon`
///
/// A cell is free when its centre lies inside the outer ring and outside
/// every hole.
pub fn rasterize(polygon: &Profile2D, spec: &GridSpec) -> Result<OccupancyGrid> {
    spec.validate()?;
    let start = Instant::now();

    let local = if spec.has_origin() {
        polygon.transformed(&spec.sampling_transform())
    } else {
        polygon.clone()
    };

    let size = spec.size;
    let cells: Vec<u8> = (0..spec.cell_count())
        .into_par_iter()
        .map(|index| {
            let center = spec.cell_center(index / size, index % size);
            if local.contains(&center) {
                FREE
            } else {
                OCCUPIED
            }
        })
        .collect();

    let grid = OccupancyGrid::from_cells(*spec, cells);
    debug!(
        size,
        resolution = spec.resolution,
        free = grid.free_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rasterized occupancy grid"
    );
    Ok(grid)
}
