// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roomor Occupancy
//!
//! Rasterizes a free-space polygon into a square two-valued occupancy grid
//! (free = 255, occupied = 0), optionally in a rotated and translated
//! sampling frame. Cell classification runs in parallel with rayon.

pub mod error;
pub mod grid;
pub mod rasterize;

pub use error::{Error, Result};
pub use grid::{CellState, GridSpec, OccupancyGrid, FREE, OCCUPIED};
pub use rasterize::rasterize;
