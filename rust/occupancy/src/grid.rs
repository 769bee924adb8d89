// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupancy grid layout and cell access
//!
//! A grid is `size x size` cells of edge `resolution`, centred on the origin
//! of its sampling frame. Cells are stored row-major with rows along +y:
//! cell `(row, col)` is centred at
//! `(-L/2 + (col + 0.5) * resolution, -L/2 + (row + 0.5) * resolution)`
//! where `L = size * resolution`.

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Point2, Vector2};
use roomor_geometry::inverse_rigid_2d;
use serde::{Deserialize, Serialize};

/// Cell value for navigable space
pub const FREE: u8 = 255;

/// Cell value for walls, obstacles and everything outside the room
pub const OCCUPIED: u8 = 0;

/// Classification of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Free,
    Occupied,
}

impl CellState {
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            CellState::Free => FREE,
            CellState::Occupied => OCCUPIED,
        }
    }

    #[inline]
    pub fn from_value(value: u8) -> Self {
        if value == FREE {
            CellState::Free
        } else {
            CellState::Occupied
        }
    }
}

/// Resolution, size and sampling frame of a grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Cell edge length in metres
    pub resolution: f64,
    /// Cells per side
    pub size: usize,
    /// Sampling frame origin in world coordinates
    pub origin_pos: [f64; 2],
    /// Sampling frame heading in radians
    pub origin_ori: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            resolution: 0.05,
            size: 512,
            origin_pos: [0.0, 0.0],
            origin_ori: 0.0,
        }
    }
}

impl GridSpec {
    pub fn new(resolution: f64, size: usize) -> Self {
        Self {
            resolution,
            size,
            ..Self::default()
        }
    }

    /// Place the sampling frame at `pos` with heading `ori`
    pub fn with_origin(mut self, pos: [f64; 2], ori: f64) -> Self {
        self.origin_pos = pos;
        self.origin_ori = ori;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::InvalidGrid(format!(
                "Resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.size == 0 {
            return Err(Error::InvalidGrid("Grid size must be positive".to_string()));
        }
        if self.size.checked_mul(self.size).is_none() {
            return Err(Error::InvalidGrid(format!("Grid size {} overflows", self.size)));
        }
        if !(self.origin_pos.iter().all(|v| v.is_finite()) && self.origin_ori.is_finite()) {
            return Err(Error::InvalidGrid("Origin must be finite".to_string()));
        }
        Ok(())
    }

    /// Side length covered by the grid
    #[inline]
    pub fn extent(&self) -> f64 {
        self.size as f64 * self.resolution
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Whether the sampling frame differs from the world frame
    pub fn has_origin(&self) -> bool {
        self.origin_pos != [0.0, 0.0] || self.origin_ori != 0.0
    }

    /// World-to-sampling-frame transform: `R(-ori) * (p - pos)`
    pub fn sampling_transform(&self) -> Matrix3<f64> {
        inverse_rigid_2d(
            &Vector2::new(self.origin_pos[0], self.origin_pos[1]),
            self.origin_ori,
        )
    }

    /// Centre of a cell in the sampling frame
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> Point2<f64> {
        let half = self.extent() / 2.0;
        Point2::new(
            -half + (col as f64 + 0.5) * self.resolution,
            -half + (row as f64 + 0.5) * self.resolution,
        )
    }

    /// Cell containing a sampling-frame point
    pub fn frame_to_cell(&self, point: &Point2<f64>) -> Option<(usize, usize)> {
        let half = self.extent() / 2.0;
        let col = ((point.x + half) / self.resolution).floor();
        let row = ((point.y + half) / self.resolution).floor();
        let limit = self.size as f64;
        if col < 0.0 || row < 0.0 || col >= limit || row >= limit {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Cell containing a world point
    pub fn world_to_cell(&self, point: &Point2<f64>) -> Option<(usize, usize)> {
        if self.has_origin() {
            self.frame_to_cell(&self.sampling_transform().transform_point(point))
        } else {
            self.frame_to_cell(point)
        }
    }
}

/// Rasterized two-valued occupancy grid
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    spec: GridSpec,
    cells: Vec<u8>,
}

impl OccupancyGrid {
    pub(crate) fn from_cells(spec: GridSpec, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), spec.cell_count());
        Self { spec, cells }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Row-major cell values, `FREE` or `OCCUPIED`
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        if row >= self.spec.size || col >= self.spec.size {
            return None;
        }
        Some(CellState::from_value(self.cells[row * self.spec.size + col]))
    }

    /// State of the cell containing a world point
    pub fn state_at(&self, point: &Point2<f64>) -> Option<CellState> {
        let (row, col) = self.spec.world_to_cell(point)?;
        self.get(row, col)
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == FREE).count()
    }

    /// Share of free cells in `[0, 1]`
    pub fn free_fraction(&self) -> f64 {
        self.free_count() as f64 / self.cells.len() as f64
    }

    /// Free area in square metres
    pub fn free_area(&self) -> f64 {
        self.free_count() as f64 * self.spec.resolution * self.spec.resolution
    }
}
