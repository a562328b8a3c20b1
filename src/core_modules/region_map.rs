// THEORY:
// The `RegionMap` is the output of the labeling layer and the sole input of
// the containment layer. It mirrors the shape of its source grid, but each
// entry holds the id of the connected region the pixel was assigned to.
// Region ids start at 1; 0 marks "not yet labeled" and only exists while the
// labeler is running. Ids carry no meaning beyond identity, so two maps over
// the same grid are comparable entry by entry.

use crate::core_modules::intensity_grid::IntensityGrid;

/// A simple struct to represent one pixel position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

/// Region assignments for every pixel of one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    pub width: u32,
    pub height: u32,
    /// Flat region ids, `width * height` entries, row by row. Every entry is
    /// in `1..=region_count` once labeling has finished.
    pub labels: Vec<u32>,
    /// Total number of distinct regions. Ids run `1..=region_count`.
    pub region_count: u32,
}

impl RegionMap {
    /// An all-zero map shaped like `grid`, ready for the labeler to fill in.
    pub(crate) fn unlabeled(grid: &IntensityGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            labels: vec![0; grid.data.len()],
            region_count: 0,
        }
    }

    /// The region id at (row, col). Callers must stay in bounds.
    #[inline]
    pub fn label_at(&self, row: u32, col: u32) -> u32 {
        self.labels[(row * self.width + col) as usize]
    }

    /// Whether (row, col) lies on the outer edge of the map.
    #[inline]
    pub fn on_border(&self, row: u32, col: u32) -> bool {
        row == 0 || row == self.height - 1 || col == 0 || col == self.width - 1
    }
}
