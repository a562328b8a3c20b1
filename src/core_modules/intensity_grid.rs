// THEORY:
// The `IntensityGrid` is the input contract for the whole engine. It holds the
// per-pixel intensity values of one thermal image as a flat, row-major matrix
// of plain integers. Decoded photos produce values in the 0..=255 range, but
// the grid deliberately stores wider integers so synthetic calibration data
// with exaggerated intensities flows through the same type.
//
// Key architectural principles:
// 1.  **Validated at the boundary**: the constructors reject ragged rows and
//     zero dimensions with `InvalidInput`, so the labeling and containment
//     layers can index freely without re-checking shape on every access.
// 2.  **Dumb data container**: once built, a grid is never mutated. It is
//     exclusively owned by the analysis of one image.

use crate::error::{Result, TriageError};

/// A rectangular, row-major matrix of per-pixel intensities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    pub width: u32,
    pub height: u32,
    /// Flat pixel data, `width * height` entries, row by row.
    pub data: Vec<u32>,
}

impl IntensityGrid {
    /// Builds a grid from pre-flattened pixel data.
    pub fn from_flat(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TriageError::InvalidInput(format!(
                "grid dimensions must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(TriageError::InvalidInput(format!(
                "grid data holds {} values, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(TriageError::InvalidInput(
                "grid must have at least one row".to_string(),
            ));
        }
        let width = rows[0].len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(TriageError::InvalidInput(format!(
                    "ragged grid: row {} holds {} values, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
        }
        let data: Vec<u32> = rows.into_iter().flatten().collect();
        Self::from_flat(width as u32, height as u32, data)
    }

    /// The intensity at (row, col). Callers must stay in bounds.
    #[inline]
    pub fn at(&self, row: u32, col: u32) -> u32 {
        self.data[(row * self.width + col) as usize]
    }
}
