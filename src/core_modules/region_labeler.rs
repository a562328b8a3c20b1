// THEORY:
// The `RegionLabeler` is the engine of the segmentation layer. It implements
// connected-component labeling over an intensity grid using region growing
// with a *chained* similarity rule.
//
// Key architectural principles & algorithm steps:
// 1.  **Row-major seeding**: the grid is scanned row by row. Every pixel that
//     has no region yet becomes the seed of the next region and is pushed onto
//     an explicit work stack. Ids are handed out in seed-discovery order
//     starting at 1, so labeling is fully deterministic.
// 2.  **Chained similarity**: when a pixel is popped, each unlabeled
//     4-neighbor joins the region if its intensity is within `region_range`
//     of the *popped* pixel, not of the seed. Membership is a chain of local
//     similarity, which lets a region drift gradually in intensity across its
//     extent. A slow thermal gradient therefore reads as one region, while a
//     sharp step always splits.
// 3.  **Explicit stack, never recursion**: region size is bounded only by the
//     image size, so the fill runs on a heap-allocated `Vec` of cells. Each
//     pixel is labeled *before* it is pushed, which guarantees every pixel
//     enters the stack at most once and the whole pass stays O(W*H).
// 4.  **Stateless utility**: `label_regions` takes one grid and produces one
//     `RegionMap`. It keeps no state between calls, so the same grid always
//     yields the same map.

use crate::core_modules::intensity_grid::IntensityGrid;
use crate::core_modules::region_map::{Cell, RegionMap};
use crate::error::{Result, TriageError};
use log::debug;

pub mod region_labeler {
    use super::*; // Make structs from parent module available.

    /// The default maximum intensity difference between two neighboring pixels
    /// that still places them in the same region.
    pub const DEFAULT_REGION_RANGE: u32 = 5;

    /// Assigns every pixel of `grid` to a connected region of locally similar
    /// intensity. Returns a map of the same shape holding the region ids.
    pub fn label_regions(grid: &IntensityGrid, region_range: u32) -> Result<RegionMap> {
        if grid.width == 0 || grid.height == 0 {
            return Err(TriageError::InvalidInput(format!(
                "cannot label a {}x{} grid",
                grid.width, grid.height
            )));
        }
        if grid.data.len() != (grid.width as usize) * (grid.height as usize) {
            return Err(TriageError::InvalidInput(format!(
                "grid data holds {} values, expected {} for {}x{}",
                grid.data.len(),
                (grid.width as usize) * (grid.height as usize),
                grid.width,
                grid.height
            )));
        }

        let mut map = RegionMap::unlabeled(grid);
        let mut stack: Vec<Cell> = Vec::new();

        for row in 0..grid.height {
            for col in 0..grid.width {
                if map.label_at(row, col) != 0 {
                    continue;
                }

                // Unassigned pixel: seed a new region and grow it.
                map.region_count += 1;
                let region = map.region_count;
                map.labels[(row * map.width + col) as usize] = region;
                stack.push(Cell { row, col });

                while let Some(current) = stack.pop() {
                    let value = grid.at(current.row, current.col);

                    // Check all 4 direct neighbors (not diagonals).
                    for (dr, dc) in &[(0, -1), (-1, 0), (0, 1), (1, 0)] {
                        let nr = current.row as i32 + dr;
                        let nc = current.col as i32 + dc;

                        if nr < 0 || nr >= grid.height as i32 || nc < 0 || nc >= grid.width as i32
                        {
                            continue;
                        }
                        let nr = nr as u32;
                        let nc = nc as u32;

                        if map.label_at(nr, nc) == 0
                            && grid.at(nr, nc).abs_diff(value) <= region_range
                        {
                            map.labels[(nr * map.width + nc) as usize] = region;
                            stack.push(Cell { row: nr, col: nc });
                        }
                    }
                }
            }
        }

        debug!(
            "labeled {}x{} grid into {} regions (range {})",
            grid.width, grid.height, map.region_count, region_range
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::region_labeler::*;
    use super::*;

    fn grid(rows: Vec<Vec<u32>>) -> IntensityGrid {
        IntensityGrid::from_rows(rows).expect("test grid must be rectangular")
    }

    /// 5x5 of value 100 with a single hot pixel in the middle.
    fn hot_spot_grid() -> IntensityGrid {
        let mut rows = vec![vec![100u32; 5]; 5];
        rows[2][2] = 500;
        grid(rows)
    }

    #[test]
    fn uniform_grid_is_one_region() {
        let map = label_regions(&grid(vec![vec![50; 4]; 4]), DEFAULT_REGION_RANGE).unwrap();
        assert_eq!(map.region_count, 1);
        assert!(map.labels.iter().all(|&label| label == 1));
    }

    #[test]
    fn hot_spot_splits_into_two_regions() {
        let map = label_regions(&hot_spot_grid(), DEFAULT_REGION_RANGE).unwrap();
        assert_eq!(map.region_count, 2);
        assert_eq!(map.label_at(2, 2), 2);
        assert_eq!(map.label_at(0, 0), 1);
        assert_eq!(map.label_at(2, 1), 1);
        assert_eq!(map.label_at(4, 4), 1);
    }

    #[test]
    fn similarity_chains_through_a_gradient() {
        // Adjacent steps of 4 stay within range 5, so the whole strip is one
        // region even though the endpoints differ by 12.
        let map = label_regions(&grid(vec![vec![100, 104, 108, 112]]), 5).unwrap();
        assert_eq!(map.region_count, 1);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let joined = label_regions(&grid(vec![vec![10, 15]]), 5).unwrap();
        assert_eq!(joined.region_count, 1);

        let split = label_regions(&grid(vec![vec![10, 16]]), 5).unwrap();
        assert_eq!(split.region_count, 2);
    }

    #[test]
    fn ids_follow_row_major_discovery_order() {
        // Two vertical stripes: the left stripe is seeded first at (0,0), the
        // right stripe at (0,1).
        let map = label_regions(&grid(vec![vec![0, 100], vec![0, 100]]), 5).unwrap();
        assert_eq!(map.labels, vec![1, 2, 1, 2]);
        assert_eq!(map.region_count, 2);
    }

    #[test]
    fn labeling_is_idempotent() {
        let source = hot_spot_grid();
        let first = label_regions(&source, DEFAULT_REGION_RANGE).unwrap();
        let second = label_regions(&source, DEFAULT_REGION_RANGE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_pixel_lands_in_exactly_one_region() {
        let map = label_regions(
            &grid(vec![
                vec![10, 10, 200, 10, 10],
                vec![10, 200, 200, 200, 10],
                vec![10, 10, 200, 400, 10],
            ]),
            DEFAULT_REGION_RANGE,
        )
        .unwrap();

        assert!(map.labels.iter().all(|&label| label >= 1));
        assert!(map.labels.iter().all(|&label| label <= map.region_count));
        for region in 1..=map.region_count {
            assert!(
                map.labels.contains(&region),
                "region id {} was never assigned",
                region
            );
        }
    }

    #[test]
    fn widening_the_range_only_merges_regions() {
        // Bands at 0 / 10 / 30: range 5 keeps all three apart, range 10 fuses
        // the lower two, range 30 fuses everything.
        let banded = grid(vec![
            vec![0, 0, 0, 0],
            vec![10, 10, 10, 10],
            vec![30, 30, 30, 30],
        ]);

        let mut previous_count = u32::MAX;
        let mut previous_largest = 0usize;
        for range in [0, 5, 10, 20, 30] {
            let map = label_regions(&banded, range).unwrap();
            let largest = (1..=map.region_count)
                .map(|region| map.labels.iter().filter(|&&label| label == region).count())
                .max()
                .unwrap();

            assert!(map.region_count <= previous_count);
            assert!(largest >= previous_largest);
            previous_count = map.region_count;
            previous_largest = largest;
        }
        assert_eq!(previous_count, 1);
    }

    #[test]
    fn malformed_grids_are_rejected() {
        let no_rows = IntensityGrid {
            width: 3,
            height: 0,
            data: Vec::new(),
        };
        assert!(matches!(
            label_regions(&no_rows, DEFAULT_REGION_RANGE),
            Err(TriageError::InvalidInput(_))
        ));

        let short_data = IntensityGrid {
            width: 3,
            height: 3,
            data: vec![0; 4],
        };
        assert!(matches!(
            label_regions(&short_data, DEFAULT_REGION_RANGE),
            Err(TriageError::InvalidInput(_))
        ));
    }
}
