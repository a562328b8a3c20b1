// THEORY:
// The `enclosure` module is the decision layer of the engine. Given the region
// map of one image it answers a single topological question: is any region
// completely walled in by exactly one other region? Such a pocket is the
// signature of a hot or cold spot inside an otherwise even surface.
//
// Key architectural principles:
// 1.  **Boundary-first scanning**: the map is scanned row by row until a pixel
//     with a differently-labeled neighbor appears. That pair nominates a
//     candidate enclosed region and a candidate surrounding region, so only
//     regions that actually have an internal boundary are ever examined.
// 2.  **Strict enclosure policy**: a candidate is rejected the moment any of
//     its pixels touches the image border (surveys frame the subject with
//     margin, so border regions are background), or the moment any neighbor
//     belongs to a third region. Every neighbor outside the region must carry
//     the one surrounding id.
// 3.  **Negative-result memo**: rejected region ids go into a set that is
//     consulted before re-examining a region nominated again by a later
//     boundary pixel. The set lives for one call only; every image starts
//     fresh.
// 4.  **Short-circuit verdict**: one enclosed region is enough to flag an
//     image, so the scan returns as soon as a candidate survives.
//
// The candidate check rescans the full map once per candidate, which makes the
// worst case O(R*W*H) over R regions. Thermal surveys produce few regions per
// image, so the simple rescan is kept instead of a per-region pixel index.

use crate::core_modules::region_map::RegionMap;
use std::collections::HashSet;

/// A region found to be fully surrounded by a single other region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enclosure {
    /// The enclosed region.
    pub region: u32,
    /// The one region every outside neighbor of `region` belongs to.
    pub surrounded_by: u32,
}

/// Finds the first region that is fully enclosed by a single other region,
/// scanning in row-major order. Returns `None` when no region qualifies.
pub fn find_enclosed_region(map: &RegionMap) -> Option<Enclosure> {
    let mut rejected: HashSet<u32> = HashSet::new();

    for row in 0..map.height {
        for col in 0..map.width {
            let region = map.label_at(row, col);

            // Look for a neighbor in a different region; the first one found
            // nominates the surrounding candidate.
            let mut surrounding = region;
            for (dr, dc) in &[(-1, 0), (0, -1), (1, 0), (0, 1)] {
                let nr = row as i32 + dr;
                let nc = col as i32 + dc;
                if nr < 0 || nr >= map.height as i32 || nc < 0 || nc >= map.width as i32 {
                    continue;
                }
                let neighbor = map.label_at(nr as u32, nc as u32);
                if neighbor != region {
                    surrounding = neighbor;
                    break;
                }
            }

            if surrounding == region || rejected.contains(&region) {
                continue;
            }

            if region_fully_surrounded(map, region, surrounding) {
                return Some(Enclosure {
                    region,
                    surrounded_by: surrounding,
                });
            }
            rejected.insert(region);
        }
    }

    None
}

/// Whether the image holds at least one enclosed region.
pub fn is_any_region_enclosed(map: &RegionMap) -> bool {
    find_enclosed_region(map).is_some()
}

/// Full-map check of one candidate: every pixel of `region` must stay off the
/// border, and every neighbor of those pixels must belong to `region` itself
/// or to `surrounding`.
fn region_fully_surrounded(map: &RegionMap, region: u32, surrounding: u32) -> bool {
    for row in 0..map.height {
        for col in 0..map.width {
            if map.label_at(row, col) != region {
                continue;
            }
            if map.on_border(row, col) {
                return false;
            }

            // Off the border, so all four neighbors are in bounds.
            for (dr, dc) in &[(-1, 0), (0, -1), (1, 0), (0, 1)] {
                let nr = (row as i32 + dr) as u32;
                let nc = (col as i32 + dc) as u32;
                let other = map.label_at(nr, nc);
                if other != region && other != surrounding {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::intensity_grid::IntensityGrid;
    use crate::core_modules::region_labeler::region_labeler::label_regions;

    fn labeled(rows: Vec<Vec<u32>>) -> RegionMap {
        let grid = IntensityGrid::from_rows(rows).expect("test grid must be rectangular");
        label_regions(&grid, 5).expect("test grid must label cleanly")
    }

    #[test]
    fn interior_hot_pixel_is_enclosed() {
        let mut rows = vec![vec![100u32; 5]; 5];
        rows[2][2] = 500;

        let found = find_enclosed_region(&labeled(rows));
        assert_eq!(
            found,
            Some(Enclosure {
                region: 2,
                surrounded_by: 1
            })
        );
    }

    #[test]
    fn border_pixel_is_never_enclosed() {
        let mut rows = vec![vec![100u32; 5]; 5];
        rows[0][2] = 500;

        let map = labeled(rows);
        assert_eq!(map.region_count, 2);
        assert!(!is_any_region_enclosed(&map));
    }

    #[test]
    fn uniform_image_is_never_enclosed() {
        assert!(!is_any_region_enclosed(&labeled(vec![vec![50; 5]; 5])));
    }

    #[test]
    fn band_touching_side_borders_is_not_enclosed() {
        // Horizontal bands 10 / 200 / 10: the middle band avoids the top and
        // bottom rows but still reaches both side columns.
        let map = labeled(vec![
            vec![10; 5],
            vec![200; 5],
            vec![200; 5],
            vec![10; 5],
            vec![10; 5],
        ]);
        assert_eq!(map.region_count, 3);
        assert!(!is_any_region_enclosed(&map));
    }

    #[test]
    fn multi_pixel_spot_is_enclosed() {
        // A 2x2 pocket: its pixels neighbor each other as well as the
        // background, and both kinds of neighbor are acceptable.
        let mut rows = vec![vec![100u32; 6]; 6];
        for row in 2..4 {
            for col in 2..4 {
                rows[row][col] = 500;
            }
        }

        let found = find_enclosed_region(&labeled(rows));
        assert_eq!(
            found,
            Some(Enclosure {
                region: 2,
                surrounded_by: 1
            })
        );
    }

    #[test]
    fn spot_bordering_two_regions_is_not_enclosed() {
        // Left and right halves split at a sharp step; a pocket on the seam
        // touches both, so no single region surrounds it.
        let map = RegionMap {
            width: 5,
            height: 5,
            labels: vec![
                1, 1, 1, 2, 2, //
                1, 1, 1, 2, 2, //
                1, 1, 3, 2, 2, //
                1, 1, 1, 2, 2, //
                1, 1, 1, 2, 2,
            ],
            region_count: 3,
        };
        assert!(!is_any_region_enclosed(&map));
    }

    #[test]
    fn ring_reports_its_core_not_itself() {
        // Background / ring / core. The ring neighbors two regions and is
        // rejected; the core inside it survives.
        let mut rows = vec![vec![10u32; 7]; 7];
        for row in 2..5 {
            for col in 2..5 {
                rows[row][col] = 200;
            }
        }
        rows[3][3] = 400;

        let map = labeled(rows);
        assert_eq!(map.region_count, 3);
        assert_eq!(
            find_enclosed_region(&map),
            Some(Enclosure {
                region: 3,
                surrounded_by: 2
            })
        );
    }
}
