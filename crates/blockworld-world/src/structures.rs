//! Structure detection over a finished grid.
//!
//! Records are derived from the final tiles rather than from what the
//! generator stamped, so a house or patch partly erased by a later pass
//! (the altar clearing) is reported as it actually looks.

use std::collections::VecDeque;

use blockworld_core::tile::Tile;
use blockworld_core::types::{tile, TileCoord};
use serde::{Deserialize, Serialize};

use crate::grid::WorldGrid;

/// 4-connected neighbor offsets as (dcol, drow).
const FACE_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A connected region of dirt. Agents spawn at its anchor once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtPatch {
    pub cells: Vec<TileCoord>,
    pub anchor: TileCoord,
}

/// A 4x4 brick house with a 2x2 wood interior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Top-left tile of the footprint.
    pub origin: TileCoord,
    pub interior: [TileCoord; 4],
    /// Spawn tile next to the house.
    pub anchor: TileCoord,
}

impl House {
    /// A house keeps spawning while any interior tile is still wood.
    pub fn is_active(&self, grid: &WorldGrid) -> bool {
        self.interior.iter().any(|t| grid.get(*t) == Tile::Wood)
    }
}

/// The altar. Mining its core breaks it for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Altar {
    pub position: TileCoord,
    pub broken: bool,
}

/// One generated structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureRecord {
    DirtPatch(DirtPatch),
    House(House),
    Altar(Altar),
}

/// Spawn-relevant structures of a world, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structures {
    pub dirt_patches: Vec<DirtPatch>,
    pub houses: Vec<House>,
}

impl Structures {
    /// Scan a grid for dirt patches and houses.
    pub fn detect(grid: &WorldGrid) -> Self {
        Self {
            dirt_patches: find_dirt_patches(grid),
            houses: find_houses(grid),
        }
    }

    /// Flatten into tagged records, altar last.
    pub fn records(&self, altar: Altar) -> Vec<StructureRecord> {
        let mut out: Vec<StructureRecord> = self
            .dirt_patches
            .iter()
            .cloned()
            .map(StructureRecord::DirtPatch)
            .collect();
        out.extend(self.houses.iter().cloned().map(StructureRecord::House));
        out.push(StructureRecord::Altar(altar));
        out
    }
}

/// 4-connected dirt components, found by iterative flood fill in row-major
/// discovery order.
pub fn find_dirt_patches(grid: &WorldGrid) -> Vec<DirtPatch> {
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    let mut visited = vec![false; grid.tiles().len()];
    let mut patches = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            let start_idx = (r * cols + c) as usize;
            if visited[start_idx] || grid.get(tile(r, c)) != Tile::Dirt {
                continue;
            }

            let mut queue = VecDeque::new();
            let mut cells = Vec::new();
            visited[start_idx] = true;
            queue.push_back(tile(r, c));

            while let Some(current) = queue.pop_front() {
                cells.push(current);
                for &(dc, dr) in &FACE_OFFSETS {
                    let next = TileCoord::new(current.x + dc, current.y + dr);
                    if !grid.in_bounds(next) || grid.get(next) != Tile::Dirt {
                        continue;
                    }
                    let idx = (next.y * cols + next.x) as usize;
                    if !visited[idx] {
                        visited[idx] = true;
                        queue.push_back(next);
                    }
                }
            }

            let anchor = median_anchor(&cells);
            patches.push(DirtPatch { cells, anchor });
        }
    }
    patches
}

/// (median row, median column) taken independently, upper median on even counts.
fn median_anchor(cells: &[TileCoord]) -> TileCoord {
    let mut rows: Vec<i32> = cells.iter().map(|t| t.y).collect();
    let mut cols: Vec<i32> = cells.iter().map(|t| t.x).collect();
    rows.sort_unstable();
    cols.sort_unstable();
    tile(rows[rows.len() / 2], cols[cols.len() / 2])
}

/// True when the 4x4 window at (top, left) is exactly the house pattern.
pub fn is_house_at(grid: &WorldGrid, top: i32, left: i32) -> bool {
    for r in top..top + 4 {
        for c in left..left + 4 {
            let inside = (top + 1..=top + 2).contains(&r) && (left + 1..=left + 2).contains(&c);
            let expected = if inside { Tile::Wood } else { Tile::Brick };
            if grid.get(tile(r, c)) != expected {
                return false;
            }
        }
    }
    true
}

/// Every 4x4 window matching the house pattern.
pub fn find_houses(grid: &WorldGrid) -> Vec<House> {
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    let mut houses = Vec::new();
    for top in 0..=rows - 4 {
        for left in 0..=cols - 4 {
            // Cheap reject on the corner before the full scan.
            if grid.get(tile(top, left)) != Tile::Brick || !is_house_at(grid, top, left) {
                continue;
            }
            houses.push(House {
                origin: tile(top, left),
                interior: [
                    tile(top + 1, left + 1),
                    tile(top + 1, left + 2),
                    tile(top + 2, left + 1),
                    tile(top + 2, left + 2),
                ],
                anchor: house_anchor(grid, top, left),
            });
        }
    }
    houses
}

/// First walkable door tile around the house, or the interior corner.
fn house_anchor(grid: &WorldGrid, top: i32, left: i32) -> TileCoord {
    let candidates = [
        tile(top - 1, left + 1),
        tile(top - 1, left + 2),
        tile(top + 4, left + 1),
        tile(top + 4, left + 2),
        tile(top + 1, left - 1),
        tile(top + 2, left - 1),
        tile(top + 1, left + 4),
        tile(top + 2, left + 4),
    ];
    candidates
        .into_iter()
        .find(|t| grid.is_walkable(*t))
        .unwrap_or(tile(top + 1, left + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp_house(grid: &mut WorldGrid, top: i32, left: i32) {
        grid.fill_rect(top, left, 4, 4, Tile::Brick);
        grid.fill_rect(top + 1, left + 1, 2, 2, Tile::Wood);
    }

    #[test]
    fn test_single_patch_anchor_is_median() {
        let mut grid = WorldGrid::new(10, 10);
        grid.fill_rect(2, 3, 2, 3, Tile::Dirt);
        let patches = find_dirt_patches(&grid);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].cells.len(), 6);
        // rows [2,2,2,3,3,3] -> 3, cols [3,3,4,4,5,5] -> 4
        assert_eq!(patches[0].anchor, tile(3, 4));
    }

    #[test]
    fn test_diagonal_dirt_is_two_patches() {
        let mut grid = WorldGrid::new(6, 6);
        grid.set(tile(1, 1), Tile::Dirt);
        grid.set(tile(2, 2), Tile::Dirt);
        assert_eq!(find_dirt_patches(&grid).len(), 2);
    }

    #[test]
    fn test_house_detection_and_anchor() {
        let mut grid = WorldGrid::new(12, 12);
        stamp_house(&mut grid, 4, 4);
        let houses = find_houses(&grid);
        assert_eq!(houses.len(), 1);
        assert_eq!(houses[0].origin, tile(4, 4));
        assert_eq!(houses[0].anchor, tile(3, 5));
        assert!(houses[0].is_active(&grid));
    }

    #[test]
    fn test_house_anchor_skips_blocked_doors() {
        let mut grid = WorldGrid::new(12, 12);
        stamp_house(&mut grid, 4, 4);
        grid.fill_rect(3, 4, 1, 4, Tile::Stone);
        let houses = find_houses(&grid);
        assert_eq!(houses[0].anchor, tile(8, 5));
    }

    #[test]
    fn test_damaged_house_not_detected() {
        let mut grid = WorldGrid::new(12, 12);
        stamp_house(&mut grid, 4, 4);
        grid.set(tile(4, 5), Tile::Grass);
        assert!(find_houses(&grid).is_empty());
    }

    #[test]
    fn test_house_goes_inactive_when_interior_mined() {
        let mut grid = WorldGrid::new(12, 12);
        stamp_house(&mut grid, 4, 4);
        let house = find_houses(&grid).remove(0);
        for t in house.interior {
            grid.set(t, Tile::Grass);
        }
        assert!(!house.is_active(&grid));
    }

    #[test]
    fn test_records_put_altar_last() {
        let mut grid = WorldGrid::new(12, 12);
        stamp_house(&mut grid, 4, 4);
        grid.set(tile(0, 0), Tile::Dirt);
        let structures = Structures::detect(&grid);
        let altar = Altar {
            position: tile(6, 6),
            broken: false,
        };
        let records = structures.records(altar);
        assert_eq!(records.len(), 3);
        assert!(matches!(records[0], StructureRecord::DirtPatch(_)));
        assert!(matches!(records[1], StructureRecord::House(_)));
        assert_eq!(records[2], StructureRecord::Altar(altar));
    }
}
