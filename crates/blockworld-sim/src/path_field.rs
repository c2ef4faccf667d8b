//! Bounded breadth-first distance field around the player.
//!
//! Agents descend the field one tile at a time. The field only covers a
//! square window around the reference tile, and only walkable tiles get a
//! distance; anything else reads as "no path".

use std::collections::{HashMap, VecDeque};

use blockworld_core::direction::{Direction, ALL_DIRECTIONS, ORTHOGONAL};
use blockworld_core::types::TileCoord;
use blockworld_world::WorldGrid;

/// Tile -> hop distance from the reference tile.
#[derive(Debug, Clone, Default)]
pub struct PathField {
    dist: HashMap<TileCoord, u32>,
    origin: Option<TileCoord>,
}

impl PathField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field with a fresh BFS from `reference`.
    ///
    /// The search stays inside `reference ± radius` (clamped to the grid) and
    /// stops expanding nodes at distance `2 * radius`. With `diagonal`, the
    /// four diagonal steps are allowed when both tiles they cut across are
    /// walkable.
    pub fn rebuild(&mut self, grid: &WorldGrid, reference: TileCoord, radius: i32, diagonal: bool) {
        self.dist.clear();
        self.origin = None;
        if !grid.is_walkable(reference) {
            return;
        }
        self.origin = Some(reference);

        let min_r = (reference.y - radius).max(0);
        let max_r = (reference.y + radius).min(grid.rows() as i32 - 1);
        let min_c = (reference.x - radius).max(0);
        let max_c = (reference.x + radius).min(grid.cols() as i32 - 1);
        let in_window =
            |t: TileCoord| t.y >= min_r && t.y <= max_r && t.x >= min_c && t.x <= max_c;
        let expand_limit = (radius * 2).max(0) as u32;
        let steps: &[Direction] = if diagonal { &ALL_DIRECTIONS } else { &ORTHOGONAL };

        let mut queue = VecDeque::new();
        self.dist.insert(reference, 0);
        queue.push_back(reference);

        while let Some(current) = queue.pop_front() {
            let base = self.dist.get(&current).copied().unwrap_or(0);
            if base >= expand_limit {
                continue;
            }
            for dir in steps {
                let next = current + dir.offset();
                if !in_window(next) || self.dist.contains_key(&next) || !grid.is_walkable(next) {
                    continue;
                }
                if dir.is_diagonal() {
                    let [a, b] = dir.corner_steps();
                    if !grid.is_walkable(current + a) || !grid.is_walkable(current + b) {
                        continue;
                    }
                }
                self.dist.insert(next, base + 1);
                queue.push_back(next);
            }
        }
    }

    /// Hop distance to the reference tile, if the tile is in the field.
    pub fn distance(&self, tile: TileCoord) -> Option<u32> {
        self.dist.get(&tile).copied()
    }

    /// Reference tile of the last rebuild, None if it was not walkable.
    pub fn origin(&self) -> Option<TileCoord> {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    pub fn clear(&mut self) {
        self.dist.clear();
        self.origin = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, u32)> + '_ {
        self.dist.iter().map(|(t, d)| (*t, *d))
    }
}
