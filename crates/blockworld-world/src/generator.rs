//! One-shot procedural world population.
//!
//! Feature passes run in a fixed order (lakes, small trees, houses, rock
//! veins, big trees, dirt patches), then the altar is always placed. Every
//! feature instance goes through [`place_with_retry`]: propose a footprint,
//! check clearance, stamp or retry, and skip the instance once its attempt
//! budget runs out.

use blockworld_core::tile::Tile;
use blockworld_core::types::{tile, Difficulty, TileCoord, WorldPreset};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Footprint, WorldGrid};
use crate::structures::{Altar, Structures};

/// Size choices for dirt patches as (height, width).
const DIRT_PATCH_SIZES: [(i32, i32); 5] = [(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)];

/// Feature density multiplier for hard difficulty on non-crowded presets.
const HARD_STRUCTURE_FACTOR: f32 = 0.6;

/// Result of generation: the grid, its spawn structures and the altar.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub grid: WorldGrid,
    pub structures: Structures,
    pub altar: Altar,
}

/// Per-pass instance counts after difficulty scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCounts {
    pub lakes: u32,
    pub trees: u32,
    pub houses: u32,
    pub rock_veins: u32,
    pub big_trees: u32,
    pub dirt_patches: u32,
}

impl FeatureCounts {
    pub fn for_settings(preset: WorldPreset, difficulty: Difficulty) -> Self {
        let crowded = preset == WorldPreset::Crowded;
        if preset == WorldPreset::Free {
            return Self {
                lakes: 0,
                trees: 0,
                houses: 0,
                rock_veins: 0,
                big_trees: 0,
                dirt_patches: 0,
            };
        }
        let factor = if difficulty.is_hard() && !crowded {
            HARD_STRUCTURE_FACTOR
        } else {
            1.0
        };
        let scaled = |normal: u32, dense: u32| {
            let base = if crowded { dense } else { normal };
            (base as f32 * factor) as u32
        };
        Self {
            lakes: scaled(30, 60),
            trees: scaled(140, 250),
            houses: scaled(28, 55),
            rock_veins: scaled(85, 150),
            big_trees: scaled(42, 80),
            dirt_patches: scaled(130, 220),
        }
    }
}

/// Propose candidates until one is clear, then stamp it.
///
/// `propose` returns a footprint (with padding) and a payload handed to
/// `stamp`. Returns false when every attempt was blocked.
pub fn place_with_retry<R, T, P, S>(
    grid: &mut WorldGrid,
    rng: &mut R,
    attempts: u32,
    mut propose: P,
    stamp: S,
) -> bool
where
    R: Rng + ?Sized,
    P: FnMut(&mut R) -> (Footprint, T),
    S: FnOnce(&mut WorldGrid, &mut R, T),
{
    for _ in 0..attempts {
        let (footprint, payload) = propose(rng);
        if grid.area_is_clear(&footprint) {
            stamp(grid, rng, payload);
            return true;
        }
    }
    false
}

/// Inclusive range draw that tolerates an empty range on tiny grids.
fn between<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// Procedural generator for one preset and difficulty.
#[derive(Debug, Clone, Copy)]
pub struct WorldGenerator {
    preset: WorldPreset,
    difficulty: Difficulty,
}

impl WorldGenerator {
    pub fn new(preset: WorldPreset, difficulty: Difficulty) -> Self {
        Self { preset, difficulty }
    }

    fn crowded(&self) -> bool {
        self.preset == WorldPreset::Crowded
    }

    /// Padding for the 4x4 and larger features.
    fn structure_pad(&self) -> i32 {
        if self.crowded() {
            1
        } else {
            2
        }
    }

    /// Populate a fresh grid.
    pub fn generate<R: Rng + ?Sized>(&self, rows: u32, cols: u32, rng: &mut R) -> GeneratedWorld {
        let mut grid = WorldGrid::new(rows, cols);
        let counts = FeatureCounts::for_settings(self.preset, self.difficulty);
        let rows = rows as i32;
        let cols = cols as i32;
        let pad = self.structure_pad();
        let mut skipped = 0u32;

        for _ in 0..counts.lakes {
            let placed = place_with_retry(
                &mut grid,
                rng,
                80,
                |rng| {
                    let size = rng.gen_range(3..=5);
                    let row = between(rng, 1, rows - size - 2);
                    let col = between(rng, 1, cols - size - 2);
                    (Footprint::new(row, col, size, size, 2), (row, col, size))
                },
                |grid, _, (row, col, size)| grid.fill_rect(row, col, size, size, Tile::Water),
            );
            skipped += u32::from(!placed);
        }

        let tree_attempts = if self.crowded() { 200 } else { 120 };
        for _ in 0..counts.trees {
            let placed = place_with_retry(
                &mut grid,
                rng,
                tree_attempts,
                |rng| {
                    let row = between(rng, 2, rows - 3);
                    let col = between(rng, 2, cols - 3);
                    (Footprint::new(row - 1, col - 1, 3, 3, 2), (row, col))
                },
                |grid, _, (row, col)| stamp_small_tree(grid, row, col),
            );
            skipped += u32::from(!placed);
        }

        for _ in 0..counts.houses {
            let placed = place_with_retry(
                &mut grid,
                rng,
                140,
                |rng| {
                    let top = between(rng, 2, rows - 6);
                    let left = between(rng, 2, cols - 6);
                    (Footprint::new(top, left, 4, 4, pad), (top, left))
                },
                |grid, _, (top, left)| stamp_house(grid, top, left),
            );
            skipped += u32::from(!placed);
        }

        for _ in 0..counts.rock_veins {
            let placed = place_with_retry(
                &mut grid,
                rng,
                140,
                |rng| {
                    let top = between(rng, 2, rows - 6);
                    let left = between(rng, 2, cols - 6);
                    (Footprint::new(top, left, 4, 4, pad), (top, left))
                },
                |grid, rng, (top, left)| stamp_rock_vein(grid, rng, top, left),
            );
            skipped += u32::from(!placed);
        }

        for _ in 0..counts.big_trees {
            let placed = place_with_retry(
                &mut grid,
                rng,
                160,
                |rng| {
                    let row = between(rng, 3, rows - 5);
                    let col = between(rng, 3, cols - 5);
                    (Footprint::new(row - 2, col - 2, 6, 6, pad), (row, col))
                },
                |grid, _, (row, col)| stamp_big_tree(grid, row, col),
            );
            skipped += u32::from(!placed);
        }

        for _ in 0..counts.dirt_patches {
            let placed = place_with_retry(
                &mut grid,
                rng,
                120,
                |rng| {
                    let (h, w) = *DIRT_PATCH_SIZES.choose(rng).unwrap_or(&(2, 2));
                    let top = between(rng, 2, rows - h - 3);
                    let left = between(rng, 2, cols - w - 3);
                    (Footprint::new(top, left, h, w, pad), (top, left, h, w))
                },
                |grid, _, (top, left, h, w)| grid.fill_rect(top, left, h, w, Tile::Dirt),
            );
            skipped += u32::from(!placed);
        }

        if skipped > 0 {
            log::debug!("world generation skipped {skipped} feature instances");
        }

        let altar_pos = tile(between(rng, 10, rows - 11), between(rng, 10, cols - 11));
        stamp_altar(&mut grid, altar_pos);
        log::info!(
            "altar core at row {} col {}",
            altar_pos.y,
            altar_pos.x
        );

        let structures = Structures::detect(&grid);
        log::info!(
            "generated {}x{} world ({:?}, {:?}): {} dirt patches, {} houses",
            rows,
            cols,
            self.preset,
            self.difficulty,
            structures.dirt_patches.len(),
            structures.houses.len()
        );

        GeneratedWorld {
            grid,
            structures,
            altar: Altar {
                position: altar_pos,
                broken: false,
            },
        }
    }
}

/// Wood center with leaves on the four sides.
fn stamp_small_tree(grid: &mut WorldGrid, row: i32, col: i32) {
    grid.set(tile(row, col), Tile::Wood);
    grid.set(tile(row - 1, col), Tile::Leaves);
    grid.set(tile(row + 1, col), Tile::Leaves);
    grid.set(tile(row, col - 1), Tile::Leaves);
    grid.set(tile(row, col + 1), Tile::Leaves);
}

/// 4x4 brick shell with a 2x2 wood interior.
pub fn stamp_house(grid: &mut WorldGrid, top: i32, left: i32) {
    grid.fill_rect(top, left, 4, 4, Tile::Brick);
    grid.fill_rect(top + 1, left + 1, 2, 2, Tile::Wood);
}

/// Between 6 and 12 random stones inside a 4x4 box.
fn stamp_rock_vein<R: Rng + ?Sized>(grid: &mut WorldGrid, rng: &mut R, top: i32, left: i32) {
    let n = rng.gen_range(6..=12);
    let mut cells: Vec<TileCoord> = (0..4)
        .flat_map(|r| (0..4).map(move |c| tile(top + r, left + c)))
        .collect();
    cells.shuffle(rng);
    for t in cells.into_iter().take(n) {
        grid.set(t, Tile::Stone);
    }
}

/// 2x2 trunk at (row, col), a leaf ring around it and a 2x2 leaf arm on
/// each side.
fn stamp_big_tree(grid: &mut WorldGrid, row: i32, col: i32) {
    grid.fill_rect(row - 1, col - 1, 4, 4, Tile::Leaves);
    grid.fill_rect(row, col, 2, 2, Tile::Wood);
    grid.fill_rect(row - 2, col, 2, 2, Tile::Leaves);
    grid.fill_rect(row + 2, col, 2, 2, Tile::Leaves);
    grid.fill_rect(row, col - 2, 2, 2, Tile::Leaves);
    grid.fill_rect(row, col + 2, 2, 2, Tile::Leaves);
}

/// Clear 7x7 to grass, then a 5x5 brick outline, a 3x3 stone ring and the core.
fn stamp_altar(grid: &mut WorldGrid, center: TileCoord) {
    let (r, c) = (center.y, center.x);
    grid.fill_rect(r - 3, c - 3, 7, 7, Tile::Grass);
    grid.fill_rect(r - 2, c - 2, 5, 5, Tile::Brick);
    grid.fill_rect(r - 1, c - 1, 3, 3, Tile::Stone);
    grid.set(center, Tile::Core);
}
