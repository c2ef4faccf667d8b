use blockworld_core::math::{hitbox_corners, pixel_to_tile};
use blockworld_core::tile::Tile;
use blockworld_core::types::TileCoord;
use glam::Vec2;

/// Rectangle of tiles with a clearance band, used by generation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub top: i32,
    pub left: i32,
    pub height: i32,
    pub width: i32,
    /// Extra ring of tiles that must also be clear.
    pub pad: i32,
}

impl Footprint {
    pub fn new(top: i32, left: i32, height: i32, width: i32, pad: i32) -> Self {
        Self {
            top,
            left,
            height,
            width,
            pad,
        }
    }

    /// Every tile of the padded rectangle, row-major.
    pub fn padded_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let rows = (self.top - self.pad)..(self.top + self.height + self.pad);
        rows.flat_map(move |r| {
            ((self.left - self.pad)..(self.left + self.width + self.pad))
                .map(move |c| TileCoord::new(c, r))
        })
    }
}

/// Fixed-size row-major tile store. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    rows: u32,
    cols: u32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// All-grass grid.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self::filled(rows, cols, Tile::Grass)
    }

    pub fn filled(rows: u32, cols: u32, tile: Tile) -> Self {
        Self {
            rows,
            cols,
            tiles: vec![tile; rows as usize * cols as usize],
        }
    }

    /// Rebuild from stored tiles. Returns None when the length does not match.
    pub fn from_tiles(rows: u32, cols: u32, tiles: Vec<Tile>) -> Option<Self> {
        if tiles.len() != rows as usize * cols as usize {
            return None;
        }
        Some(Self { rows, cols, tiles })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Row-major tile slice.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.cols && (tile.y as u32) < self.rows
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if self.in_bounds(tile) {
            Some(tile.y as usize * self.cols as usize + tile.x as usize)
        } else {
            None
        }
    }

    /// Tile at a coordinate, `Tile::Void` outside the grid.
    pub fn get(&self, tile: TileCoord) -> Tile {
        self.index(tile).map_or(Tile::Void, |i| self.tiles[i])
    }

    /// Write a tile. Out-of-bounds writes are rejected and return false.
    pub fn set(&mut self, tile: TileCoord, value: Tile) -> bool {
        match self.index(tile) {
            Some(i) => {
                self.tiles[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, tile: TileCoord) -> bool {
        self.get(tile).is_walkable()
    }

    /// Solid or outside the grid.
    pub fn blocks_movement(&self, tile: TileCoord) -> bool {
        self.get(tile).blocks_movement()
    }

    /// Whether the tile under a world-space pixel blocks movement.
    pub fn blocks_at_pixel(&self, pos: Vec2, tile_size: u32) -> bool {
        self.blocks_movement(pixel_to_tile(pos, tile_size))
    }

    /// Whether a square hitbox centered at `center` overlaps a blocking tile.
    pub fn hitbox_blocked(&self, center: Vec2, size: f32, tile_size: u32) -> bool {
        hitbox_corners(center, size)
            .iter()
            .any(|corner| self.blocks_at_pixel(*corner, tile_size))
    }

    /// The padded footprint lies inside the grid and is all grass.
    pub fn area_is_clear(&self, footprint: &Footprint) -> bool {
        footprint
            .padded_tiles()
            .all(|t| self.in_bounds(t) && self.get(t) == Tile::Grass)
    }

    /// Fill a rectangle, clipping at the grid edge.
    pub fn fill_rect(&mut self, top: i32, left: i32, height: i32, width: i32, value: Tile) {
        for r in top..top + height {
            for c in left..left + width {
                self.set(TileCoord::new(c, r), value);
            }
        }
    }

    /// Number of tiles of one kind.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}
