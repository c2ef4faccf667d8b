use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Tile coordinate in grid space: `x` is the column, `y` is the row.
pub type TileCoord = IVec2;

/// Visibility chunk coordinate (each unit = CHUNK_SIZE_TILES tiles).
pub type ChunkCoord = IVec2;

/// Build a tile coordinate from (row, col) order.
pub fn tile(row: i32, col: i32) -> TileCoord {
    IVec2::new(col, row)
}

/// Game difficulty. Scales agent stats, spawn odds and generation density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn is_hard(self) -> bool {
        self == Difficulty::Hard
    }
}

/// World generation density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorldPreset {
    /// Open grass with only the altar.
    Free,
    #[default]
    Normal,
    /// Roughly double the features, tighter padding.
    Crowded,
}

/// Creative sessions have unlimited placement and no hostiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    Creative,
    #[default]
    Survival,
}

/// Dominant axis of the player's most recent movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    /// Dominant axis of a movement vector. Ties go to X.
    pub fn dominant(dx: f32, dy: f32) -> Axis {
        if dx.abs() >= dy.abs() {
            Axis::X
        } else {
            Axis::Y
        }
    }
}
