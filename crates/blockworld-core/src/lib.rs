//! Shared vocabulary for the block world: tile palette, coordinates,
//! tunables and their config loader.

pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod tile;
pub mod types;

pub use config::SimConfig;
pub use tile::Tile;
pub use types::{ChunkCoord, Difficulty, GameMode, TileCoord, WorldPreset};
