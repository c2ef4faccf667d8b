//! Shared fixtures for simulation tests.
//!
//! Random draws are injected with `rand::rngs::mock::StepRng`, whose `u32`
//! output is the low half of its state. `gen::<f32>()` keeps the top 24 bits
//! of that word, so the constants in [`draws`] pin a known float.

use blockworld_core::config::SimConfig;
use blockworld_core::types::{tile, Difficulty, GameMode, WorldPreset};
use blockworld_world::{Altar, GeneratedWorld, Structures, WorldGrid};

use crate::session::Session;

/// Step values that make `StepRng` yield a fixed `f32` on every draw.
pub mod draws {
    /// Draws just under 0.10.
    pub const TEN_PERCENT: u64 = 429_496_576;
    /// Draws just under 0.90.
    pub const NINETY_PERCENT: u64 = 3_865_470_464;
}

/// Defaults on a small world so generation stays fast in tests.
pub fn small_config() -> SimConfig {
    SimConfig {
        world_rows: 40,
        world_cols: 60,
        ..SimConfig::default()
    }
}

/// Wrap a hand-built grid as a generated world. The altar sits at (5, 5)
/// whether or not a core tile is there.
pub fn world_from_grid(grid: WorldGrid) -> GeneratedWorld {
    GeneratedWorld {
        structures: Structures::detect(&grid),
        grid,
        altar: Altar {
            position: tile(5, 5),
            broken: false,
        },
    }
}

/// Session of the given mode on a hand-built grid.
pub fn session_on(grid: WorldGrid, difficulty: Difficulty, mode: GameMode) -> Session {
    match Session::from_world(small_config(), world_from_grid(grid), difficulty, mode) {
        Ok(session) => session,
        Err(e) => panic!("small config rejected: {e}"),
    }
}

/// Survival session on a featureless grass world with the player at the
/// center of tile (20, 30).
pub fn open_session(difficulty: Difficulty) -> Session {
    let config = small_config();
    let grid = WorldGrid::new(config.world_rows, config.world_cols);
    session_on(grid, difficulty, GameMode::Survival)
}

/// Survival session on a generated world.
pub fn generated_session(preset: WorldPreset, difficulty: Difficulty) -> Session {
    match Session::new(small_config(), preset, difficulty, GameMode::Survival) {
        Ok(session) => session,
        Err(e) => panic!("small config rejected: {e}"),
    }
}
