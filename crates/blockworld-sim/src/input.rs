use blockworld_core::types::TileCoord;
use glam::Vec2;

use crate::economy::Tool;

/// Discrete player commands collected since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Mouse pressed on a world tile.
    StartMine,
    /// Mouse released.
    StopMine,
    /// Put the selected tool down at the cursor tile.
    Place,
    /// Melee swing at a world-space point.
    MeleeAttack(Vec2),
    /// Pick a toolbar slot by index. Out-of-range slots are ignored.
    SelectSlot(usize),
    SelectTool(Tool),
}

/// Everything the simulation reads from the input layer for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Normalized movement intent, zero when idle.
    pub movement: Vec2,
    /// World tile under the cursor, if the cursor is over the world.
    pub cursor_tile: Option<TileCoord>,
    /// An overlay (menu, inventory) is open and the world is paused.
    pub overlay_open: bool,
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Movement only.
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    /// Cursor on `tile` with the given actions.
    pub fn at_cursor(tile: TileCoord, actions: Vec<Action>) -> Self {
        Self {
            cursor_tile: Some(tile),
            actions,
            ..Self::default()
        }
    }
}
