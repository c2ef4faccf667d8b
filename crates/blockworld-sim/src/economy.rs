//! Mining, placement, dropped items and the inventory.

use blockworld_core::config::SimConfig;
use blockworld_core::direction::ORTHOGONAL;
use blockworld_core::math::tile_center;
use blockworld_core::tile::{Tile, ALL_TILES, TILE_COUNT};
use blockworld_core::types::{GameMode, TileCoord};
use blockworld_world::{Altar, WorldGrid};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Counts of collected tiles, indexed by palette id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; TILE_COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, tile: Tile) -> u32 {
        self.counts[tile as usize]
    }

    pub fn add(&mut self, tile: Tile, n: u32) {
        let slot = &mut self.counts[tile as usize];
        *slot = slot.saturating_add(n);
    }

    /// Remove one unit. Returns false when there is none.
    pub fn take_one(&mut self, tile: Tile) -> bool {
        let slot = &mut self.counts[tile as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Death penalty: every count halves, rounding down.
    pub fn halve(&mut self) {
        for c in &mut self.counts {
            *c /= 2;
        }
    }

    /// Non-empty stacks in palette order.
    pub fn stacks(&self) -> impl Iterator<Item = (Tile, u32)> + '_ {
        ALL_TILES
            .iter()
            .map(|t| (*t, self.counts[*t as usize]))
            .filter(|(_, n)| *n > 0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// A mined tile waiting on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    pub tile: Tile,
    pub pos: Vec2,
}

/// What the player puts down with a world click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Place(Tile),
    /// Creative only: reset to grass.
    Erase,
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Place(Tile::Grass)
    }
}

/// Why a placement did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceRejected {
    OutOfBounds,
    /// The selected tile cannot be placed (void).
    NotPlaceable,
    /// Survival placement needs a grass target.
    Occupied,
    OutOfStock,
    /// Erasing is a creative tool.
    EraseInSurvival,
}

/// A finished dig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineOutcome {
    pub tile: TileCoord,
    pub mined: Tile,
    /// This dig broke the altar.
    pub broke_altar: bool,
}

/// Tile being dug and ticks spent on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningState {
    pub target: Option<TileCoord>,
    pub progress: u32,
}

impl MiningState {
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    fn reset(&mut self) {
        self.target = None;
        self.progress = 0;
    }
}

/// Inventory, ground items and the mining cursor.
#[derive(Debug, Clone, Default)]
pub struct Economy {
    pub inventory: Inventory,
    pub drops: Vec<DroppedItem>,
    pub mining: MiningState,
}

impl Economy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin digging `tile` if it is mineable and has an open side to stand on.
    pub fn start_mining(&mut self, grid: &WorldGrid, tile: TileCoord) -> bool {
        let reachable = ORTHOGONAL
            .iter()
            .any(|d| grid.is_walkable(tile + d.offset()));
        if !grid.get(tile).is_mineable() || !reachable {
            return false;
        }
        self.mining = MiningState {
            target: Some(tile),
            progress: 0,
        };
        true
    }

    /// Mouse released: drop all progress.
    pub fn stop_mining(&mut self) {
        self.mining.reset();
    }

    /// Ticks needed to dig a tile.
    pub fn mine_ticks(tile: Tile, config: &SimConfig) -> u32 {
        if tile == Tile::Core {
            config.core_mine_ticks
        } else {
            config.mine_ticks
        }
    }

    /// One tick of held mining. Moving the cursor off the target or the
    /// target turning unmineable cancels the dig.
    pub fn advance_mining(
        &mut self,
        grid: &mut WorldGrid,
        cursor: Option<TileCoord>,
        altar: &mut Altar,
        config: &SimConfig,
    ) -> Option<MineOutcome> {
        let target = self.mining.target?;
        let mined = grid.get(target);
        if cursor != Some(target) || !mined.is_mineable() {
            self.mining.reset();
            return None;
        }

        self.mining.progress += 1;
        if self.mining.progress < Self::mine_ticks(mined, config) {
            return None;
        }

        self.drops.push(DroppedItem {
            tile: mined,
            pos: tile_center(target, config.tile_size),
        });
        let broke_altar = mined == Tile::Core && !altar.broken;
        if broke_altar {
            altar.broken = true;
            log::info!("altar broken");
        }
        grid.set(target, Tile::Grass);
        self.mining.reset();
        Some(MineOutcome {
            tile: target,
            mined,
            broke_altar,
        })
    }

    /// Collect every drop within `radius` of the player. Returns how many.
    pub fn pickup(&mut self, player: Vec2, radius: f32) -> usize {
        let before = self.drops.len();
        let inventory = &mut self.inventory;
        self.drops.retain(|item| {
            if item.pos.distance(player) <= radius {
                inventory.add(item.tile, 1);
                false
            } else {
                true
            }
        });
        before - self.drops.len()
    }

    /// Put the selected tool down at `target`. Returns the tile now there.
    pub fn place(
        &mut self,
        grid: &mut WorldGrid,
        target: TileCoord,
        tool: Tool,
        mode: GameMode,
    ) -> Result<Tile, PlaceRejected> {
        let current = grid.get(target);
        if current == Tile::Void {
            return Err(PlaceRejected::OutOfBounds);
        }
        let tile = match (mode, tool) {
            (GameMode::Creative, Tool::Erase) => Tile::Grass,
            (GameMode::Survival, Tool::Erase) => return Err(PlaceRejected::EraseInSurvival),
            (_, Tool::Place(t)) if !t.is_placeable() => return Err(PlaceRejected::NotPlaceable),
            (GameMode::Creative, Tool::Place(t)) => t,
            (GameMode::Survival, Tool::Place(t)) => {
                if current != Tile::Grass {
                    return Err(PlaceRejected::Occupied);
                }
                if !self.inventory.take_one(t) {
                    return Err(PlaceRejected::OutOfStock);
                }
                t
            }
        };
        grid.set(target, tile);
        Ok(tile)
    }

    /// Toolbar contents: every placeable tile plus erase in creative, owned
    /// stacks in survival.
    pub fn toolbar(&self, mode: GameMode) -> Vec<Tool> {
        match mode {
            GameMode::Creative => ALL_TILES
                .iter()
                .filter(|t| t.is_placeable())
                .map(|t| Tool::Place(*t))
                .chain(std::iter::once(Tool::Erase))
                .collect(),
            GameMode::Survival => self.inventory.stacks().map(|(t, _)| Tool::Place(t)).collect(),
        }
    }
}
