//! Structure-driven agent spawning.
//!
//! Dirt patches roll once per session, the first time they are seen. Houses
//! roll on a cooldown for as long as their interior is intact. Nothing spawns
//! in chunks the camera has never covered.

use blockworld_core::config::SimConfig;
use blockworld_core::math::tile_center;
use blockworld_core::types::{Difficulty, TileCoord};
use blockworld_world::{Structures, VisibilityTracker, WorldGrid};
use rand::Rng;

use crate::agents::{Agent, AgentController};

/// Read-only world state a spawn pass needs.
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub grid: &'a WorldGrid,
    pub structures: &'a Structures,
    pub visibility: &'a VisibilityTracker,
    pub config: &'a SimConfig,
    pub difficulty: Difficulty,
    pub tick: u64,
    /// House spawning is suspended while this is set.
    pub blood_moon_active: bool,
}

/// Place one agent at a tile center.
///
/// Fails without side effects when the cap is reached, the tile blocks
/// movement, or the agent's hitbox would overlap a blocking tile.
pub fn spawn_at_tile(
    agents: &mut AgentController,
    grid: &WorldGrid,
    tile: TileCoord,
    config: &SimConfig,
    difficulty: Difficulty,
) -> bool {
    if agents.len() >= config.max_agents || grid.blocks_movement(tile) {
        return false;
    }
    let center = tile_center(tile, config.tile_size);
    if grid.hitbox_blocked(center, config.agent_hitbox, config.tile_size) {
        return false;
    }
    agents.push(Agent::new(center, config.agent_hp(difficulty)));
    log::debug!("agent spawned at row {} col {}", tile.y, tile.x);
    true
}

/// Per-structure spawn bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnController {
    /// Indexed like `Structures::dirt_patches`.
    dirt_evaluated: Vec<bool>,
    /// Earliest tick each house may roll again, indexed like `Structures::houses`.
    house_next_tick: Vec<u64>,
}

impl SpawnController {
    pub fn new(structures: &Structures) -> Self {
        Self {
            dirt_evaluated: vec![false; structures.dirt_patches.len()],
            house_next_tick: vec![0; structures.houses.len()],
        }
    }

    /// One spawn evaluation pass. Returns how many agents were placed.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        ctx: &SpawnContext<'_>,
        agents: &mut AgentController,
        rng: &mut R,
    ) -> usize {
        let mut spawned = 0;

        let dirt_chance = ctx.config.dirt_spawn_chance(ctx.difficulty);
        for (patch, evaluated) in ctx
            .structures
            .dirt_patches
            .iter()
            .zip(self.dirt_evaluated.iter_mut())
        {
            if *evaluated || !ctx.visibility.is_seen(patch.anchor) {
                continue;
            }
            *evaluated = true;
            if rng.gen::<f32>() < dirt_chance
                && spawn_at_tile(agents, ctx.grid, patch.anchor, ctx.config, ctx.difficulty)
            {
                spawned += 1;
            }
        }

        if ctx.blood_moon_active {
            return spawned;
        }

        let house_chance = ctx.config.house_spawn_chance(ctx.difficulty);
        for (house, next_tick) in ctx
            .structures
            .houses
            .iter()
            .zip(self.house_next_tick.iter_mut())
        {
            if !ctx.visibility.is_seen(house.anchor)
                || !house.is_active(ctx.grid)
                || ctx.tick < *next_tick
            {
                continue;
            }
            *next_tick = ctx.tick + ctx.config.house_spawn_cooldown;
            if rng.gen::<f32>() < house_chance
                && spawn_at_tile(agents, ctx.grid, house.anchor, ctx.config, ctx.difficulty)
            {
                spawned += 1;
            }
        }
        spawned
    }

    /// Blood-moon surge: try every dirt anchor once, seen or not.
    pub fn force_spawn_patches(
        &self,
        ctx: &SpawnContext<'_>,
        agents: &mut AgentController,
    ) -> usize {
        let mut spawned = 0;
        for patch in &ctx.structures.dirt_patches {
            if spawn_at_tile(agents, ctx.grid, patch.anchor, ctx.config, ctx.difficulty) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Carry bookkeeping from `old` structures over to `new` ones, matching
    /// patches and houses by anchor. Unmatched new entries start fresh.
    /// Returns how many rolled patches or pending house cooldowns had no
    /// counterpart and were dropped.
    pub fn remap(&mut self, old: &Structures, new: &Structures) -> usize {
        if old == new {
            return 0;
        }
        let mut lost = 0;

        let mut dirt_evaluated = vec![false; new.dirt_patches.len()];
        for (patch, &evaluated) in old.dirt_patches.iter().zip(&self.dirt_evaluated) {
            if !evaluated {
                continue;
            }
            match new.dirt_patches.iter().position(|p| p.anchor == patch.anchor) {
                Some(i) => dirt_evaluated[i] = true,
                None => lost += 1,
            }
        }

        let mut house_next_tick = vec![0; new.houses.len()];
        for (house, &next) in old.houses.iter().zip(&self.house_next_tick) {
            if next == 0 {
                continue;
            }
            match new.houses.iter().position(|h| h.anchor == house.anchor) {
                Some(i) => house_next_tick[i] = next,
                None => lost += 1,
            }
        }

        self.dirt_evaluated = dirt_evaluated;
        self.house_next_tick = house_next_tick;
        lost
    }

    pub fn dirt_evaluated(&self) -> &[bool] {
        &self.dirt_evaluated
    }

    pub fn house_next_ticks(&self) -> &[u64] {
        &self.house_next_tick
    }

    /// Mark the listed patch indices as already rolled. Out-of-range indices
    /// are ignored; returns how many were.
    pub fn restore_dirt_evaluated(&mut self, indices: &[usize]) -> usize {
        self.dirt_evaluated.iter_mut().for_each(|e| *e = false);
        let mut ignored = 0;
        for &i in indices {
            match self.dirt_evaluated.get_mut(i) {
                Some(e) => *e = true,
                None => ignored += 1,
            }
        }
        ignored
    }

    /// Replace house cooldowns. Rejected unless the length matches.
    pub fn restore_house_next_ticks(&mut self, ticks: Vec<u64>) -> bool {
        if ticks.len() != self.house_next_tick.len() {
            return false;
        }
        self.house_next_tick = ticks;
        true
    }

    /// Indices of patches that already rolled.
    pub fn evaluated_indices(&self) -> Vec<usize> {
        self.dirt_evaluated
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.then_some(i))
            .collect()
    }
}
