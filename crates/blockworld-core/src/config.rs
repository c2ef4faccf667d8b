//! Tunable simulation parameters.
//!
//! Every field defaults to the value in [`crate::constants`]; a RON document
//! only needs to name the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::Difficulty;

/// Smallest grid side that fits the altar with its anchor margin.
pub const MIN_WORLD_SIDE: u32 = 22;

/// Complete parameter set for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,

    // Grid and view
    pub world_rows: u32,
    pub world_cols: u32,
    pub tile_size: u32,
    pub view_cols: u32,
    pub view_rows: u32,
    pub chunk_size: u32,
    pub visibility_margin: u32,

    // Player
    pub player_speed: f32,
    pub player_hitbox: f32,
    pub max_health: f32,
    pub respawn_invuln_ticks: u32,
    pub heal_delay_ticks: u32,
    pub heal_interval_ticks: u32,
    pub heal_amount: f32,
    pub attack_radius: f32,
    pub safe_spawn_radius: i32,

    // Agents
    pub agent_hitbox: f32,
    pub max_agents: usize,
    pub agent_hp_normal: i32,
    pub agent_hp_hard: i32,
    pub agent_speed_normal: f32,
    pub agent_speed_hard: f32,
    pub agent_damage_cooldown: u32,
    pub melee_range: f32,
    pub hard_damage_mult: f32,

    // Spawning
    pub dirt_spawn_chance_normal: f32,
    pub dirt_spawn_chance_hard: f32,
    pub house_spawn_chance_normal: f32,
    pub house_spawn_chance_hard: f32,
    pub house_spawn_cooldown: u64,
    pub spawn_check_interval: u64,

    // Pathing
    pub path_radius: i32,
    pub path_rebuild_interval: u64,

    // Economy
    pub mine_ticks: u32,
    pub core_mine_ticks: u32,
    pub pickup_radius: f32,

    // Day/night
    pub day_ticks: u32,
    pub night_ticks: u32,
    pub blood_moon_chance_normal: f32,
    pub blood_moon_chance_hard: f32,
    pub blood_moon_damage_mult: f32,
    pub blood_moon_speed_mult: f32,

    // Altar
    pub altar_speed_mult: f32,
    pub altar_pause_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            world_rows: WORLD_ROWS,
            world_cols: WORLD_COLS,
            tile_size: TILE_SIZE,
            view_cols: VIEW_COLS,
            view_rows: VIEW_ROWS,
            chunk_size: CHUNK_SIZE_TILES,
            visibility_margin: VISIBILITY_MARGIN_TILES,
            player_speed: PLAYER_SPEED,
            player_hitbox: PLAYER_HITBOX,
            max_health: MAX_HEALTH,
            respawn_invuln_ticks: RESPAWN_INVULN_TICKS,
            heal_delay_ticks: HEAL_DELAY_TICKS,
            heal_interval_ticks: HEAL_INTERVAL_TICKS,
            heal_amount: HEAL_AMOUNT,
            attack_radius: PLAYER_ATTACK_RADIUS,
            safe_spawn_radius: SAFE_SPAWN_RADIUS,
            agent_hitbox: AGENT_HITBOX,
            max_agents: MAX_AGENTS,
            agent_hp_normal: AGENT_HP_NORMAL,
            agent_hp_hard: AGENT_HP_HARD,
            agent_speed_normal: AGENT_SPEED_FACTOR_NORMAL,
            agent_speed_hard: AGENT_SPEED_FACTOR_HARD,
            agent_damage_cooldown: AGENT_DAMAGE_COOLDOWN,
            melee_range: AGENT_MELEE_RANGE,
            hard_damage_mult: HARD_DAMAGE_MULT,
            dirt_spawn_chance_normal: DIRT_SPAWN_CHANCE_NORMAL,
            dirt_spawn_chance_hard: DIRT_SPAWN_CHANCE_HARD,
            house_spawn_chance_normal: HOUSE_SPAWN_CHANCE_NORMAL,
            house_spawn_chance_hard: HOUSE_SPAWN_CHANCE_HARD,
            house_spawn_cooldown: HOUSE_SPAWN_COOLDOWN,
            spawn_check_interval: SPAWN_CHECK_INTERVAL,
            path_radius: PATH_RADIUS_TILES,
            path_rebuild_interval: PATH_REBUILD_INTERVAL,
            mine_ticks: MINE_TICKS,
            core_mine_ticks: CORE_MINE_TICKS,
            pickup_radius: PICKUP_RADIUS,
            day_ticks: DAY_TICKS,
            night_ticks: NIGHT_TICKS,
            blood_moon_chance_normal: BLOOD_MOON_CHANCE_NORMAL,
            blood_moon_chance_hard: BLOOD_MOON_CHANCE_HARD,
            blood_moon_damage_mult: BLOOD_MOON_DAMAGE_MULT,
            blood_moon_speed_mult: BLOOD_MOON_SPEED_MULT,
            altar_speed_mult: ALTAR_BROKEN_SPEED_MULT,
            altar_pause_ticks: ALTAR_BROKEN_PAUSE_TICKS,
        }
    }
}

impl SimConfig {
    /// Parse a RON document and validate it.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: SimConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter sets the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_rows < MIN_WORLD_SIDE || self.world_cols < MIN_WORLD_SIDE {
            return Err(ConfigError::WorldTooSmall {
                rows: self.world_rows,
                cols: self.world_cols,
                min: MIN_WORLD_SIDE,
            });
        }
        let positive = [
            ("tile_size", self.tile_size as f32),
            ("chunk_size", self.chunk_size as f32),
            ("day_ticks", self.day_ticks as f32),
            ("night_ticks", self.night_ticks as f32),
            ("spawn_check_interval", self.spawn_check_interval as f32),
            ("path_rebuild_interval", self.path_rebuild_interval as f32),
            ("heal_interval_ticks", self.heal_interval_ticks as f32),
            ("max_health", self.max_health),
            ("mine_ticks", self.mine_ticks as f32),
            ("core_mine_ticks", self.core_mine_ticks as f32),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        let chances = [
            ("dirt_spawn_chance_normal", self.dirt_spawn_chance_normal),
            ("dirt_spawn_chance_hard", self.dirt_spawn_chance_hard),
            ("house_spawn_chance_normal", self.house_spawn_chance_normal),
            ("house_spawn_chance_hard", self.house_spawn_chance_hard),
            ("blood_moon_chance_normal", self.blood_moon_chance_normal),
            ("blood_moon_chance_hard", self.blood_moon_chance_hard),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BadProbability { field, value });
            }
        }
        Ok(())
    }

    /// Hit points of a freshly spawned agent.
    pub fn agent_hp(&self, difficulty: Difficulty) -> i32 {
        match difficulty {
            Difficulty::Normal => self.agent_hp_normal,
            Difficulty::Hard => self.agent_hp_hard,
        }
    }

    /// Agent speed as a fraction of player speed.
    pub fn agent_speed_factor(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Normal => self.agent_speed_normal,
            Difficulty::Hard => self.agent_speed_hard,
        }
    }

    pub fn damage_mult(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => self.hard_damage_mult,
        }
    }

    pub fn dirt_spawn_chance(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Normal => self.dirt_spawn_chance_normal,
            Difficulty::Hard => self.dirt_spawn_chance_hard,
        }
    }

    pub fn house_spawn_chance(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Normal => self.house_spawn_chance_normal,
            Difficulty::Hard => self.house_spawn_chance_hard,
        }
    }

    pub fn blood_moon_chance(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Normal => self.blood_moon_chance_normal,
            Difficulty::Hard => self.blood_moon_chance_hard,
        }
    }

    /// World size in pixels as (width, height).
    pub fn world_pixels(&self) -> (f32, f32) {
        (
            (self.world_cols * self.tile_size) as f32,
            (self.world_rows * self.tile_size) as f32,
        )
    }

    /// Camera view size in pixels as (width, height).
    pub fn view_pixels(&self) -> (f32, f32) {
        (
            (self.view_cols * self.tile_size) as f32,
            (self.view_rows * self.tile_size) as f32,
        )
    }

    /// Length of a full day plus night.
    pub fn cycle_ticks(&self) -> u32 {
        self.day_ticks + self.night_ticks
    }
}
