//! Single source of truth for default tunables.
//! Every value here can be overridden through `SimConfig`; the simulation
//! reads the config, never these constants directly.

/// Side length of one tile in world pixels.
pub const TILE_SIZE: u32 = 32;

/// Visible tiles horizontally at the base resolution.
pub const VIEW_COLS: u32 = 25;

/// Visible tiles vertically at the base resolution.
pub const VIEW_ROWS: u32 = 15;

/// World size as a multiple of the view.
pub const WORLD_MULTIPLIER: u32 = 30;

/// Grid columns (750).
pub const WORLD_COLS: u32 = VIEW_COLS * WORLD_MULTIPLIER;

/// Grid rows (450).
pub const WORLD_ROWS: u32 = VIEW_ROWS * WORLD_MULTIPLIER;

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Side length of a visibility chunk in tiles.
pub const CHUNK_SIZE_TILES: u32 = 16;

/// Extra tiles marked seen around the camera rectangle.
pub const VISIBILITY_MARGIN_TILES: u32 = 2;

/// Player movement per tick in pixels.
pub const PLAYER_SPEED: f32 = 4.0;

/// Player collision box side in pixels.
pub const PLAYER_HITBOX: f32 = 24.0;

/// Player health ceiling.
pub const MAX_HEALTH: f32 = 10.0;

/// Agent collision box side in pixels.
pub const AGENT_HITBOX: f32 = 20.0;

/// Hard cap on live agents.
pub const MAX_AGENTS: usize = 35;

/// Agent hit points on normal difficulty.
pub const AGENT_HP_NORMAL: i32 = 3;

/// Agent hit points on hard difficulty.
pub const AGENT_HP_HARD: i32 = 5;

/// Agent speed as a fraction of player speed, normal difficulty.
pub const AGENT_SPEED_FACTOR_NORMAL: f32 = 0.75;

/// Agent speed as a fraction of player speed, hard difficulty.
pub const AGENT_SPEED_FACTOR_HARD: f32 = 0.90;

/// Ticks an agent waits between contact hits.
pub const AGENT_DAMAGE_COOLDOWN: u32 = 60;

/// Center distance (pixels) under which an agent hits the player.
pub const AGENT_MELEE_RANGE: f32 = 20.0;

/// Radius (pixels) around the attack point in which the player hits an agent.
pub const PLAYER_ATTACK_RADIUS: f32 = 24.0;

/// Contact damage multiplier on hard difficulty.
pub const HARD_DAMAGE_MULT: f32 = 1.5;

/// Spawn probability per dirt patch evaluation, normal difficulty.
pub const DIRT_SPAWN_CHANCE_NORMAL: f32 = 0.20;

/// Spawn probability per dirt patch evaluation, hard difficulty.
pub const DIRT_SPAWN_CHANCE_HARD: f32 = 0.25;

/// Spawn probability per house evaluation, normal difficulty.
pub const HOUSE_SPAWN_CHANCE_NORMAL: f32 = 0.10;

/// Spawn probability per house evaluation, hard difficulty.
pub const HOUSE_SPAWN_CHANCE_HARD: f32 = 0.25;

/// Ticks between two evaluations of the same house (10 s).
pub const HOUSE_SPAWN_COOLDOWN: u64 = 10 * TICKS_PER_SECOND as u64;

/// Spawn evaluation runs on ticks divisible by this.
pub const SPAWN_CHECK_INTERVAL: u64 = 20;

/// Half-width of the path-field window in tiles.
pub const PATH_RADIUS_TILES: i32 = 28;

/// Path field is rebuilt on ticks divisible by this.
pub const PATH_REBUILD_INTERVAL: u64 = 8;

/// Ticks to mine an ordinary tile.
pub const MINE_TICKS: u32 = 45;

/// Ticks to mine the altar core.
pub const CORE_MINE_TICKS: u32 = 600;

/// Center distance (pixels) at which dropped items are collected.
pub const PICKUP_RADIUS: f32 = 22.0;

/// Length of the day phase in ticks.
pub const DAY_TICKS: u32 = 3600;

/// Length of the night phase in ticks.
pub const NIGHT_TICKS: u32 = 3600;

/// Blood moon probability at dusk, normal difficulty.
pub const BLOOD_MOON_CHANCE_NORMAL: f32 = 0.25;

/// Blood moon probability at dusk, hard difficulty.
pub const BLOOD_MOON_CHANCE_HARD: f32 = 0.30;

/// Contact damage multiplier during a blood moon.
pub const BLOOD_MOON_DAMAGE_MULT: f32 = 1.5;

/// Agent speed multiplier during a blood moon.
pub const BLOOD_MOON_SPEED_MULT: f32 = 1.25;

/// Agent speed multiplier once the altar is broken.
pub const ALTAR_BROKEN_SPEED_MULT: f32 = 1.05;

/// Full-simulation pause after the core is mined.
pub const ALTAR_BROKEN_PAUSE_TICKS: u32 = 300;

/// Ticks without damage before passive healing starts.
pub const HEAL_DELAY_TICKS: u32 = 240;

/// Ticks between passive heal steps.
pub const HEAL_INTERVAL_TICKS: u32 = 120;

/// Health restored per heal step.
pub const HEAL_AMOUNT: f32 = 1.0;

/// Invulnerability after (re)spawning, 3.5 s.
pub const RESPAWN_INVULN_TICKS: u32 = 210;

/// Ring radius (tiles) searched for a safe spawn.
pub const SAFE_SPAWN_RADIUS: i32 = 20;

/// Seed used when the config does not provide one.
pub const DEFAULT_SEED: u64 = 0x5EED_B10C;
