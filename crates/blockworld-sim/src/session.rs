//! The simulation context and its fixed-order tick pipeline.
//!
//! A [`Session`] owns every piece of mutable game state. Subsystems are plain
//! structs that borrow the parts they need for the duration of one call, so a
//! tick is a straight sequence of those calls:
//!
//! 0. Bump the tick counter and resolve the pause gate.
//! 1. Discrete actions (toolbar, melee, place, mine start/stop).
//! 2. Player timers, movement and item pickup.
//! 3. Visibility from the camera (also while paused).
//! 4. Spawn evaluation every `spawn_check_interval` ticks.
//! 5. Path field rebuild every `path_rebuild_interval` ticks.
//! 6. Agent movement and contact damage, then the death check.
//! 7. Day/night advance and its transition effects.
//! 8. Mining progress.
//!
//! Steps 4 to 8 run only in survival mode while unpaused.

use blockworld_core::config::SimConfig;
use blockworld_core::error::ConfigError;
use blockworld_core::tile::Tile;
use blockworld_core::types::{Difficulty, GameMode, TileCoord, WorldPreset};
use blockworld_world::{
    Altar, GeneratedWorld, Structures, VisibilityTracker, WorldGenerator, WorldGrid,
};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agents::{agent_speed, contact_damage, Agent, AgentController, AttackOutcome, StepContext};
use crate::day_night::{DayNightScheduler, PhaseTransition};
use crate::economy::{Economy, MineOutcome, Tool};
use crate::input::{Action, TickInput};
use crate::path_field::PathField;
use crate::player::{find_safe_spawn, PlayerState};
use crate::spawn::{SpawnContext, SpawnController};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub paused: bool,
    /// Agents created by spawn rolls or a blood-moon surge.
    pub spawned: usize,
    pub damage_taken: f32,
    pub died: bool,
    pub attack: Option<AttackOutcome>,
    pub placed: Option<Tile>,
    pub mined: Option<MineOutcome>,
    pub transition: Option<PhaseTransition>,
}

/// One running game.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SimConfig,
    pub(crate) mode: GameMode,
    pub(crate) difficulty: Difficulty,
    pub(crate) grid: WorldGrid,
    pub(crate) structures: Structures,
    pub(crate) altar: Altar,
    pub(crate) visibility: VisibilityTracker,
    pub(crate) spawner: SpawnController,
    pub(crate) path: PathField,
    pub(crate) agents: AgentController,
    pub(crate) clock: DayNightScheduler,
    pub(crate) player: PlayerState,
    pub(crate) economy: Economy,
    pub(crate) selected: Tool,
    pub(crate) overlay_open: bool,
    /// Ticks of full-world freeze left after the altar breaks.
    pub(crate) altar_pause: u32,
    pub(crate) tick: u64,
    rng: ChaCha8Rng,
}

impl Session {
    /// Validate the config, generate a world from its seed and place the
    /// player near the center.
    pub fn new(
        config: SimConfig,
        preset: WorldPreset,
        difficulty: Difficulty,
        mode: GameMode,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = WorldGenerator::new(preset, difficulty).generate(
            config.world_rows,
            config.world_cols,
            &mut rng,
        );
        Ok(Self::assemble(config, world, difficulty, mode, rng))
    }

    /// Start a session on an already built world. The grid's dimensions
    /// replace the configured ones.
    pub fn from_world(
        mut config: SimConfig,
        world: GeneratedWorld,
        difficulty: Difficulty,
        mode: GameMode,
    ) -> Result<Self, ConfigError> {
        config.world_rows = world.grid.rows();
        config.world_cols = world.grid.cols();
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, world, difficulty, mode, rng))
    }

    fn assemble(
        config: SimConfig,
        world: GeneratedWorld,
        difficulty: Difficulty,
        mode: GameMode,
        rng: ChaCha8Rng,
    ) -> Self {
        let GeneratedWorld {
            grid,
            structures,
            altar,
        } = world;

        let (w, h) = config.world_pixels();
        let start = find_safe_spawn(&grid, Vec2::new(w / 2.0, h / 2.0), &config);
        let invuln = match mode {
            GameMode::Survival => config.respawn_invuln_ticks,
            GameMode::Creative => 0,
        };
        let player = PlayerState::new(start, &config, invuln);

        let mut visibility = VisibilityTracker::new(&config);
        visibility.mark_seen(player.camera(&config));

        log::info!(
            "session ready: {:?} {:?}, player at ({:.0}, {:.0}), {} dirt patches, {} houses",
            mode,
            difficulty,
            start.x,
            start.y,
            structures.dirt_patches.len(),
            structures.houses.len()
        );

        Self {
            spawner: SpawnController::new(&structures),
            clock: DayNightScheduler::new(&config),
            config,
            mode,
            difficulty,
            grid,
            structures,
            altar,
            visibility,
            path: PathField::new(),
            agents: AgentController::new(),
            player,
            economy: Economy::new(),
            selected: Tool::default(),
            overlay_open: false,
            altar_pause: 0,
            tick: 0,
            rng,
        }
    }

    /// Advance the world by one tick.
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        self.tick += 1;
        let altar_paused = self.altar_pause > 0;
        self.altar_pause = self.altar_pause.saturating_sub(1);
        self.overlay_open = input.overlay_open;
        let paused = input.overlay_open || altar_paused;

        let mut report = TickReport {
            tick: self.tick,
            paused,
            ..TickReport::default()
        };

        for action in &input.actions {
            self.apply_action(*action, input.cursor_tile, paused, &mut report);
        }

        if !paused {
            self.player.tick_timers(&self.config);
            self.player.move_by(&self.grid, input.movement, &self.config);
            self.economy.pickup(self.player.pos, self.config.pickup_radius);
        }

        self.visibility.mark_seen(self.player.camera(&self.config));

        if paused || self.mode == GameMode::Creative {
            return report;
        }

        if self.tick % self.config.spawn_check_interval == 0 {
            let ctx = SpawnContext {
                grid: &self.grid,
                structures: &self.structures,
                visibility: &self.visibility,
                config: &self.config,
                difficulty: self.difficulty,
                tick: self.tick,
                blood_moon_active: self.clock.blood_moon_active(),
            };
            report.spawned += self.spawner.evaluate(&ctx, &mut self.agents, &mut self.rng);
        }

        if self.tick % self.config.path_rebuild_interval == 0 {
            let reference = self.player.tile(self.config.tile_size);
            self.path.rebuild(
                &self.grid,
                reference,
                self.config.path_radius,
                self.difficulty.is_hard(),
            );
        }

        let blood_moon = self.clock.blood_moon_active();
        let step = StepContext {
            grid: &self.grid,
            field: &self.path,
            config: &self.config,
            player_tile: self.player.tile(self.config.tile_size),
            axis: self.player.axis,
            speed: agent_speed(&self.config, self.difficulty, self.altar.broken, blood_moon),
            damage: contact_damage(&self.config, self.difficulty, blood_moon),
            diagonal: self.difficulty.is_hard(),
        };
        report.damage_taken = self.agents.step(&step, &mut self.player);
        if self.player.is_dead() {
            self.handle_death();
            report.died = true;
        }

        let chance = self.config.blood_moon_chance(self.difficulty);
        report.transition = self.clock.advance(&mut self.rng, chance);
        if let Some(transition) = report.transition {
            report.spawned += self.apply_transition(transition);
        }

        report.mined = self.economy.advance_mining(
            &mut self.grid,
            input.cursor_tile,
            &mut self.altar,
            &self.config,
        );
        if report.mined.is_some_and(|m| m.broke_altar) {
            self.altar_pause = self.config.altar_pause_ticks;
        }

        report
    }

    fn apply_action(
        &mut self,
        action: Action,
        cursor: Option<TileCoord>,
        paused: bool,
        report: &mut TickReport,
    ) {
        match action {
            Action::SelectSlot(slot) => {
                if let Some(tool) = self.economy.toolbar(self.mode).get(slot) {
                    self.selected = *tool;
                }
            }
            Action::SelectTool(tool) => self.selected = tool,
            _ if paused => {}
            Action::MeleeAttack(point) => {
                report.attack = self.agents.attack(point, self.config.attack_radius);
            }
            Action::Place => {
                let Some(target) = cursor else { return };
                match self.economy.place(&mut self.grid, target, self.selected, self.mode) {
                    Ok(tile) => report.placed = Some(tile),
                    Err(reason) => log::debug!(
                        "placement at row {} col {} rejected: {:?}",
                        target.y,
                        target.x,
                        reason
                    ),
                }
            }
            Action::StartMine => {
                if self.mode == GameMode::Survival {
                    if let Some(target) = cursor {
                        self.economy.start_mining(&self.grid, target);
                    }
                }
            }
            Action::StopMine => self.economy.stop_mining(),
        }
    }

    /// Dusk with a blood moon spawns at every dirt anchor, dawn weakens every
    /// agent. Returns agents spawned.
    fn apply_transition(&mut self, transition: PhaseTransition) -> usize {
        match transition {
            PhaseTransition::Dusk { blood_moon: true } => {
                let ctx = SpawnContext {
                    grid: &self.grid,
                    structures: &self.structures,
                    visibility: &self.visibility,
                    config: &self.config,
                    difficulty: self.difficulty,
                    tick: self.tick,
                    blood_moon_active: true,
                };
                self.spawner.force_spawn_patches(&ctx, &mut self.agents)
            }
            PhaseTransition::Dusk { blood_moon: false } => 0,
            PhaseTransition::Dawn => {
                self.agents.weaken_all();
                0
            }
        }
    }

    fn handle_death(&mut self) {
        self.economy.inventory.halve();
        self.economy.stop_mining();
        self.player.respawn(&self.grid, &self.config);
        log::info!("player died at tick {}", self.tick);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn structures(&self) -> &Structures {
        &self.structures
    }

    pub fn altar(&self) -> Altar {
        self.altar
    }

    pub fn visibility(&self) -> &VisibilityTracker {
        &self.visibility
    }

    pub fn spawner(&self) -> &SpawnController {
        &self.spawner
    }

    pub fn path_field(&self) -> &PathField {
        &self.path
    }

    pub fn agents(&self) -> &[Agent] {
        self.agents.agents()
    }

    pub fn day_night(&self) -> &DayNightScheduler {
        &self.clock
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected
    }

    /// Tools the toolbar shows right now.
    pub fn toolbar(&self) -> Vec<Tool> {
        self.economy.toolbar(self.mode)
    }

    /// Camera top-left in world pixels.
    pub fn camera(&self) -> Vec2 {
        self.player.camera(&self.config)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn altar_pause_left(&self) -> u32 {
        self.altar_pause
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Whole seconds left in the current day or night.
    pub fn phase_seconds_left(&self) -> u32 {
        self.clock.seconds_left(blockworld_core::constants::TICKS_PER_SECOND)
    }
}
