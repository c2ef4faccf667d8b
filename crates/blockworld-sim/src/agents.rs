//! Hostile agents: pathing, collision, contact damage and player melee.

use blockworld_core::config::SimConfig;
use blockworld_core::direction::{Direction, ALL_DIRECTIONS, ORTHOGONAL, ORTHOGONAL_HORIZONTAL_FIRST};
use blockworld_core::math::{direction_to, pixel_to_tile, tile_center};
use blockworld_core::types::{Axis, Difficulty, TileCoord};
use blockworld_world::WorldGrid;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::path_field::PathField;
use crate::player::PlayerState;

/// One live agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Center in world pixels.
    pub pos: Vec2,
    pub hp: i32,
    /// Ticks until this agent may hit the player again.
    #[serde(default)]
    pub cooldown: u32,
}

impl Agent {
    pub fn new(pos: Vec2, hp: i32) -> Self {
        Self {
            pos,
            hp,
            cooldown: 0,
        }
    }
}

/// Result of a player melee swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Hit { remaining_hp: i32 },
    Killed,
}

/// Per-tick inputs shared by every agent.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub grid: &'a WorldGrid,
    pub field: &'a PathField,
    pub config: &'a SimConfig,
    pub player_tile: TileCoord,
    pub axis: Axis,
    /// Pixels per tick.
    pub speed: f32,
    /// Damage per hit.
    pub damage: f32,
    /// Eight-way neighbor selection.
    pub diagonal: bool,
}

/// Agent speed: player speed scaled by difficulty, then by the altar and
/// blood-moon multipliers when they apply.
pub fn agent_speed(
    config: &SimConfig,
    difficulty: Difficulty,
    altar_broken: bool,
    blood_moon_active: bool,
) -> f32 {
    let mut speed = config.player_speed * config.agent_speed_factor(difficulty);
    if altar_broken {
        speed *= config.altar_speed_mult;
    }
    if blood_moon_active {
        speed *= config.blood_moon_speed_mult;
    }
    speed
}

/// Damage of one agent hit.
pub fn contact_damage(config: &SimConfig, difficulty: Difficulty, blood_moon_active: bool) -> f32 {
    let mut mult = config.damage_mult(difficulty);
    if blood_moon_active {
        mult *= config.blood_moon_damage_mult;
    }
    1.0 * mult
}

/// Neighbor of `here` that moves the agent down the field, if any.
///
/// The scan keeps the strictly smallest distance, first found on ties. In
/// four-way mode a bias then prefers closing the gap on the axis the player
/// is not moving along: when the player last moved horizontally and the agent
/// is on another row, the vertical neighbor closest to the player's row wins
/// (and the mirror case for vertical movement).
pub fn choose_next_tile(
    field: &PathField,
    grid: &WorldGrid,
    here: TileCoord,
    player_tile: TileCoord,
    axis: Axis,
    diagonal: bool,
) -> Option<TileCoord> {
    let here_dist = field.distance(here)?;
    let order: &[Direction] = match (diagonal, axis) {
        (true, _) => &ALL_DIRECTIONS,
        (false, Axis::X) => &ORTHOGONAL,
        (false, Axis::Y) => &ORTHOGONAL_HORIZONTAL_FIRST,
    };

    let mut best = None;
    let mut best_dist = here_dist;
    for dir in order {
        let next = here + dir.offset();
        let Some(d) = field.distance(next) else {
            continue;
        };
        if dir.is_diagonal() {
            let [a, b] = dir.corner_steps();
            if !grid.is_walkable(here + a) || !grid.is_walkable(here + b) {
                continue;
            }
        }
        if d < best_dist {
            best_dist = d;
            best = Some(next);
        }
    }

    if diagonal {
        return best;
    }

    let closer = |t: &TileCoord| field.distance(*t).is_some_and(|d| d < here_dist);
    let bias = match axis {
        Axis::X if here.y != player_tile.y => [Direction::North, Direction::South]
            .iter()
            .map(|d| here + d.offset())
            .filter(closer)
            .min_by_key(|t| (t.y - player_tile.y).abs()),
        Axis::Y if here.x != player_tile.x => [Direction::West, Direction::East]
            .iter()
            .map(|d| here + d.offset())
            .filter(closer)
            .min_by_key(|t| (t.x - player_tile.x).abs()),
        _ => None,
    };
    bias.or(best)
}

/// Owner of the live agent list.
#[derive(Debug, Clone, Default)]
pub struct AgentController {
    agents: Vec<Agent>,
}

impl AgentController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Append without checks. Spawn rules live in the spawn controller.
    pub(crate) fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    /// Replace the list, dropping anything past `cap`.
    pub fn restore(&mut self, mut agents: Vec<Agent>, cap: usize) -> usize {
        let dropped = agents.len().saturating_sub(cap);
        agents.truncate(cap);
        self.agents = agents;
        dropped
    }

    /// Move every agent one tick and resolve contact. Returns the total
    /// damage dealt to the player.
    pub fn step(&mut self, ctx: &StepContext<'_>, player: &mut PlayerState) -> f32 {
        let ts = ctx.config.tile_size;
        let hitbox = ctx.config.agent_hitbox;
        let mut dealt = 0.0;

        for agent in &mut self.agents {
            agent.cooldown = agent.cooldown.saturating_sub(1);

            let here = pixel_to_tile(agent.pos, ts);
            let mut dir = direction_to(agent.pos, player.pos);
            if let Some(next) =
                choose_next_tile(ctx.field, ctx.grid, here, ctx.player_tile, ctx.axis, ctx.diagonal)
            {
                let toward = direction_to(agent.pos, tile_center(next, ts));
                if toward != Vec2::ZERO {
                    dir = toward;
                }
            }

            let step = dir * ctx.speed;
            let nx = agent.pos.x + step.x;
            if !ctx.grid.hitbox_blocked(Vec2::new(nx, agent.pos.y), hitbox, ts) {
                agent.pos.x = nx;
            }
            let ny = agent.pos.y + step.y;
            if !ctx.grid.hitbox_blocked(Vec2::new(agent.pos.x, ny), hitbox, ts) {
                agent.pos.y = ny;
            }

            if player.invuln > 0 || player.health <= 0.0 || agent.cooldown > 0 {
                continue;
            }
            if agent.pos.distance(player.pos) < ctx.config.melee_range {
                player.take_hit(ctx.damage);
                agent.cooldown = ctx.config.agent_damage_cooldown;
                dealt += ctx.damage;
            }
        }
        dealt
    }

    /// Player melee at a world point: the first agent within `radius` loses
    /// one hit point and is removed at zero.
    pub fn attack(&mut self, point: Vec2, radius: f32) -> Option<AttackOutcome> {
        let idx = self
            .agents
            .iter()
            .position(|a| a.pos.distance(point) < radius)?;
        self.agents[idx].hp -= 1;
        if self.agents[idx].hp <= 0 {
            self.agents.remove(idx);
            Some(AttackOutcome::Killed)
        } else {
            Some(AttackOutcome::Hit {
                remaining_hp: self.agents[idx].hp,
            })
        }
    }

    /// Dawn: every agent drops to exactly one hit point.
    pub fn weaken_all(&mut self) {
        for agent in &mut self.agents {
            agent.hp = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::small_config;
    use blockworld_core::tile::Tile;
    use blockworld_core::types::tile;

    fn ctx<'a>(
        grid: &'a WorldGrid,
        field: &'a PathField,
        config: &'a SimConfig,
        player: &PlayerState,
        difficulty: Difficulty,
    ) -> StepContext<'a> {
        StepContext {
            grid,
            field,
            config,
            player_tile: player.tile(config.tile_size),
            axis: player.axis,
            speed: agent_speed(config, difficulty, false, false),
            damage: contact_damage(config, difficulty, false),
            diagonal: difficulty.is_hard(),
        }
    }

    #[test]
    fn test_speed_multipliers_compose() {
        let config = small_config();
        assert_eq!(agent_speed(&config, Difficulty::Normal, false, false), 3.0);
        let hard = agent_speed(&config, Difficulty::Hard, false, false);
        assert!((hard - 3.6).abs() < 1e-5);
        let all = agent_speed(&config, Difficulty::Normal, true, true);
        assert!((all - 3.0 * 1.05 * 1.25).abs() < 1e-5);
    }

    #[test]
    fn test_contact_damage_multipliers() {
        let config = small_config();
        assert_eq!(contact_damage(&config, Difficulty::Normal, false), 1.0);
        assert_eq!(contact_damage(&config, Difficulty::Hard, false), 1.5);
        assert_eq!(contact_damage(&config, Difficulty::Hard, true), 2.25);
    }

    #[test]
    fn test_contact_at_fifteen_pixels_deals_damage() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            let mut player = PlayerState::new(tile_center(tile(10, 10), 32), &config, 0);
            let mut agents = AgentController::new();
            // Place far enough that one step of movement keeps it under 20 px.
            agents.push(Agent::new(player.pos + Vec2::new(15.0, 0.0), 3));
            let c = ctx(&grid, &field, &config, &player, difficulty);
            let dealt = agents.step(&c, &mut player);
            let mult = config.damage_mult(difficulty);
            assert_eq!(dealt, mult);
            assert_eq!(player.health, config.max_health - mult);
            assert_eq!(agents.agents()[0].cooldown, config.agent_damage_cooldown);
        }
    }

    #[test]
    fn test_cooldown_blocks_second_hit() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        let mut player = PlayerState::new(tile_center(tile(10, 10), 32), &config, 0);
        let mut agents = AgentController::new();
        agents.push(Agent::new(player.pos + Vec2::new(15.0, 0.0), 3));
        let c = ctx(&grid, &field, &config, &player, Difficulty::Normal);
        agents.step(&c, &mut player);
        for _ in 0..(config.agent_damage_cooldown - 1) {
            assert_eq!(agents.step(&c, &mut player), 0.0);
        }
        assert_eq!(agents.step(&c, &mut player), 1.0);
        assert_eq!(player.health, config.max_health - 2.0);
    }

    #[test]
    fn test_each_agent_has_its_own_cooldown() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        let mut player = PlayerState::new(tile_center(tile(10, 10), 32), &config, 0);
        let mut agents = AgentController::new();
        agents.push(Agent::new(player.pos + Vec2::new(15.0, 0.0), 3));
        agents.push(Agent::new(player.pos + Vec2::new(-15.0, 0.0), 3));
        let c = ctx(&grid, &field, &config, &player, Difficulty::Normal);
        assert_eq!(agents.step(&c, &mut player), 2.0);
    }

    #[test]
    fn test_invulnerable_player_takes_no_damage() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        let mut player = PlayerState::new(tile_center(tile(10, 10), 32), &config, 5);
        let mut agents = AgentController::new();
        agents.push(Agent::new(player.pos + Vec2::new(15.0, 0.0), 3));
        let c = ctx(&grid, &field, &config, &player, Difficulty::Normal);
        assert_eq!(agents.step(&c, &mut player), 0.0);
        assert_eq!(player.health, config.max_health);
        assert_eq!(agents.agents()[0].cooldown, 0);
    }

    #[test]
    fn test_agent_follows_field_around_wall() {
        let config = small_config();
        let mut grid = WorldGrid::new(config.world_rows, config.world_cols);
        // wall between agent and player, gap at the top
        grid.fill_rect(6, 10, 10, 1, Tile::Brick);
        let player = PlayerState::new(tile_center(tile(10, 14), 32), &config, 0);
        let mut field = PathField::new();
        field.rebuild(&grid, player.tile(32), config.path_radius, false);
        let here = tile(10, 8);
        let next = choose_next_tile(&field, &grid, here, player.tile(32), Axis::X, false).unwrap();
        assert!(field.distance(next).unwrap() < field.distance(here).unwrap());
        // the straight line east is the wall side, so the path goes north
        assert_eq!(next, tile(9, 8));
    }

    #[test]
    fn test_axis_bias_prefers_player_row() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let mut field = PathField::new();
        let player_tile = tile(10, 10);
        field.rebuild(&grid, player_tile, 10, false);
        let here = tile(14, 5);
        // Player moving along X: close the row gap first.
        let next = choose_next_tile(&field, &grid, here, player_tile, Axis::X, false);
        assert_eq!(next, Some(tile(13, 5)));
        // Player moving along Y: close the column gap first.
        let next = choose_next_tile(&field, &grid, here, player_tile, Axis::Y, false);
        assert_eq!(next, Some(tile(14, 6)));
    }

    #[test]
    fn test_diagonal_step_on_hard() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let mut field = PathField::new();
        let player_tile = tile(10, 10);
        field.rebuild(&grid, player_tile, 10, true);
        // Chebyshev distance 4; only the north-east diagonal gets to 3.
        let next = choose_next_tile(&field, &grid, tile(14, 6), player_tile, Axis::X, true);
        assert_eq!(next, Some(tile(13, 7)));
    }

    #[test]
    fn test_off_field_agent_gets_no_tile() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        assert_eq!(
            choose_next_tile(&field, &grid, tile(1, 1), tile(2, 2), Axis::X, false),
            None
        );
    }

    #[test]
    fn test_agent_moves_toward_player_without_field() {
        let config = small_config();
        let grid = WorldGrid::new(config.world_rows, config.world_cols);
        let field = PathField::new();
        let mut player = PlayerState::new(tile_center(tile(10, 10), 32), &config, 0);
        let mut agents = AgentController::new();
        let start = player.pos + Vec2::new(200.0, 0.0);
        agents.push(Agent::new(start, 3));
        let c = ctx(&grid, &field, &config, &player, Difficulty::Normal);
        agents.step(&c, &mut player);
        assert_eq!(agents.agents()[0].pos, start - Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_attack_hits_first_in_radius_then_kills() {
        let mut agents = AgentController::new();
        agents.push(Agent::new(Vec2::new(100.0, 100.0), 2));
        agents.push(Agent::new(Vec2::new(110.0, 100.0), 2));
        let point = Vec2::new(105.0, 100.0);
        assert_eq!(
            agents.attack(point, 24.0),
            Some(AttackOutcome::Hit { remaining_hp: 1 })
        );
        assert_eq!(agents.attack(point, 24.0), Some(AttackOutcome::Killed));
        assert_eq!(agents.len(), 1);
        assert_eq!(agents.agents()[0].pos, Vec2::new(110.0, 100.0));
        assert_eq!(agents.attack(Vec2::new(500.0, 500.0), 24.0), None);
    }

    #[test]
    fn test_weaken_all_sets_one_hp() {
        let mut agents = AgentController::new();
        agents.push(Agent::new(Vec2::ZERO, 3));
        agents.push(Agent::new(Vec2::ONE, 5));
        agents.weaken_all();
        assert!(agents.agents().iter().all(|a| a.hp == 1));
    }

    #[test]
    fn test_restore_truncates_to_cap() {
        let mut agents = AgentController::new();
        let list = vec![Agent::new(Vec2::ZERO, 3); 40];
        assert_eq!(agents.restore(list, 35), 5);
        assert_eq!(agents.len(), 35);
    }
}
