use blockworld_core::config::SimConfig;
use blockworld_core::math::{pixel_to_tile, tile_center};
use blockworld_core::types::{tile, Axis, TileCoord};
use blockworld_world::WorldGrid;
use glam::Vec2;

/// "Never hit" marker for the heal delay counter.
pub const NEVER_DAMAGED: u32 = 999_999;

/// Position, health and survival timers of the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pos: Vec2,
    pub health: f32,
    /// Ticks of damage immunity left.
    pub invuln: u32,
    pub ticks_since_damage: u32,
    pub heal_timer: u32,
    /// Where the player comes back after dying.
    pub respawn: Vec2,
    /// Dominant axis of the last non-zero movement.
    pub axis: Axis,
}

impl PlayerState {
    /// Player at `pos` with full health and the given immunity.
    pub fn new(pos: Vec2, config: &SimConfig, invuln: u32) -> Self {
        Self {
            pos,
            health: config.max_health,
            invuln,
            ticks_since_damage: NEVER_DAMAGED,
            heal_timer: 0,
            respawn: pos,
            axis: Axis::X,
        }
    }

    pub fn tile(&self, tile_size: u32) -> TileCoord {
        pixel_to_tile(self.pos, tile_size)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply contact damage and restart the heal delay.
    pub fn take_hit(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.ticks_since_damage = 0;
        self.heal_timer = 0;
    }

    /// Count down immunity and apply passive healing.
    pub fn tick_timers(&mut self, config: &SimConfig) {
        self.invuln = self.invuln.saturating_sub(1);
        self.ticks_since_damage = self.ticks_since_damage.saturating_add(1);
        if self.health < config.max_health && self.ticks_since_damage >= config.heal_delay_ticks {
            self.heal_timer += 1;
            if self.heal_timer >= config.heal_interval_ticks {
                self.heal_timer = 0;
                self.health = (self.health + config.heal_amount).min(config.max_health);
            }
        }
    }

    /// Move by a normalized intent vector, one axis at a time, then clamp to
    /// the world. A non-zero intent records the dominant axis.
    pub fn move_by(&mut self, grid: &WorldGrid, intent: Vec2, config: &SimConfig) {
        if intent != Vec2::ZERO {
            self.axis = Axis::dominant(intent.x, intent.y);
        }
        let step = intent * config.player_speed;
        let ts = config.tile_size;
        let size = config.player_hitbox;

        let nx = self.pos.x + step.x;
        if !grid.hitbox_blocked(Vec2::new(nx, self.pos.y), size, ts) {
            self.pos.x = nx;
        }
        let ny = self.pos.y + step.y;
        if !grid.hitbox_blocked(Vec2::new(self.pos.x, ny), size, ts) {
            self.pos.y = ny;
        }

        let (w, h) = config.world_pixels();
        self.pos.x = self.pos.x.clamp(0.0, w - 1.0);
        self.pos.y = self.pos.y.clamp(0.0, h - 1.0);
    }

    /// Back to the respawn point with full health and immunity.
    pub fn respawn(&mut self, grid: &WorldGrid, config: &SimConfig) {
        self.pos = find_safe_spawn(grid, self.respawn, config);
        self.health = config.max_health;
        self.ticks_since_damage = NEVER_DAMAGED;
        self.heal_timer = 0;
        self.invuln = config.respawn_invuln_ticks;
    }

    /// Top-left corner of the camera, centered on the player and clamped so
    /// the view never shows more than half a screen past the world edge.
    pub fn camera(&self, config: &SimConfig) -> Vec2 {
        let (vw, vh) = config.view_pixels();
        let (ww, wh) = config.world_pixels();
        let half = Vec2::new((vw / 2.0).floor(), (vh / 2.0).floor());
        let cam = self.pos - half;
        Vec2::new(
            cam.x.clamp(-half.x, ww - half.x),
            cam.y.clamp(-half.y, wh - half.y),
        )
    }
}

/// Nearest open tile center around `near`, searching square rings outward.
///
/// A tile qualifies when it is walkable and its center pixel is not blocked.
/// Falls back to the center of the first tile if nothing is found.
pub fn find_safe_spawn(grid: &WorldGrid, near: Vec2, config: &SimConfig) -> Vec2 {
    let ts = config.tile_size;
    let start = pixel_to_tile(near, ts);
    for radius in 0..=config.safe_spawn_radius {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let t = tile(start.y + dr, start.x + dc);
                if !grid.in_bounds(t) || !grid.is_walkable(t) {
                    continue;
                }
                let center = tile_center(t, ts);
                if !grid.blocks_at_pixel(center, ts) {
                    return center;
                }
            }
        }
    }
    Vec2::splat(ts as f32)
}
