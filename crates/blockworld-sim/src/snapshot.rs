//! Capture and restore of session state.
//!
//! Every field of a [`SessionSnapshot`] is optional. Restoring applies each
//! present field on its own and keeps the in-memory value for anything that
//! is missing or fails validation, so a partly damaged save still loads.

use blockworld_core::tile::Tile;
use blockworld_core::types::ChunkCoord;
use blockworld_world::{Altar, Structures, WorldGrid};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::agents::Agent;
use crate::economy::{DroppedItem, Inventory};
use crate::session::Session;

/// Stored tiles with their dimensions, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rows: u32,
    pub cols: u32,
    pub tiles: Vec<Tile>,
}

/// Serializable session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub grid: Option<GridSnapshot>,
    pub structures: Option<Structures>,
    pub altar: Option<Altar>,
    pub player_pos: Option<Vec2>,
    pub health: Option<f32>,
    pub respawn: Option<Vec2>,
    pub invuln: Option<u32>,
    pub ticks_since_damage: Option<u32>,
    pub heal_timer: Option<u32>,
    pub inventory: Option<Inventory>,
    pub agents: Option<Vec<Agent>>,
    pub seen_chunks: Option<Vec<ChunkCoord>>,
    /// Indices into the dirt patch list that already rolled.
    pub evaluated_patches: Option<Vec<usize>>,
    pub house_next_ticks: Option<Vec<u64>>,
    pub tick: Option<u64>,
    pub cycle_frame: Option<u32>,
    pub is_night: Option<bool>,
    pub blood_moon: Option<bool>,
    pub drops: Option<Vec<DroppedItem>>,
}

macro_rules! snapshot_fields {
    ($mac:ident) => {
        $mac!(
            grid,
            structures,
            altar,
            player_pos,
            health,
            respawn,
            invuln,
            ticks_since_damage,
            heal_timer,
            inventory,
            agents,
            seen_chunks,
            evaluated_patches,
            house_next_ticks,
            tick,
            cycle_frame,
            is_night,
            blood_moon,
            drops
        )
    };
}

impl SessionSnapshot {
    /// Names of the fields that are present.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        macro_rules! collect {
            ($($field:ident),*) => {
                $(if self.$field.is_some() {
                    out.push(stringify!($field));
                })*
            };
        }
        snapshot_fields!(collect);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Take every field present in `other`, keeping ours where it is absent.
    pub fn merge(&mut self, other: SessionSnapshot) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        snapshot_fields!(take);
    }
}

/// Outcome of [`Session::restore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Fields that were applied.
    pub applied: Vec<&'static str>,
    /// One line per rejected or adjusted field.
    pub warnings: Vec<String>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, field: &'static str, message: String) {
        log::warn!("snapshot field {field}: {message}");
        self.warnings.push(format!("{field}: {message}"));
    }
}

fn finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

impl Session {
    /// Snapshot of everything worth saving.
    pub fn capture(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: Some(GridSnapshot {
                rows: self.grid.rows(),
                cols: self.grid.cols(),
                tiles: self.grid.tiles().to_vec(),
            }),
            structures: Some(self.structures.clone()),
            altar: Some(self.altar),
            player_pos: Some(self.player.pos),
            health: Some(self.player.health),
            respawn: Some(self.player.respawn),
            invuln: Some(self.player.invuln),
            ticks_since_damage: Some(self.player.ticks_since_damage),
            heal_timer: Some(self.player.heal_timer),
            inventory: Some(self.economy.inventory),
            agents: Some(self.agents.agents().to_vec()),
            seen_chunks: Some(self.visibility.sorted_chunks()),
            evaluated_patches: Some(self.spawner.evaluated_indices()),
            house_next_ticks: Some(self.spawner.house_next_ticks().to_vec()),
            tick: Some(self.tick),
            cycle_frame: Some(self.clock.cycle_frame()),
            is_night: Some(self.clock.is_night()),
            blood_moon: Some(self.clock.blood_moon()),
            drops: Some(self.economy.drops.clone()),
        }
    }

    /// Apply a snapshot field by field. Invalid fields are skipped with a
    /// warning. The path field and any dig in progress are always reset.
    pub fn restore(&mut self, snap: SessionSnapshot) -> RestoreReport {
        let mut report = RestoreReport::default();
        let (world_w, world_h) = self.config.world_pixels();
        let in_world = |p: Vec2| finite(p) && p.x >= 0.0 && p.y >= 0.0 && p.x < world_w && p.y < world_h;

        if let Some(g) = snap.grid {
            if g.rows != self.grid.rows() || g.cols != self.grid.cols() {
                report.warn(
                    "grid",
                    format!(
                        "dimensions {}x{} do not match {}x{}",
                        g.rows,
                        g.cols,
                        self.grid.rows(),
                        self.grid.cols()
                    ),
                );
            } else {
                match WorldGrid::from_tiles(g.rows, g.cols, g.tiles) {
                    Some(grid) => {
                        self.grid = grid;
                        report.applied.push("grid");
                    }
                    None => report.warn("grid", "tile count does not match dimensions".into()),
                }
            }
        }

        if let Some(structures) = snap.structures {
            let lost = self.spawner.remap(&self.structures, &structures);
            if lost > 0 {
                report.warn(
                    "structures",
                    format!("spawn state of {lost} structures without a match discarded"),
                );
            }
            self.structures = structures;
            report.applied.push("structures");
        }

        if let Some(altar) = snap.altar {
            if self.grid.in_bounds(altar.position) {
                self.altar = altar;
                report.applied.push("altar");
            } else {
                report.warn("altar", "position outside the world".into());
            }
        }

        if let Some(pos) = snap.player_pos {
            if in_world(pos) {
                self.player.pos = pos;
                report.applied.push("player_pos");
            } else {
                report.warn("player_pos", format!("({}, {}) outside the world", pos.x, pos.y));
            }
        }
        if let Some(health) = snap.health {
            if (0.0..=self.config.max_health).contains(&health) {
                self.player.health = health;
                report.applied.push("health");
            } else {
                report.warn("health", format!("{health} out of range"));
            }
        }
        if let Some(pos) = snap.respawn {
            if in_world(pos) {
                self.player.respawn = pos;
                report.applied.push("respawn");
            } else {
                report.warn("respawn", format!("({}, {}) outside the world", pos.x, pos.y));
            }
        }
        if let Some(invuln) = snap.invuln {
            self.player.invuln = invuln;
            report.applied.push("invuln");
        }
        if let Some(ticks) = snap.ticks_since_damage {
            self.player.ticks_since_damage = ticks;
            report.applied.push("ticks_since_damage");
        }
        if let Some(timer) = snap.heal_timer {
            self.player.heal_timer = timer;
            report.applied.push("heal_timer");
        }

        if let Some(inventory) = snap.inventory {
            self.economy.inventory = inventory;
            report.applied.push("inventory");
        }

        if let Some(agents) = snap.agents {
            let total = agents.len();
            let valid: Vec<Agent> = agents
                .into_iter()
                .filter(|a| a.hp > 0 && in_world(a.pos))
                .collect();
            if valid.len() < total {
                report.warn("agents", format!("{} invalid agents skipped", total - valid.len()));
            }
            let dropped = self.agents.restore(valid, self.config.max_agents);
            if dropped > 0 {
                report.warn("agents", format!("{dropped} agents over the cap dropped"));
            }
            report.applied.push("agents");
        }

        if let Some(chunks) = snap.seen_chunks {
            self.visibility.restore(chunks);
            report.applied.push("seen_chunks");
        }

        if let Some(indices) = snap.evaluated_patches {
            let ignored = self.spawner.restore_dirt_evaluated(&indices);
            if ignored > 0 {
                report.warn("evaluated_patches", format!("{ignored} unknown patch indices ignored"));
            }
            report.applied.push("evaluated_patches");
        }

        if let Some(ticks) = snap.house_next_ticks {
            let len = ticks.len();
            if self.spawner.restore_house_next_ticks(ticks) {
                report.applied.push("house_next_ticks");
            } else {
                report.warn(
                    "house_next_ticks",
                    format!("{len} entries for {} houses", self.structures.houses.len()),
                );
            }
        }

        if let Some(tick) = snap.tick {
            self.tick = tick;
            report.applied.push("tick");
        }

        match (snap.cycle_frame, snap.is_night) {
            (Some(frame), night) => {
                let blood_moon = self.clock.blood_moon();
                self.clock.restore(frame, blood_moon);
                report.applied.push("cycle_frame");
                match night {
                    Some(n) if n == self.clock.is_night() => report.applied.push("is_night"),
                    Some(_) => {
                        report.warn("is_night", "disagrees with cycle_frame; cycle_frame wins".into())
                    }
                    None => {}
                }
            }
            (None, Some(night)) => {
                self.clock.restore_phase(night);
                report.applied.push("is_night");
            }
            (None, None) => {}
        }
        if let Some(blood_moon) = snap.blood_moon {
            self.clock.set_blood_moon(blood_moon);
            report.applied.push("blood_moon");
        }

        if let Some(drops) = snap.drops {
            let total = drops.len();
            let valid: Vec<DroppedItem> = drops
                .into_iter()
                .filter(|d| d.tile != Tile::Void && in_world(d.pos))
                .collect();
            if valid.len() < total {
                report.warn("drops", format!("{} invalid drops skipped", total - valid.len()));
            }
            self.economy.drops = valid;
            report.applied.push("drops");
        }

        self.path.clear();
        self.economy.stop_mining();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Action, TickInput};
    use crate::test_harness::{generated_session, open_session};
    use blockworld_core::math::tile_center;
    use blockworld_core::types::{tile, Difficulty, WorldPreset};

    #[test]
    fn test_capture_restores_into_fresh_session() {
        let mut played = generated_session(WorldPreset::Normal, Difficulty::Normal);
        played.economy.inventory.add(Tile::Wood, 4);
        played.agents.push(Agent::new(tile_center(tile(3, 3), 32), 3));
        for _ in 0..40 {
            played.tick(&TickInput::idle());
        }
        let snap = played.capture();

        let mut fresh = generated_session(WorldPreset::Normal, Difficulty::Normal);
        let report = fresh.restore(snap.clone());
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.applied.len(), snap.present_fields().len());
        assert_eq!(fresh.capture(), snap);
        assert_eq!(fresh.tick_count(), 40);
    }

    #[test]
    fn test_empty_snapshot_changes_nothing() {
        let mut session = open_session(Difficulty::Normal);
        let before = session.capture();
        let report = session.restore(SessionSnapshot::default());
        assert!(report.applied.is_empty());
        assert!(report.is_clean());
        assert_eq!(session.capture(), before);
    }

    #[test]
    fn test_wrong_grid_dimensions_rejected_others_applied() {
        let mut session = open_session(Difficulty::Normal);
        let snap = SessionSnapshot {
            grid: Some(GridSnapshot {
                rows: 2,
                cols: 2,
                tiles: vec![Tile::Stone; 4],
            }),
            health: Some(4.0),
            ..SessionSnapshot::default()
        };
        let report = session.restore(snap);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("grid"));
        assert_eq!(report.applied, vec!["health"]);
        assert_eq!(session.grid().rows(), 40);
        assert_eq!(session.grid().count(Tile::Stone), 0);
        assert_eq!(session.player().health, 4.0);
    }

    #[test]
    fn test_agents_over_cap_truncated() {
        let mut session = open_session(Difficulty::Normal);
        let cap = session.config().max_agents;
        let agents = vec![Agent::new(Vec2::new(50.0, 50.0), 3); cap + 5];
        let report = session.restore(SessionSnapshot {
            agents: Some(agents),
            ..SessionSnapshot::default()
        });
        assert_eq!(session.agents().len(), cap);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_house_list_length_mismatch_rejected() {
        let mut session = open_session(Difficulty::Normal);
        assert!(session.structures().houses.is_empty());
        let report = session.restore(SessionSnapshot {
            house_next_ticks: Some(vec![600, 1200]),
            ..SessionSnapshot::default()
        });
        assert!(report.applied.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_health_and_position_rejected() {
        let mut session = open_session(Difficulty::Normal);
        let pos = session.player().pos;
        let report = session.restore(SessionSnapshot {
            health: Some(-3.0),
            player_pos: Some(Vec2::new(f32::NAN, 10.0)),
            ..SessionSnapshot::default()
        });
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(session.player().health, session.config().max_health);
        assert_eq!(session.player().pos, pos);
    }

    #[test]
    fn test_night_flag_alone_restores_phase() {
        let mut session = open_session(Difficulty::Normal);
        session.restore(SessionSnapshot {
            is_night: Some(true),
            blood_moon: Some(true),
            ..SessionSnapshot::default()
        });
        assert!(session.day_night().is_night());
        assert!(session.day_night().blood_moon_active());
        assert_eq!(session.day_night().cycle_frame(), session.config().day_ticks);
    }

    #[test]
    fn test_cycle_frame_wins_over_night_flag() {
        let mut session = open_session(Difficulty::Normal);
        let report = session.restore(SessionSnapshot {
            cycle_frame: Some(10),
            is_night: Some(true),
            ..SessionSnapshot::default()
        });
        assert!(!session.day_night().is_night());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_restore_resets_path_field_and_mining() {
        let mut session = open_session(Difficulty::Normal);
        let target = tile(20, 31);
        session.grid.set(target, Tile::Stone);
        for _ in 0..8 {
            session.tick(&TickInput::at_cursor(target, vec![Action::StartMine]));
        }
        assert!(!session.path_field().is_empty());
        assert!(session.economy().mining.is_active());

        session.restore(SessionSnapshot::default());
        assert!(session.path_field().is_empty());
        assert!(!session.economy().mining.is_active());
    }

    #[test]
    fn test_merge_prefers_present_fields() {
        let mut base = SessionSnapshot {
            tick: Some(5),
            health: Some(3.0),
            ..SessionSnapshot::default()
        };
        base.merge(SessionSnapshot {
            tick: Some(9),
            ..SessionSnapshot::default()
        });
        assert_eq!(base.tick, Some(9));
        assert_eq!(base.health, Some(3.0));
        assert_eq!(base.present_fields(), vec!["health", "tick"]);
    }

    #[test]
    fn test_snapshot_json_rejects_bad_tile_id() {
        let json = r#"{"grid": {"rows": 1, "cols": 1, "tiles": [42]}}"#;
        assert!(serde_json::from_str::<SessionSnapshot>(json).is_err());
        let ok = r#"{"tick": 7, "unknown": true}"#;
        let snap: SessionSnapshot = serde_json::from_str(ok).unwrap();
        assert_eq!(snap.present_fields(), vec!["tick"]);
    }

    #[test]
    fn test_structures_alone_keep_spawn_state() {
        let mut session = open_session(Difficulty::Normal);
        let mut dirt_grid = session.grid().clone();
        dirt_grid.set(tile(5, 30), Tile::Dirt);
        let structures = Structures::detect(&dirt_grid);
        assert_eq!(structures.dirt_patches.len(), 1);

        let report = session.restore(SessionSnapshot {
            structures: Some(structures.clone()),
            evaluated_patches: Some(vec![0]),
            ..SessionSnapshot::default()
        });
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(session.spawner().dirt_evaluated(), &[true]);

        let report = session.restore(SessionSnapshot {
            structures: Some(structures),
            ..SessionSnapshot::default()
        });
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.applied, vec!["structures"]);
        assert_eq!(session.spawner().dirt_evaluated(), &[true]);

        let report = session.restore(SessionSnapshot {
            structures: Some(Structures::default()),
            ..SessionSnapshot::default()
        });
        assert_eq!(report.warnings.len(), 1);
        assert!(session.spawner().dirt_evaluated().is_empty());
    }
}
