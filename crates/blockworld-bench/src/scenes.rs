use blockworld_core::types::{Difficulty, GameMode, WorldPreset};
use blockworld_sim::{Action, TickInput};
use glam::Vec2;

/// Ticks spent walking in one direction before turning.
const LEG_TICKS: u64 = 150;

/// Ticks between scripted melee swings.
const SWING_INTERVAL: u64 = 30;

/// Configuration for a single benchmark scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    pub name: &'static str,
    pub preset: WorldPreset,
    pub difficulty: Difficulty,
    pub mode: GameMode,
}

/// Every preset at both difficulties, plus one creative run as a floor.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let scene = |name, preset, difficulty| SceneConfig {
        name,
        preset,
        difficulty,
        mode: GameMode::Survival,
    };
    vec![
        scene("free-normal", WorldPreset::Free, Difficulty::Normal),
        scene("free-hard", WorldPreset::Free, Difficulty::Hard),
        scene("normal-normal", WorldPreset::Normal, Difficulty::Normal),
        scene("normal-hard", WorldPreset::Normal, Difficulty::Hard),
        scene("crowded-normal", WorldPreset::Crowded, Difficulty::Normal),
        scene("crowded-hard", WorldPreset::Crowded, Difficulty::Hard),
        SceneConfig {
            name: "creative",
            preset: WorldPreset::Normal,
            difficulty: Difficulty::Normal,
            mode: GameMode::Creative,
        },
    ]
}

/// Scripted player for tick `tick` (1-based): walks a square, swinging at
/// the space just ahead every few ticks.
pub fn scripted_input(tick: u64, player: Vec2) -> TickInput {
    let heading = match (tick / LEG_TICKS) % 4 {
        0 => Vec2::X,
        1 => Vec2::Y,
        2 => Vec2::NEG_X,
        _ => Vec2::NEG_Y,
    };
    let mut input = TickInput::moving(heading);
    if tick % SWING_INTERVAL == 0 {
        input.actions.push(Action::MeleeAttack(player + heading * 16.0));
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_names_unique() {
        let scenes = standard_scenes();
        for (i, a) in scenes.iter().enumerate() {
            assert!(scenes[i + 1..].iter().all(|b| b.name != a.name));
        }
    }

    #[test]
    fn test_script_turns_and_swings() {
        let start = scripted_input(1, Vec2::ZERO);
        assert_eq!(start.movement, Vec2::X);
        assert!(start.actions.is_empty());

        let turned = scripted_input(LEG_TICKS, Vec2::ZERO);
        assert_eq!(turned.movement, Vec2::Y);

        let swing = scripted_input(SWING_INTERVAL, Vec2::new(100.0, 100.0));
        assert_eq!(
            swing.actions,
            vec![Action::MeleeAttack(Vec2::new(116.0, 100.0))]
        );
    }
}
