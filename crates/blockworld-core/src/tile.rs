use serde::{Deserialize, Serialize};

use crate::error::UnknownTileId;

/// Number of tile kinds in the palette.
pub const TILE_COUNT: usize = 9;

/// One cell of the world grid. Discriminants are the stable palette ids
/// used in save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Tile {
    /// Outside the grid. Never stored by generation.
    Void = 0,
    #[default]
    Grass = 1,
    Dirt = 2,
    Wood = 3,
    Leaves = 4,
    Water = 5,
    Stone = 6,
    Brick = 7,
    /// Center of the altar.
    Core = 8,
}

/// All tiles in id order.
pub const ALL_TILES: [Tile; TILE_COUNT] = [
    Tile::Void,
    Tile::Grass,
    Tile::Dirt,
    Tile::Wood,
    Tile::Leaves,
    Tile::Water,
    Tile::Stone,
    Tile::Brick,
    Tile::Core,
];

// Indexed by id.
const SOLID: [bool; TILE_COUNT] = [false, false, false, true, true, false, true, true, true];
const MINEABLE: [bool; TILE_COUNT] = [false, false, true, true, true, false, true, true, true];

impl Tile {
    /// Palette id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a tile by palette id.
    pub fn from_id(id: u8) -> Option<Tile> {
        ALL_TILES.get(id as usize).copied()
    }

    /// Blocks movement. Void is not in this set; use [`Tile::blocks_movement`]
    /// for collision checks.
    pub fn is_solid(self) -> bool {
        SOLID[self as usize]
    }

    /// Solid or outside the grid.
    pub fn blocks_movement(self) -> bool {
        self == Tile::Void || self.is_solid()
    }

    /// Agents and the player can stand here.
    pub fn is_walkable(self) -> bool {
        !self.blocks_movement()
    }

    /// Can be dug out by the player.
    pub fn is_mineable(self) -> bool {
        MINEABLE[self as usize]
    }

    /// Can be put down by the player.
    pub fn is_placeable(self) -> bool {
        self != Tile::Void
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Tile::Void => "void",
            Tile::Grass => "grass",
            Tile::Dirt => "dirt",
            Tile::Wood => "wood",
            Tile::Leaves => "leaves",
            Tile::Water => "water",
            Tile::Stone => "stone",
            Tile::Brick => "brick",
            Tile::Core => "core",
        }
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> u8 {
        tile as u8
    }
}

impl TryFrom<u8> for Tile {
    type Error = UnknownTileId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Tile::from_id(id).ok_or(UnknownTileId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        for (i, tile) in ALL_TILES.iter().enumerate() {
            assert_eq!(tile.id() as usize, i);
            assert_eq!(Tile::from_id(i as u8), Some(*tile));
        }
        assert_eq!(Tile::from_id(9), None);
    }

    #[test]
    fn test_try_from_reports_unknown_id() {
        assert_eq!(Tile::try_from(6), Ok(Tile::Stone));
        let err = Tile::try_from(42).unwrap_err();
        assert_eq!(err, UnknownTileId(42));
        assert_eq!(err.to_string(), "unknown tile id 42");
    }

    #[test]
    fn test_solid_set() {
        let solid: Vec<Tile> = ALL_TILES.iter().copied().filter(|t| t.is_solid()).collect();
        assert_eq!(
            solid,
            vec![Tile::Wood, Tile::Leaves, Tile::Stone, Tile::Brick, Tile::Core]
        );
    }

    #[test]
    fn test_void_blocks_but_is_not_solid() {
        assert!(!Tile::Void.is_solid());
        assert!(Tile::Void.blocks_movement());
        assert!(!Tile::Void.is_walkable());
        assert!(!Tile::Void.is_placeable());
    }

    #[test]
    fn test_walkable_tiles() {
        assert!(Tile::Grass.is_walkable());
        assert!(Tile::Dirt.is_walkable());
        assert!(Tile::Water.is_walkable());
        assert!(!Tile::Brick.is_walkable());
    }

    #[test]
    fn test_mineable_excludes_grass_and_water() {
        assert!(!Tile::Grass.is_mineable());
        assert!(!Tile::Water.is_mineable());
        assert!(!Tile::Void.is_mineable());
        assert!(Tile::Dirt.is_mineable());
        assert!(Tile::Core.is_mineable());
    }

    #[test]
    fn test_serde_rejects_unknown_id() {
        let ok: Tile = serde_json::from_str("6").unwrap();
        assert_eq!(ok, Tile::Stone);
        assert!(serde_json::from_str::<Tile>("42").is_err());
        assert_eq!(serde_json::to_string(&Tile::Core).unwrap(), "8");
    }
}
