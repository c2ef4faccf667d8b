use glam::IVec2;

/// One of 8 neighbor steps on the tile grid (4 orthogonal + 4 diagonal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
    NorthWest = 4,
    NorthEast = 5,
    SouthWest = 6,
    SouthEast = 7,
}

/// Orthogonal steps, vertical pair first.
pub const ORTHOGONAL: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Orthogonal steps, horizontal pair first.
pub const ORTHOGONAL_HORIZONTAL_FIRST: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

/// Diagonal steps.
pub const DIAGONAL: [Direction; 4] = [
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::SouthEast,
];

/// All 8 steps, orthogonal first.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::SouthEast,
];

impl Direction {
    /// Offset as (dcol, drow). Rows grow southward.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
            Direction::East => IVec2::new(1, 0),
            Direction::NorthWest => IVec2::new(-1, -1),
            Direction::NorthEast => IVec2::new(1, -1),
            Direction::SouthWest => IVec2::new(-1, 1),
            Direction::SouthEast => IVec2::new(1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        self as u8 >= 4
    }

    /// The two orthogonal steps a diagonal cuts across. For orthogonal
    /// directions both entries are the direction itself.
    pub fn corner_steps(self) -> [IVec2; 2] {
        let o = self.offset();
        if self.is_diagonal() {
            [IVec2::new(o.x, 0), IVec2::new(0, o.y)]
        } else {
            [o, o]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_directions_unique() {
        for (i, a) in ALL_DIRECTIONS.iter().enumerate() {
            for (j, b) in ALL_DIRECTIONS.iter().enumerate() {
                if i != j {
                    assert_ne!(a.offset(), b.offset(), "directions {i} and {j} share offset");
                }
            }
        }
    }

    #[test]
    fn test_no_zero_offset() {
        for dir in ALL_DIRECTIONS {
            assert_ne!(dir.offset(), IVec2::ZERO, "{dir:?} has zero offset");
        }
    }

    #[test]
    fn test_diagonal_classification() {
        for dir in ORTHOGONAL {
            assert!(!dir.is_diagonal());
        }
        for dir in DIAGONAL {
            assert!(dir.is_diagonal());
            assert_eq!(dir.offset().x.abs() + dir.offset().y.abs(), 2);
        }
    }

    #[test]
    fn test_corner_steps() {
        let [a, b] = Direction::SouthEast.corner_steps();
        assert_eq!(a, IVec2::new(1, 0));
        assert_eq!(b, IVec2::new(0, 1));
    }
}
