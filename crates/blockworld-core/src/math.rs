use crate::types::{ChunkCoord, TileCoord};
use glam::{IVec2, Vec2};

/// Convert a tile coordinate to its containing visibility chunk.
pub fn tile_to_chunk(tile: TileCoord, chunk_size: u32) -> ChunkCoord {
    let cs = chunk_size as i32;
    IVec2::new(tile.x.div_euclid(cs), tile.y.div_euclid(cs))
}

/// Tile containing a world-space pixel position.
pub fn pixel_to_tile(pos: Vec2, tile_size: u32) -> TileCoord {
    let ts = tile_size as f32;
    IVec2::new((pos.x / ts).floor() as i32, (pos.y / ts).floor() as i32)
}

/// World-space center of a tile.
pub fn tile_center(tile: TileCoord, tile_size: u32) -> Vec2 {
    let ts = tile_size as f32;
    Vec2::new(tile.x as f32 * ts + ts / 2.0, tile.y as f32 * ts + ts / 2.0)
}

/// Corner sample points of a square hitbox centered on `center`.
///
/// Corners are inset by one pixel so that a box exactly one tile wide does
/// not touch its neighbors.
pub fn hitbox_corners(center: Vec2, size: f32) -> [Vec2; 4] {
    let h = size / 2.0 - 1.0;
    [
        Vec2::new(center.x - h, center.y - h),
        Vec2::new(center.x + h, center.y - h),
        Vec2::new(center.x - h, center.y + h),
        Vec2::new(center.x + h, center.y + h),
    ]
}

/// Unit vector from `from` toward `to`, or zero if they coincide.
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_to_chunk_positive() {
        assert_eq!(tile_to_chunk(IVec2::new(0, 0), 16), IVec2::new(0, 0));
        assert_eq!(tile_to_chunk(IVec2::new(15, 16), 16), IVec2::new(0, 1));
        assert_eq!(tile_to_chunk(IVec2::new(50, 50), 16), IVec2::new(3, 3));
    }

    #[test]
    fn test_tile_to_chunk_negative() {
        assert_eq!(tile_to_chunk(IVec2::new(-1, -16), 16), IVec2::new(-1, -1));
        assert_eq!(tile_to_chunk(IVec2::new(-17, 0), 16), IVec2::new(-2, 0));
    }

    #[test]
    fn test_pixel_tile_roundtrip_via_center() {
        let t = IVec2::new(7, 3);
        assert_eq!(pixel_to_tile(tile_center(t, 32), 32), t);
        assert_eq!(tile_center(t, 32), Vec2::new(240.0, 112.0));
    }

    #[test]
    fn test_pixel_to_tile_negative_floors() {
        assert_eq!(pixel_to_tile(Vec2::new(-0.5, 31.9), 32), IVec2::new(-1, 0));
    }

    #[test]
    fn test_hitbox_corners_inset() {
        let c = hitbox_corners(Vec2::new(16.0, 16.0), 20.0);
        assert_eq!(c[0], Vec2::new(7.0, 7.0));
        assert_eq!(c[3], Vec2::new(25.0, 25.0));
    }

    #[test]
    fn test_direction_to_zero() {
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        assert_eq!(direction_to(Vec2::ZERO, Vec2::new(3.0, 0.0)), Vec2::X);
    }
}
