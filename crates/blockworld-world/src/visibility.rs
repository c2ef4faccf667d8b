use std::collections::HashSet;

use blockworld_core::config::SimConfig;
use blockworld_core::math::tile_to_chunk;
use blockworld_core::types::{ChunkCoord, TileCoord};
use glam::{IVec2, Vec2};

/// Monotonic record of every chunk the camera has covered.
///
/// Spawning only happens in seen chunks, so structures far from anywhere the
/// player has been stay dormant.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    seen: HashSet<ChunkCoord>,
    rows: i32,
    cols: i32,
    tile_size: u32,
    chunk_size: u32,
    view_cols: i32,
    view_rows: i32,
    margin: i32,
}

impl VisibilityTracker {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            seen: HashSet::new(),
            rows: config.world_rows as i32,
            cols: config.world_cols as i32,
            tile_size: config.tile_size,
            chunk_size: config.chunk_size,
            view_cols: config.view_cols as i32,
            view_rows: config.view_rows as i32,
            margin: config.visibility_margin as i32,
        }
    }

    /// Mark every chunk under the camera rectangle (plus margin) as seen.
    /// `camera` is the top-left corner of the view in world pixels.
    /// Returns how many chunks were new.
    pub fn mark_seen(&mut self, camera: Vec2) -> usize {
        let ts = self.tile_size as f32;
        let start_col = (camera.x / ts).floor() as i32 - self.margin;
        let start_row = (camera.y / ts).floor() as i32 - self.margin;
        // +3 covers partially visible tiles on both edges.
        let end_col = start_col + self.view_cols + 3 + self.margin * 2;
        let end_row = start_row + self.view_rows + 3 + self.margin * 2;

        let clamp_col = |c: i32| c.clamp(0, self.cols - 1);
        let clamp_row = |r: i32| r.clamp(0, self.rows - 1);
        let top_left = tile_to_chunk(
            IVec2::new(clamp_col(start_col), clamp_row(start_row)),
            self.chunk_size,
        );
        let bottom_right = tile_to_chunk(
            IVec2::new(clamp_col(end_col), clamp_row(end_row)),
            self.chunk_size,
        );

        let before = self.seen.len();
        for cy in top_left.y..=bottom_right.y {
            for cx in top_left.x..=bottom_right.x {
                self.seen.insert(IVec2::new(cx, cy));
            }
        }
        self.seen.len() - before
    }

    /// Whether the chunk containing `tile` has been seen.
    pub fn is_seen(&self, tile: TileCoord) -> bool {
        self.seen.contains(&tile_to_chunk(tile, self.chunk_size))
    }

    pub fn is_chunk_seen(&self, chunk: ChunkCoord) -> bool {
        self.seen.contains(&chunk)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Seen chunks in a stable order, for snapshots.
    pub fn sorted_chunks(&self) -> Vec<ChunkCoord> {
        let mut chunks: Vec<ChunkCoord> = self.seen.iter().copied().collect();
        chunks.sort_by_key(|c| (c.y, c.x));
        chunks
    }

    /// Replace the seen set with a saved one.
    pub fn restore(&mut self, chunks: impl IntoIterator<Item = ChunkCoord>) {
        self.seen = chunks.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_core::types::tile;

    fn tracker() -> VisibilityTracker {
        VisibilityTracker::new(&SimConfig::default())
    }

    #[test]
    fn test_origin_view_chunks() {
        let mut vis = tracker();
        // cols -2..=30 clamp to 0..=30 -> chunks 0..=1; rows -2..=20 -> 0..=1
        let added = vis.mark_seen(Vec2::ZERO);
        assert_eq!(added, 4);
        assert!(vis.is_seen(tile(0, 0)));
        assert!(vis.is_seen(tile(31, 31)));
        assert!(!vis.is_seen(tile(0, 32)));
    }

    #[test]
    fn test_mark_seen_is_idempotent() {
        let mut vis = tracker();
        let camera = Vec2::new(1234.0, 567.0);
        vis.mark_seen(camera);
        let after_first = vis.sorted_chunks();
        assert_eq!(vis.mark_seen(camera), 0);
        assert_eq!(vis.sorted_chunks(), after_first);
    }

    #[test]
    fn test_seen_set_only_grows() {
        let mut vis = tracker();
        vis.mark_seen(Vec2::new(3000.0, 3000.0));
        let first = vis.len();
        vis.mark_seen(Vec2::ZERO);
        assert!(vis.len() > first);
        assert!(vis.is_seen(tile(100, 100)));
    }

    #[test]
    fn test_negative_camera_clamps() {
        let mut vis = tracker();
        vis.mark_seen(Vec2::new(-400.0, -240.0));
        assert!(vis.is_chunk_seen(IVec2::new(0, 0)));
        assert!(vis.sorted_chunks().iter().all(|c| c.x >= 0 && c.y >= 0));
    }

    #[test]
    fn test_far_corner_clamps_to_grid() {
        let mut vis = tracker();
        vis.mark_seen(Vec2::new(100_000.0, 100_000.0));
        // 750 cols / 16 -> last chunk 46; 450 rows -> 28
        assert_eq!(vis.len(), 1);
        assert!(vis.is_chunk_seen(IVec2::new(46, 28)));
    }

    #[test]
    fn test_restore_replaces() {
        let mut vis = tracker();
        vis.mark_seen(Vec2::ZERO);
        vis.restore([IVec2::new(5, 5)]);
        assert_eq!(vis.len(), 1);
        assert!(vis.is_seen(tile(80, 80)));
    }
}
