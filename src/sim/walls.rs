//! Wall index: the exposed faces of a tile grid as line segments
//!
//! Rebuilt wholesale whenever the grid changes; never edited in place.

use glam::Vec2;

use super::geometry::WallSegment;
use super::grid::TileGrid;
use crate::consts::TILE_SIZE;

/// Offsets of the four orthogonal neighbours, paired with the corner
/// offsets (in tiles) of the shared edge.
const NEIGHBOURS: [((i64, i64), (f32, f32), (f32, f32)); 4] = [
    ((0, -1), (0.0, 0.0), (1.0, 0.0)), // up
    ((1, 0), (1.0, 0.0), (1.0, 1.0)),  // right
    ((0, 1), (0.0, 1.0), (1.0, 1.0)),  // down
    ((-1, 0), (0.0, 0.0), (0.0, 1.0)), // left
];

/// Segment set derived from a `TileGrid`
#[derive(Debug, Clone, Default)]
pub struct WallIndex {
    segments: Vec<WallSegment>,
}

impl WallIndex {
    /// One segment per wall face that borders a floor tile, plus the four
    /// sides of the arena. Faces between two walls, or between a wall and
    /// the outside, produce nothing.
    pub fn rebuild(grid: &TileGrid) -> Self {
        let mut segments = Vec::new();

        for (x, y, tile) in grid.cells() {
            if !tile.is_wall() {
                continue;
            }
            let origin = Vec2::new(x as f32, y as f32);
            for ((dx, dy), a, b) in NEIGHBOURS {
                let neighbour = grid.get(x as i64 + dx, y as i64 + dy);
                if neighbour.is_some_and(|t| !t.is_wall()) {
                    segments.push(WallSegment::new(
                        (origin + Vec2::from(a)) * TILE_SIZE,
                        (origin + Vec2::from(b)) * TILE_SIZE,
                    ));
                }
            }
        }

        let size = grid.world_size();
        let corners = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ];
        for i in 0..4 {
            segments.push(WallSegment::new(corners[i], corners[(i + 1) % 4]));
        }

        log::debug!(
            "Wall index rebuilt: {}x{} grid -> {} segments",
            grid.width(),
            grid.height(),
            segments.len()
        );

        Self { segments }
    }

    /// Segments whose midpoint lies inside the axis-aligned box of
    /// half-width `radius` around `center`.
    ///
    /// A box, not a circle: callers must still cap distances themselves.
    pub fn query(&self, center: Vec2, radius: f32) -> Vec<&WallSegment> {
        self.query_iter(center, radius).collect()
    }

    pub fn query_iter(&self, center: Vec2, radius: f32) -> impl Iterator<Item = &WallSegment> {
        self.segments.iter().filter(move |s| {
            let d = (s.midpoint() - center).abs();
            d.x <= radius && d.y <= radius
        })
    }

    pub fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
