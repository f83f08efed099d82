//! Tile grid the arena is made of.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::error::ArenaError;

/// Kind of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

impl Tile {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

/// Fixed-size, row-major grid of tiles. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid from row-major tile data.
    ///
    /// Every border cell must be a wall so nothing can leave the arena.
    pub fn new(width: usize, height: usize, tiles: Vec<Tile>) -> Result<Self, ArenaError> {
        if width == 0 || height == 0 {
            return Err(ArenaError::Empty);
        }
        if tiles.len() != width * height {
            return Err(ArenaError::SizeMismatch {
                width,
                height,
                found: tiles.len(),
            });
        }

        let grid = Self {
            width,
            height,
            tiles,
        };
        for y in 0..height {
            for x in 0..width {
                let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if on_border && !grid.tile(x, y).is_wall() {
                    return Err(ArenaError::OpenBorder { x, y });
                }
            }
        }
        Ok(grid)
    }

    /// Floor everywhere except a one-tile wall border
    pub fn bordered(width: usize, height: usize) -> Result<Self, ArenaError> {
        let tiles = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    Tile::Wall
                } else {
                    Tile::Floor
                }
            })
            .collect();
        Self::new(width, height, tiles)
    }

    /// Copy of this grid with one interior cell replaced.
    ///
    /// Border cells are left alone to keep the grid closed.
    pub fn with_tile(&self, x: usize, y: usize, tile: Tile) -> Self {
        let mut next = self.clone();
        let interior = x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height;
        if interior {
            next.tiles[y * self.width + x] = tile;
        }
        next
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Size of the arena in world units
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    /// Tile at grid coordinates; panics if out of range, see `get`
    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.tiles[y * self.width + x]
    }

    /// Tile at signed grid coordinates, `None` outside the grid
    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.tile(x as usize, y as usize))
    }

    /// Grid cell containing a world position
    #[inline]
    pub fn cell_at(pos: Vec2) -> (i64, i64) {
        (
            (pos.x / TILE_SIZE).floor() as i64,
            (pos.y / TILE_SIZE).floor() as i64,
        )
    }

    /// World-space center of a cell
    #[inline]
    pub fn cell_center(x: usize, y: usize) -> Vec2 {
        Vec2::new((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE)
    }

    /// Whether a world position lies in a wall. Anything outside the grid counts as wall.
    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return true;
        }
        let (x, y) = Self::cell_at(pos);
        self.get(x, y).is_none_or(Tile::is_wall)
    }

    /// Whether a disc of `radius` at `pos` overlaps any wall tile.
    ///
    /// Checks the corners of the disc's bounding box, which is exact for
    /// discs smaller than a tile against an axis-aligned grid.
    pub fn blocks_disc(&self, pos: Vec2, radius: f32) -> bool {
        [
            Vec2::new(pos.x - radius, pos.y - radius),
            Vec2::new(pos.x + radius, pos.y - radius),
            Vec2::new(pos.x - radius, pos.y + radius),
            Vec2::new(pos.x + radius, pos.y + radius),
        ]
        .into_iter()
        .any(|corner| self.is_wall_at(corner))
    }

    /// Iterate all cells as `(x, y, tile)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (i % self.width, i / self.width, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bordered_grid_is_closed() {
        let grid = TileGrid::bordered(5, 4).unwrap();
        assert!(grid.tile(0, 0).is_wall());
        assert!(grid.tile(4, 3).is_wall());
        assert!(!grid.tile(2, 2).is_wall());
    }

    #[test]
    fn test_open_border_rejected() {
        let mut tiles = vec![Tile::Wall; 9];
        tiles[1] = Tile::Floor;
        assert_eq!(
            TileGrid::new(3, 3, tiles),
            Err(ArenaError::OpenBorder { x: 1, y: 0 })
        );
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(matches!(
            TileGrid::new(3, 3, vec![Tile::Wall; 8]),
            Err(ArenaError::SizeMismatch { found: 8, .. })
        ));
        assert_eq!(TileGrid::new(0, 3, Vec::new()), Err(ArenaError::Empty));
    }

    #[test]
    fn test_world_lookup_treats_outside_as_wall() {
        let grid = TileGrid::bordered(4, 4).unwrap();
        assert!(!grid.is_wall_at(TileGrid::cell_center(1, 1)));
        assert!(grid.is_wall_at(Vec2::new(-1.0, 40.0)));
        assert!(grid.is_wall_at(Vec2::new(40.0, 1000.0)));
        assert!(grid.is_wall_at(Vec2::new(f32::NAN, 40.0)));
    }

    #[test]
    fn test_disc_blocked_near_wall() {
        let grid = TileGrid::bordered(4, 4).unwrap();
        let center = TileGrid::cell_center(1, 1);
        assert!(!grid.blocks_disc(center, 8.0));
        // Pushed into the left border column
        assert!(grid.blocks_disc(center - Vec2::new(10.0, 0.0), 8.0));
    }

    #[test]
    fn test_with_tile_keeps_border() {
        let grid = TileGrid::bordered(5, 5).unwrap();
        let walled = grid.with_tile(2, 2, Tile::Wall);
        assert!(walled.tile(2, 2).is_wall());
        let untouched = grid.with_tile(0, 2, Tile::Floor);
        assert!(untouched.tile(0, 2).is_wall());
    }
}
