//! Collision detection and movement resolution
//!
//! Actors are discs moving over a tile grid. Movement is discrete: a step
//! either lands somewhere clear or is rejected, with the player additionally
//! allowed to slide along walls one axis at a time.

use glam::Vec2;

use super::grid::TileGrid;

/// Disc overlap with an extra pad on the radii sum
#[inline]
pub fn discs_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, pad: f32) -> bool {
    let reach = a_radius + b_radius + pad;
    a.distance_squared(b) < reach * reach
}

/// Take the step if the destination is clear, otherwise stay put
pub fn step_if_clear(grid: &TileGrid, pos: Vec2, radius: f32, delta: Vec2) -> Option<Vec2> {
    let next = pos + delta;
    (!grid.blocks_disc(next, radius)).then_some(next)
}

/// Move with wall sliding.
///
/// Tries the full move, then the X component alone, then the Y component
/// alone, so brushing a wall at an angle keeps some of the motion. Returns
/// the starting position when all three are blocked.
pub fn slide_move(grid: &TileGrid, pos: Vec2, radius: f32, delta: Vec2) -> Vec2 {
    if delta == Vec2::ZERO {
        return pos;
    }
    step_if_clear(grid, pos, radius, delta)
        .or_else(|| step_if_clear(grid, pos, radius, Vec2::new(delta.x, 0.0)))
        .or_else(|| step_if_clear(grid, pos, radius, Vec2::new(0.0, delta.y)))
        .unwrap_or(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Tile;

    #[test]
    fn test_discs_overlap_with_pad() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(21.0, 0.0);
        assert!(!discs_overlap(a, 10.0, b, 10.0, 0.0));
        assert!(discs_overlap(a, 10.0, b, 10.0, 2.0));
    }

    #[test]
    fn test_step_rejected_into_wall() {
        let grid = TileGrid::bordered(6, 6).unwrap().with_tile(3, 2, Tile::Wall);
        let start = TileGrid::cell_center(2, 2);
        assert!(step_if_clear(&grid, start, 8.0, Vec2::new(20.0, 0.0)).is_none());
        assert!(step_if_clear(&grid, start, 8.0, Vec2::new(0.0, 5.0)).is_some());
    }

    #[test]
    fn test_slide_along_wall() {
        // Wall directly to the right; moving diagonally down-right should
        // keep the downward part
        let grid = TileGrid::bordered(6, 6).unwrap().with_tile(3, 2, Tile::Wall);
        let start = TileGrid::cell_center(2, 2);
        let next = slide_move(&grid, start, 8.0, Vec2::new(10.0, 10.0));
        assert_eq!(next.x, start.x);
        assert_eq!(next.y, start.y + 10.0);
    }

    #[test]
    fn test_slide_in_corner_stops() {
        let grid = TileGrid::bordered(6, 6).unwrap();
        let start = TileGrid::cell_center(1, 1);
        let next = slide_move(&grid, start, 8.0, Vec2::new(-10.0, -10.0));
        assert_eq!(next, start);
    }
}
