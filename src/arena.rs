//! Arena Provider contract
//!
//! An arena is a closed tile grid plus spawn suggestions. How it was made
//! (hand-drawn, procedurally carved) is not the core's business; the plain
//! text format below exists so tests, tools and the demo binary can hand
//! arenas over without a generator.
//!
//! ```text
//! #  wall          .  floor
//! @  player spawn  A  agent spawn
//! a  ammo pickup   +  medkit pickup
//! ```
//!
//! Spawn glyphs sit on floor tiles.

use glam::Vec2;

use crate::error::ArenaError;
use crate::sim::grid::{Tile, TileGrid};
use crate::sim::state::PickupKind;

/// Static arena layout
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub grid: TileGrid,
    pub player_spawn: Vec2,
    /// Suggested agent positions, validated on load
    pub agent_spawns: Vec<Vec2>,
    /// Suggested pickup positions, validated on load
    pub pickup_spawns: Vec<(Vec2, PickupKind)>,
}

impl Arena {
    /// Arena with no suggested spawns. The player spawn must be on floor.
    pub fn new(grid: TileGrid, player_spawn: Vec2) -> Result<Self, ArenaError> {
        if grid.is_wall_at(player_spawn) {
            return Err(ArenaError::SpawnOnWall {
                x: player_spawn.x,
                y: player_spawn.y,
            });
        }
        Ok(Self {
            grid,
            player_spawn,
            agent_spawns: Vec::new(),
            pickup_spawns: Vec::new(),
        })
    }

    pub fn with_agents(mut self, spawns: impl IntoIterator<Item = Vec2>) -> Self {
        self.agent_spawns.extend(spawns);
        self
    }

    pub fn with_pickups(mut self, spawns: impl IntoIterator<Item = (Vec2, PickupKind)>) -> Self {
        self.pickup_spawns.extend(spawns);
        self
    }

    /// Parse the plain-text arena format
    pub fn from_ascii(text: &str) -> Result<Self, ArenaError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(ArenaError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut player_spawn = None;
        let mut agents = Vec::new();
        let mut pickups = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ArenaError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let center = TileGrid::cell_center(x, y);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' => Tile::Floor,
                    '@' => {
                        if player_spawn.replace(center).is_some() {
                            return Err(ArenaError::DuplicatePlayerSpawn);
                        }
                        Tile::Floor
                    }
                    'A' => {
                        agents.push(center);
                        Tile::Floor
                    }
                    'a' => {
                        pickups.push((center, PickupKind::Ammo));
                        Tile::Floor
                    }
                    '+' => {
                        pickups.push((center, PickupKind::Medkit));
                        Tile::Floor
                    }
                    _ => {
                        return Err(ArenaError::UnknownGlyph {
                            glyph,
                            line: y + 1,
                            column: x + 1,
                        });
                    }
                };
                tiles.push(tile);
            }
        }

        let grid = TileGrid::new(width, rows.len(), tiles)?;
        let spawn = player_spawn.ok_or(ArenaError::MissingPlayerSpawn)?;
        let arena = Self::new(grid, spawn)?
            .with_agents(agents)
            .with_pickups(pickups);

        log::info!(
            "Parsed arena {}x{}: {} agent spawns, {} pickup spawns",
            arena.grid.width(),
            arena.grid.height(),
            arena.agent_spawns.len(),
            arena.pickup_spawns.len()
        );
        Ok(arena)
    }

    /// Suggested spawns that are on floor and at least `min_distance` from
    /// the player spawn. Anything else is dropped.
    pub fn accepted_spawns(&self, min_distance: f32) -> (Vec<Vec2>, Vec<(Vec2, PickupKind)>) {
        let accept = |pos: Vec2| {
            if self.grid.is_wall_at(pos) {
                log::debug!("Dropping spawn at {pos}: not on floor");
                return false;
            }
            if pos.distance(self.player_spawn) < min_distance {
                log::debug!("Dropping spawn at {pos}: too close to player spawn");
                return false;
            }
            true
        };

        let agents = self
            .agent_spawns
            .iter()
            .copied()
            .filter(|&p| accept(p))
            .collect();
        let pickups = self
            .pickup_spawns
            .iter()
            .copied()
            .filter(|&(p, _)| accept(p))
            .collect();
        (agents, pickups)
    }
}
