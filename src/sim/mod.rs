//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod grid;
pub mod simulation;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod visibility;
pub mod walls;

pub use collision::{discs_overlap, slide_move, step_if_clear};
pub use geometry::{Intersection, Ray, WallSegment, intersect};
pub use grid::{Tile, TileGrid};
pub use simulation::Simulation;
pub use snapshot::{DisplayFields, EntityView, PlayerStatus, WorldSnapshot};
pub use state::{
    ActorKind, Agent, AgentState, Entity, EntityId, EntityKind, Faction, GameEvent, GamePhase,
    GameState, Inventory, Particle, ParticleTint, Pickup, PickupKind, Player, Projectile,
};
pub use tick::{TickInput, tick};
pub use visibility::{VisibilityPolygon, compute_visibility};
pub use walls::WallIndex;
