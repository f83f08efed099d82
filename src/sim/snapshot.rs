//! Read-only view of the world for the presentation layer
//!
//! Taken after `tick` completes. Owns its data, so holding one never blocks
//! the next tick.

use glam::Vec2;
use serde::Serialize;

use super::state::{
    ActorKind, AgentState, EntityId, EntityKind, Faction, GameState, ParticleTint, PickupKind,
};
use crate::direction_from_angle;

/// Pixel amplitude of the pickup bob
const BOB_AMPLITUDE: f32 = 3.0;

/// Type-specific fields a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayFields {
    Player {
        facing: f32,
        health: i32,
        max_health: i32,
        reloading: bool,
    },
    Agent {
        health: i32,
        max_health: i32,
        chasing: bool,
    },
    Projectile {
        faction: Faction,
        heading: f32,
    },
    Pickup {
        kind: PickupKind,
        /// Vertical draw offset from the bob animation
        bob_offset: f32,
    },
    Particle {
        tint: ParticleTint,
        ttl_ticks: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    /// Zero for the player
    pub id: EntityId,
    pub kind: ActorKind,
    pub pos: Vec2,
    pub radius: f32,
    pub display: DisplayFields,
}

/// Player resources for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatus {
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub medkits: u32,
    pub scrap: u32,
    pub kills: u32,
    pub reloading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub active: bool,
    pub player: PlayerStatus,
    /// Player first, then the entity collection in id order
    pub entities: Vec<EntityView>,
}

impl WorldSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let p = &state.player;
        let mut entities = Vec::with_capacity(state.entities.len() + 1);
        entities.push(EntityView {
            id: 0,
            kind: ActorKind::Player,
            pos: p.pos,
            radius: p.radius,
            display: DisplayFields::Player {
                facing: p.facing,
                health: p.health,
                max_health: p.max_health,
                reloading: p.is_reloading(),
            },
        });

        entities.extend(state.entities.iter().filter(|e| e.is_live()).map(|e| {
            let display = match &e.kind {
                EntityKind::Agent(a) => DisplayFields::Agent {
                    health: a.health,
                    max_health: a.max_health,
                    chasing: a.state == AgentState::Chasing,
                },
                EntityKind::Projectile(pr) => DisplayFields::Projectile {
                    faction: pr.faction,
                    heading: pr.vel.y.atan2(pr.vel.x),
                },
                EntityKind::Pickup(pk) => DisplayFields::Pickup {
                    kind: pk.kind,
                    bob_offset: pk.bob_phase.sin() * BOB_AMPLITUDE,
                },
                EntityKind::Particle(pa) => DisplayFields::Particle {
                    tint: pa.tint,
                    ttl_ticks: pa.ttl_ticks,
                },
            };
            EntityView {
                id: e.id,
                kind: e.actor_kind(),
                pos: e.pos,
                radius: e.radius,
                display,
            }
        }));

        Self {
            tick: state.time_ticks,
            active: state.is_active(),
            player: PlayerStatus {
                health: p.health,
                max_health: p.max_health,
                ammo: p.ammo,
                max_ammo: p.max_ammo,
                medkits: p.inventory.medkits,
                scrap: p.inventory.scrap,
                kills: p.kills,
                reloading: p.is_reloading(),
            },
            entities,
        }
    }

    /// Entities of one kind
    pub fn of_kind(&self, kind: ActorKind) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Point just ahead of the player along its facing, for aim reticles
    pub fn reticle(&self, distance: f32) -> Option<Vec2> {
        self.entities.first().and_then(|e| match e.display {
            DisplayFields::Player { facing, .. } => Some(e.pos + direction_from_angle(facing) * distance),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::settings::Settings;
    use crate::sim::grid::TileGrid;

    #[test]
    fn test_snapshot_lists_player_first() {
        let settings = Settings::default();
        let grid = TileGrid::bordered(20, 20).unwrap();
        let arena = Arena::new(grid, TileGrid::cell_center(2, 2))
            .unwrap()
            .with_agents([TileGrid::cell_center(15, 15)])
            .with_pickups([(TileGrid::cell_center(10, 2), PickupKind::Ammo)]);
        let state = GameState::new(&arena, &settings, 1);

        let snap = WorldSnapshot::capture(&state);
        assert_eq!(snap.entities[0].kind, ActorKind::Player);
        assert_eq!(snap.of_kind(ActorKind::Agent).count(), 1);
        assert_eq!(snap.of_kind(ActorKind::Pickup).count(), 1);
        assert!(snap.active);
        assert_eq!(snap.player.ammo, settings.start_ammo);

        let reticle = snap.reticle(10.0).unwrap();
        assert!((reticle - (TileGrid::cell_center(2, 2) + Vec2::new(10.0, 0.0))).length() < 1e-4);
    }

    #[test]
    fn test_snapshot_serializes() {
        let settings = Settings::default();
        let grid = TileGrid::bordered(10, 10).unwrap();
        let arena = Arena::new(grid, TileGrid::cell_center(2, 2)).unwrap();
        let state = GameState::new(&arena, &settings, 1);

        let json = serde_json::to_string(&WorldSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"type\":\"player\""));
    }
}
