//! Game state and core simulation types
//!
//! Everything the tick mutates lives here: the player, the entity
//! collection, the seeded RNG and the active/inactive phase.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::settings::Settings;

/// Stable entity identifier, unique for the lifetime of a run
pub type EntityId = u32;

/// Whether the simulation is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Active,
    /// Player died; `tick` is a no-op until the simulation is reset
    Inactive,
}

/// Discriminant of every actor kind, used by events and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Agent,
    Projectile,
    Pickup,
    Particle,
}

/// Who fired a projectile, which decides what it can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Hits agents
    Player,
    /// Hits the player
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    Idle,
    Chasing,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Ammo,
    Medkit,
}

/// Particle color tag (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Projectile hitting a wall
    Spark,
    /// Projectile hitting an actor
    Blood,
}

/// A hostile agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub health: i32,
    pub max_health: i32,
    pub state: AgentState,
    /// Ticks since the last shot while chasing
    pub fire_cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// World units per second
    pub vel: Vec2,
    pub ttl_ticks: u32,
    pub faction: Faction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Cosmetic bob animation phase in [0, τ)
    pub bob_phase: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub vel: Vec2,
    pub ttl_ticks: u32,
    pub tint: ParticleTint,
}

/// Per-kind payload of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Agent(Agent),
    Projectile(Projectile),
    Pickup(Pickup),
    Particle(Particle),
}

impl EntityKind {
    pub fn actor_kind(&self) -> ActorKind {
        match self {
            EntityKind::Agent(_) => ActorKind::Agent,
            EntityKind::Projectile(_) => ActorKind::Projectile,
            EntityKind::Pickup(_) => ActorKind::Pickup,
            EntityKind::Particle(_) => ActorKind::Particle,
        }
    }
}

/// One member of the entity collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    /// Collision disc radius
    pub radius: f32,
    pub kind: EntityKind,
    /// Marked during a tick, dropped during cleanup
    #[serde(skip)]
    pub removed: bool,
}

impl Entity {
    #[inline]
    pub fn actor_kind(&self) -> ActorKind {
        self.kind.actor_kind()
    }

    /// Alive and not yet marked for removal
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.removed
    }
}

/// Small countable items carried by the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub medkits: u32,
    /// Salvage collected from downed agents
    pub scrap: u32,
}

/// The player: viewpoint owner and resource holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle (radians), derived from the aim target every tick
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub inventory: Inventory,
    /// Seconds left on an active reload
    pub reload_remaining: Option<f32>,
    pub kills: u32,
}

impl Player {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        Self {
            pos,
            radius: settings.player_radius,
            facing: 0.0,
            health: settings.max_health,
            max_health: settings.max_health,
            ammo: settings.start_ammo.min(settings.max_ammo),
            max_ammo: settings.max_ammo,
            inventory: Inventory {
                medkits: settings.start_medkits.min(settings.max_medkits),
                scrap: 0,
            },
            reload_remaining: None,
            kills: 0,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Apply damage, returning the amount actually removed
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health.max(0));
        before - self.health
    }

    /// Restore health, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).clamp(0, self.max_health.max(0));
        self.health - before
    }

    /// Add ammunition up to the cap, returning how much was taken
    pub fn add_ammo(&mut self, amount: u32) -> u32 {
        let before = self.ammo;
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
        self.ammo - before
    }
}

/// Discrete notifications for the presentation layer, in emission order.
///
/// Advisory only; nothing flows back into the simulation from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player lost health
    DamageTaken { amount: i32 },
    /// An actor's health reached zero
    EntityKilled { kind: ActorKind },
    /// A pickup was consumed by the player
    ItemPickedUp { kind: PickupKind },
    /// Interacted with a pickup the player has no room for
    InventoryFull,
    /// Fire pressed with no ammunition
    AmmoEmpty,
    /// Reload finished
    WeaponCycled,
    /// Player fired; `shake` is the camera impulse to apply
    ShotFired { shake: f32 },
    ReloadStarted,
    MedkitUsed { healed: i32 },
    /// Medkit requested at full health; nothing consumed
    HealthFull,
    NoMedkits,
    /// Interact pressed with no pickup in reach
    NothingInReach,
    /// Terminal: the simulation is now inactive
    PlayerDied,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live entities, in ascending id order
    pub entities: Vec<Entity>,
    /// Spawned this tick; appended during cleanup
    pending: Vec<Entity>,
    rng: Pcg32,
    next_id: EntityId,
}

impl GameState {
    /// Fresh state with the player at the arena's spawn and the arena's
    /// suggested agents and pickups placed.
    pub fn new(arena: &Arena, settings: &Settings, seed: u64) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Active,
            time_ticks: 0,
            player: Player::new(arena.player_spawn, settings),
            entities: Vec::new(),
            pending: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        let (agents, pickups) = arena.accepted_spawns(settings.min_spawn_distance);
        for pos in agents {
            state.spawn_agent(pos, settings);
        }
        for (pos, kind) in pickups {
            state.spawn_pickup(pos, kind);
        }
        state.flush_spawns();

        log::info!(
            "Game state initialised: seed={}, {} entities",
            seed,
            state.entities.len()
        );
        state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an entity; it joins the collection at the next cleanup
    pub fn spawn(&mut self, pos: Vec2, radius: f32, kind: EntityKind) -> EntityId {
        let id = self.next_entity_id();
        self.pending.push(Entity {
            id,
            pos,
            radius,
            kind,
            removed: false,
        });
        id
    }

    pub fn spawn_agent(&mut self, pos: Vec2, settings: &Settings) -> EntityId {
        let agent = Agent {
            health: settings.agent_health,
            max_health: settings.agent_health,
            state: AgentState::Idle,
            fire_cooldown: 0,
        };
        self.spawn(pos, settings.agent_radius, EntityKind::Agent(agent))
    }

    pub fn spawn_pickup(&mut self, pos: Vec2, kind: PickupKind) -> EntityId {
        let pickup = Pickup {
            kind,
            bob_phase: 0.0,
        };
        self.spawn(pos, PICKUP_RADIUS, EntityKind::Pickup(pickup))
    }

    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        faction: Faction,
        settings: &Settings,
    ) -> EntityId {
        let projectile = Projectile {
            vel,
            ttl_ticks: settings.projectile_lifetime_ticks,
            faction,
        };
        self.spawn(
            pos,
            settings.projectile_radius,
            EntityKind::Projectile(projectile),
        )
    }

    /// Burst of cosmetic particles flying out in random directions
    pub fn spawn_particles(&mut self, pos: Vec2, tint: ParticleTint, settings: &Settings) {
        for _ in 0..settings.particles_per_impact {
            let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = settings.particle_speed * self.rng.random_range(0.5..=1.0);
            let particle = Particle {
                vel: crate::direction_from_angle(theta) * speed,
                ttl_ticks: settings.particle_lifetime_ticks,
                tint,
            };
            self.spawn(pos, PARTICLE_RADIUS, EntityKind::Particle(particle));
        }
    }

    /// Move queued spawns into the collection
    pub fn flush_spawns(&mut self) {
        self.entities.append(&mut self.pending);
    }

    /// Drop every entity marked for removal
    pub fn remove_marked(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_live);
        before - self.entities.len()
    }

    /// Number of queued, not yet flushed spawns
    pub fn pending_spawns(&self) -> usize {
        self.pending.len()
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Live entities of one kind
    pub fn count_kind(&self, kind: ActorKind) -> usize {
        self.entities
            .iter()
            .filter(|e| e.is_live() && e.actor_kind() == kind)
            .count()
    }
}

/// Pickup collision radius (used for display and reach checks)
pub const PICKUP_RADIUS: f32 = 8.0;
/// Particle radius (display only)
pub const PARTICLE_RADIUS: f32 = 2.0;
