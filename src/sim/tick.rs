//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one step. Sub-steps run in
//! a fixed order: player movement, aiming, per-entity update, interact,
//! medkit, fire, reload, cleanup.

use glam::Vec2;
use rand::Rng;

use super::collision::{discs_overlap, slide_move, step_if_clear};
use super::grid::TileGrid;
use super::state::{
    ActorKind, AgentState, EntityKind, Faction, GameEvent, GamePhase, GameState, ParticleTint,
    PickupKind,
};
use crate::consts::{HIT_PAD, PARTICLE_DECAY, PICKUP_BOB_SPEED};
use crate::settings::Settings;
use crate::{bearing, direction_from_angle};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim target in world coordinates
    pub aim: Vec2,
    pub fire: bool,
    pub reload: bool,
    pub interact: bool,
    pub use_medkit: bool,
}

impl TickInput {
    /// Unit movement vector from the direction flags (zero when idle or cancelled out)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)).normalize_or_zero()
    }

    /// Same movement and aim with every discrete trigger cleared
    pub fn without_triggers(&self) -> Self {
        Self {
            fire: false,
            reload: false,
            interact: false,
            use_medkit: false,
            ..*self
        }
    }

    /// Whether any discrete trigger is set
    pub fn has_triggers(&self) -> bool {
        self.fire || self.reload || self.interact || self.use_medkit
    }

    /// Fold another input's triggers into this one
    pub fn merge_triggers(&mut self, other: &TickInput) {
        self.fire |= other.fire;
        self.reload |= other.reload;
        self.interact |= other.interact;
        self.use_medkit |= other.use_medkit;
    }
}

/// Advance the game state by one timestep, returning this tick's events in
/// emission order. A no-op once the player has died.
pub fn tick(
    state: &mut GameState,
    grid: &TileGrid,
    settings: &Settings,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::Inactive {
        return events;
    }
    state.time_ticks += 1;

    // Player movement with wall sliding
    let delta = input.movement() * settings.player_speed * dt;
    let player = &mut state.player;
    player.pos = slide_move(grid, player.pos, player.radius, delta);

    // Aiming is derived, never integrated
    if input.aim != player.pos && input.aim.is_finite() {
        player.facing = bearing(player.pos, input.aim);
    }

    update_entities(state, grid, settings, dt, &mut events);

    // A player killed during the entity pass takes no further actions
    if !state.player.is_dead() {
        if input.interact {
            interact(state, settings, &mut events);
        }
        if input.use_medkit {
            use_medkit(state, settings, &mut events);
        }
        if input.fire {
            fire(state, settings, &mut events);
        }
        reload(state, settings, input.reload, dt, &mut events);
    }

    // Cleanup
    let removed = state.remove_marked();
    state.flush_spawns();
    if removed > 0 {
        log::trace!("tick {}: removed {} entities", state.time_ticks, removed);
    }

    if state.player.is_dead() {
        state.phase = GamePhase::Inactive;
        events.push(GameEvent::PlayerDied);
        log::info!(
            "Player died at tick {} ({} kills)",
            state.time_ticks,
            state.player.kills
        );
    }

    events
}

/// Visit every entity present at the start of the pass exactly once.
///
/// The index range is fixed up front; spawns are queued outside the
/// collection and removals are only marks, so neither can shift it.
fn update_entities(
    state: &mut GameState,
    grid: &TileGrid,
    settings: &Settings,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let live_count = state.entities.len();
    for idx in 0..live_count {
        if state.entities[idx].removed {
            continue;
        }
        match state.entities[idx].kind {
            EntityKind::Projectile(_) => update_projectile(state, idx, grid, settings, dt, events),
            EntityKind::Agent(_) => update_agent(state, idx, grid, settings, dt),
            EntityKind::Particle(_) => update_particle(state, idx, dt),
            EntityKind::Pickup(_) => update_pickup(state, idx, dt),
        }
    }
}

fn update_projectile(
    state: &mut GameState,
    idx: usize,
    grid: &TileGrid,
    settings: &Settings,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let entity = &mut state.entities[idx];
    let EntityKind::Projectile(projectile) = &mut entity.kind else {
        return;
    };
    entity.pos += projectile.vel * dt;
    projectile.ttl_ticks = projectile.ttl_ticks.saturating_sub(1);
    let (pos, radius, faction, expired) = (
        entity.pos,
        entity.radius,
        projectile.faction,
        projectile.ttl_ticks == 0,
    );

    if grid.is_wall_at(pos) {
        state.entities[idx].removed = true;
        state.spawn_particles(pos, ParticleTint::Spark, settings);
        return;
    }

    let hit = match faction {
        Faction::Player => hit_agent(state, pos, radius, settings, events),
        Faction::Agent => hit_player(state, pos, radius, settings, events),
    };
    if hit {
        state.entities[idx].removed = true;
        state.spawn_particles(pos, ParticleTint::Blood, settings);
    } else if expired {
        state.entities[idx].removed = true;
    }
}

/// Damage the first live agent overlapping the projectile
fn hit_agent(
    state: &mut GameState,
    pos: Vec2,
    radius: f32,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> bool {
    let target = state.entities.iter().position(|e| {
        e.is_live()
            && matches!(e.kind, EntityKind::Agent(_))
            && discs_overlap(pos, radius, e.pos, e.radius, HIT_PAD)
    });
    let Some(target) = target else {
        return false;
    };

    let entity = &mut state.entities[target];
    let EntityKind::Agent(agent) = &mut entity.kind else {
        return false;
    };
    let damage = settings.player_damage.max(0);
    agent.health = (agent.health - damage).clamp(0, agent.max_health.max(0));
    if agent.health > 0 {
        return true;
    }

    let (id, drop_at) = (entity.id, entity.pos);
    entity.removed = true;
    events.push(GameEvent::EntityKilled {
        kind: ActorKind::Agent,
    });
    state.player.kills += 1;
    state.player.inventory.scrap += 1;
    log::debug!("Agent {id} killed at {drop_at}");

    let chance = settings.loot_drop_chance.clamp(0.0, 1.0);
    if state.rng().random_bool(chance) {
        let kind = if state.rng().random_bool(0.5) {
            PickupKind::Ammo
        } else {
            PickupKind::Medkit
        };
        state.spawn_pickup(drop_at, kind);
        log::debug!("Agent {id} dropped {kind:?}");
    }
    true
}

fn hit_player(
    state: &mut GameState,
    pos: Vec2,
    radius: f32,
    settings: &Settings,
    events: &mut Vec<GameEvent>,
) -> bool {
    let player = &mut state.player;
    if player.is_dead() || !discs_overlap(pos, radius, player.pos, player.radius, HIT_PAD) {
        return false;
    }

    let amount = player.take_damage(settings.agent_damage);
    events.push(GameEvent::DamageTaken { amount });
    if player.is_dead() {
        events.push(GameEvent::EntityKilled {
            kind: ActorKind::Player,
        });
    }
    true
}

fn update_agent(state: &mut GameState, idx: usize, grid: &TileGrid, settings: &Settings, dt: f32) {
    let target = state.player.pos;
    let entity = &mut state.entities[idx];
    let EntityKind::Agent(agent) = &mut entity.kind else {
        return;
    };

    let distance = entity.pos.distance(target);
    if agent.state == AgentState::Idle && distance < settings.aggro_radius {
        agent.state = AgentState::Chasing;
        log::trace!("Agent {} aggro at distance {distance:.1}", entity.id);
    }
    if agent.state != AgentState::Chasing {
        return;
    }

    // One step toward the player; walls block, no sliding
    let dir = (target - entity.pos).normalize_or_zero();
    let step = (settings.agent_speed * dt).min(distance);
    if let Some(next) = step_if_clear(grid, entity.pos, entity.radius, dir * step) {
        entity.pos = next;
    }

    agent.fire_cooldown += 1;
    let ready = agent.fire_cooldown > settings.agent_fire_cooldown_ticks;
    if !ready || entity.pos.distance(target) > settings.agent_fire_range {
        return;
    }
    agent.fire_cooldown = 0;

    let aim = (target - entity.pos).normalize_or_zero();
    if aim == Vec2::ZERO {
        return;
    }
    let muzzle = entity.pos;
    state.spawn_projectile(
        muzzle,
        aim * settings.agent_projectile_speed,
        Faction::Agent,
        settings,
    );
}

fn update_particle(state: &mut GameState, idx: usize, dt: f32) {
    let entity = &mut state.entities[idx];
    let EntityKind::Particle(particle) = &mut entity.kind else {
        return;
    };
    entity.pos += particle.vel * dt;
    particle.vel *= PARTICLE_DECAY;
    particle.ttl_ticks = particle.ttl_ticks.saturating_sub(1);
    if particle.ttl_ticks == 0 {
        entity.removed = true;
    }
}

fn update_pickup(state: &mut GameState, idx: usize, dt: f32) {
    if let EntityKind::Pickup(pickup) = &mut state.entities[idx].kind {
        let phase = pickup.bob_phase + PICKUP_BOB_SPEED * dt;
        pickup.bob_phase = phase.rem_euclid(std::f32::consts::TAU);
    }
}

/// Consume at most one pickup: the nearest live one within reach
fn interact(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    let origin = state.player.pos;
    let nearest = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_live() && matches!(e.kind, EntityKind::Pickup(_)))
        .map(|(i, e)| (i, e.pos.distance(origin)))
        .filter(|&(_, d)| d <= settings.pickup_reach)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((idx, _)) = nearest else {
        events.push(GameEvent::NothingInReach);
        return;
    };
    let EntityKind::Pickup(pickup) = &state.entities[idx].kind else {
        return;
    };
    let kind = pickup.kind;

    let player = &mut state.player;
    let consumed = match kind {
        PickupKind::Ammo => player.add_ammo(settings.ammo_pickup_amount) > 0,
        PickupKind::Medkit => {
            if player.inventory.medkits < settings.max_medkits {
                player.inventory.medkits += 1;
                true
            } else {
                false
            }
        }
    };

    if consumed {
        state.entities[idx].removed = true;
        events.push(GameEvent::ItemPickedUp { kind });
    } else {
        events.push(GameEvent::InventoryFull);
    }
}

fn use_medkit(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    let player = &mut state.player;
    if player.inventory.medkits == 0 {
        events.push(GameEvent::NoMedkits);
    } else if player.health >= player.max_health {
        events.push(GameEvent::HealthFull);
    } else {
        player.inventory.medkits -= 1;
        let healed = player.heal(settings.medkit_heal);
        events.push(GameEvent::MedkitUsed { healed });
    }
}

fn fire(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    if state.player.is_reloading() {
        return;
    }
    if state.player.ammo == 0 {
        events.push(GameEvent::AmmoEmpty);
        return;
    }
    state.player.ammo -= 1;

    let spread = settings.fire_spread.abs();
    let jitter = if spread > 0.0 {
        state.rng().random_range(-spread..=spread)
    } else {
        0.0
    };
    let dir = direction_from_angle(state.player.facing + jitter);
    let muzzle = state.player.pos + dir * state.player.radius;
    state.spawn_projectile(
        muzzle,
        dir * settings.projectile_speed,
        Faction::Player,
        settings,
    );
    events.push(GameEvent::ShotFired {
        shake: settings.shot_shake,
    });
}

/// Run down an active reload, then handle a new reload request.
///
/// Reloading is a cosmetic delay: the ammo pool is not refilled.
fn reload(
    state: &mut GameState,
    settings: &Settings,
    requested: bool,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let player = &mut state.player;
    if let Some(remaining) = player.reload_remaining.as_mut() {
        *remaining -= dt;
        if *remaining <= 0.0 {
            player.reload_remaining = None;
            events.push(GameEvent::WeaponCycled);
        }
    }

    if requested && !player.is_reloading() && player.ammo < player.max_ammo {
        player.reload_remaining = Some(settings.reload_seconds.max(0.0));
        events.push(GameEvent::ReloadStarted);
    }
}
