//! Gameplay tuning
//!
//! Every balance number the simulation reads. Loadable from JSON so a
//! presentation layer or the demo binary can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Player ===
    pub player_radius: f32,
    /// Movement speed (world units/sec)
    pub player_speed: f32,
    pub max_health: i32,
    pub max_ammo: u32,
    pub start_ammo: u32,
    pub max_medkits: u32,
    pub start_medkits: u32,
    /// Health restored per medkit
    pub medkit_heal: i32,
    /// Ammo granted per ammo pickup
    pub ammo_pickup_amount: u32,
    /// How close a pickup must be to interact with it
    pub pickup_reach: f32,

    // === Weapon ===
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_lifetime_ticks: u32,
    /// Damage dealt by player projectiles
    pub player_damage: i32,
    /// Half-width of the random aim spread (radians)
    pub fire_spread: f32,
    /// Reload duration (real-time seconds)
    pub reload_seconds: f32,
    /// Camera shake impulse reported with each shot
    pub shot_shake: f32,

    // === Agents ===
    pub agent_radius: f32,
    pub agent_health: i32,
    pub agent_speed: f32,
    /// Distance at which an idle agent starts chasing (no line of sight needed)
    pub aggro_radius: f32,
    pub agent_fire_range: f32,
    /// Ticks an agent waits between shots
    pub agent_fire_cooldown_ticks: u32,
    pub agent_projectile_speed: f32,
    /// Damage dealt by agent projectiles
    pub agent_damage: i32,
    /// Chance (0-1) that a downed agent drops a pickup
    pub loot_drop_chance: f64,
    /// Suggested agent/pickup spawns closer than this to the player are dropped
    pub min_spawn_distance: f32,

    // === Effects ===
    pub particles_per_impact: u32,
    pub particle_speed: f32,
    pub particle_lifetime_ticks: u32,

    // === Visibility ===
    pub view_radius: f32,
    /// Evenly spaced rays always cast, so open space still yields a circle
    pub circle_probes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Player
            player_radius: 10.0,
            player_speed: 160.0,
            max_health: 100,
            max_ammo: 30,
            start_ammo: 12,
            max_medkits: 5,
            start_medkits: 1,
            medkit_heal: 35,
            ammo_pickup_amount: 10,
            pickup_reach: 40.0,

            // Weapon
            projectile_speed: 600.0,
            projectile_radius: 3.0,
            projectile_lifetime_ticks: 90,
            player_damage: 10,
            fire_spread: 0.05,
            reload_seconds: 1.5,
            shot_shake: 4.0,

            // Agents
            agent_radius: 12.0,
            agent_health: 30,
            agent_speed: 90.0,
            aggro_radius: 300.0,
            agent_fire_range: 350.0,
            agent_fire_cooldown_ticks: 90,
            agent_projectile_speed: 300.0,
            agent_damage: 10,
            loot_drop_chance: 0.4,
            min_spawn_distance: 160.0,

            // Effects
            particles_per_impact: 3,
            particle_speed: 120.0,
            particle_lifetime_ticks: 20,

            // Visibility
            view_radius: 400.0,
            circle_probes: 64,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("max_health", self.max_health),
            ("agent_health", self.agent_health),
        ] {
            if value <= 0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        for (field, value) in [
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("pickup_reach", self.pickup_reach),
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("fire_spread", self.fire_spread),
            ("reload_seconds", self.reload_seconds),
            ("shot_shake", self.shot_shake),
            ("agent_radius", self.agent_radius),
            ("agent_speed", self.agent_speed),
            ("aggro_radius", self.aggro_radius),
            ("agent_fire_range", self.agent_fire_range),
            ("agent_projectile_speed", self.agent_projectile_speed),
            ("min_spawn_distance", self.min_spawn_distance),
            ("particle_speed", self.particle_speed),
            ("view_radius", self.view_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }

        if !(0.0..=1.0).contains(&self.loot_drop_chance) {
            return Err(SettingsError::Invalid {
                field: "loot_drop_chance",
                reason: "must be between 0 and 1",
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
