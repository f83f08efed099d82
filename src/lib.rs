//! Shadowcrawl - tile arena visibility and actor simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, walls, visibility, entities, tick)
//! - `arena`: Arena Provider contract and the plain-text arena format
//! - `settings`: Data-driven gameplay tuning
//! - `error`: Load-time error types

pub mod arena;
pub mod error;
pub mod settings;
pub mod sim;

pub use arena::Arena;
pub use error::{ArenaError, SettingsError};
pub use settings::Settings;
pub use sim::Simulation;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per render callback)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Edge length of one tile in world units
    pub const TILE_SIZE: f32 = 32.0;

    /// Slack on ray/segment parameters so rays grazing a corner still hit it
    pub const INTERSECT_EPSILON: f32 = 1e-4;
    /// Angular offset of the two side probes cast around every wall endpoint
    pub const PROBE_DELTA: f32 = 1e-5;

    /// Extra distance added to radii sums for projectile hits
    pub const HIT_PAD: f32 = 2.0;
    /// Per-tick velocity multiplier for particles
    pub const PARTICLE_DECAY: f32 = 0.9;
    /// Bob phase speed for pickups (radians/sec)
    pub const PICKUP_BOB_SPEED: f32 = 4.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `theta`
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Bearing of `to` as seen from `from` (radians, atan2 convention)
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bearing_matches_direction() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(10.0, 50.0);
        let theta = bearing(from, to);
        assert!((theta - PI / 2.0).abs() < 1e-6);

        let dir = direction_from_angle(theta);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
    }
}
