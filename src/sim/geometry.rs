//! Ray/segment intersection
//!
//! The one primitive the visibility sweep is built on. Everything here is a
//! pure function of its inputs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INTERSECT_EPSILON;

/// A half-infinite ray. `direction` is not required to be unit length;
/// `Intersection::t_ray` is measured in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `p1` heading through `p2` (direction = p2 - p1)
    pub fn through(p1: Vec2, p2: Vec2) -> Self {
        Self {
            origin: p1,
            direction: p2 - p1,
        }
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}

/// A finite wall face between two tile corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl WallSegment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }
}

/// Where a ray meets a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec2,
    /// Ray parameter of the hit, in units of the ray's direction vector
    pub t_ray: f32,
}

/// Intersect a ray with a segment.
///
/// Returns `None` for parallel (or degenerate) inputs, hits behind the ray
/// origin, and hits outside the segment span. Both parameter checks allow
/// `INTERSECT_EPSILON` of slack so a ray aimed exactly at a segment endpoint
/// still registers.
pub fn intersect(ray: &Ray, segment: &WallSegment) -> Option<Intersection> {
    let seg_dir = segment.p2 - segment.p1;
    let denom = ray.direction.perp_dot(seg_dir);

    // Parallel test is relative to the operand sizes; never divide by ~0
    let scale = ray.direction.length() * seg_dir.length();
    if scale <= f32::EPSILON || denom.abs() <= scale * f32::EPSILON {
        return None;
    }

    let to_seg = segment.p1 - ray.origin;
    let t_ray = to_seg.perp_dot(seg_dir) / denom;
    let t_seg = to_seg.perp_dot(ray.direction) / denom;

    if t_ray < -INTERSECT_EPSILON {
        return None;
    }
    if !(-INTERSECT_EPSILON..=1.0 + INTERSECT_EPSILON).contains(&t_seg) {
        return None;
    }

    Some(Intersection {
        point: ray.at(t_ray),
        t_ray,
    })
}
