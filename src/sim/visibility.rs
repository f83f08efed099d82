//! Visibility polygon by angle sweep over wall endpoints
//!
//! For every wall corner near the viewpoint three rays are cast: one straight
//! at the corner and one just to either side. The side rays are what let the
//! polygon bend around a corner, capturing the lit side and the shadowed
//! side of it. A fixed ring of base rays keeps the polygon round where no
//! walls are close.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::geometry::{Ray, WallSegment, intersect};
use super::walls::WallIndex;
use crate::consts::PROBE_DELTA;
use crate::{bearing, direction_from_angle};

/// Ordered fan of points around an origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    pub origin: Vec2,
    /// Boundary points in ascending angle order
    pub points: Vec<Vec2>,
}

impl VisibilityPolygon {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `p` falls inside one of the fan's triangles
    pub fn contains(&self, p: Vec2) -> bool {
        let n = self.points.len();
        if n < 2 {
            return false;
        }
        (0..n).any(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            point_in_triangle(p, self.origin, a, b)
        })
    }
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Compute the region visible from `viewpoint` within `radius`.
///
/// `circle_probes` evenly spaced base rays are always cast, so an empty
/// neighbourhood yields exactly that many points on the radius circle.
pub fn compute_visibility(
    index: &WallIndex,
    viewpoint: Vec2,
    radius: f32,
    circle_probes: usize,
) -> VisibilityPolygon {
    let candidates: Vec<&WallSegment> = index.query(viewpoint, radius);

    let mut endpoints: Vec<Vec2> = candidates.iter().flat_map(|s| [s.p1, s.p2]).collect();
    endpoints.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    endpoints.dedup();

    let mut angles = Vec::with_capacity(endpoints.len() * 3 + circle_probes);
    for &end in &endpoints {
        if end == viewpoint {
            continue;
        }
        let angle = bearing(viewpoint, end);
        angles.extend([angle - PROBE_DELTA, angle, angle + PROBE_DELTA]);
    }
    for i in 0..circle_probes {
        angles.push(-PI + TAU * i as f32 / circle_probes as f32);
    }
    angles.sort_by(f32::total_cmp);

    let points = angles
        .into_iter()
        .map(|angle| cast(&candidates, viewpoint, angle, radius))
        .collect();

    VisibilityPolygon {
        origin: viewpoint,
        points,
    }
}

/// Nearest wall hit along `angle`, clamped to the radius circle
fn cast(candidates: &[&WallSegment], origin: Vec2, angle: f32, radius: f32) -> Vec2 {
    let ray = Ray::new(origin, direction_from_angle(angle));
    let nearest = candidates
        .iter()
        .filter_map(|s| intersect(&ray, s))
        .map(|hit| hit.t_ray.max(0.0))
        .min_by(f32::total_cmp);

    // Unit direction, so the ray parameter is a distance
    let distance = nearest.map_or(radius, |t| t.min(radius));
    ray.at(distance)
}
