//! Kinematic reachability for a moving point target.
//!
//! Provides the reachable-disk model, circle-circle overlap, and
//! projectile arrival time. All functions are pure.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use skillshot_core::constants::{EPSILON, INSTANT_SPEED_SENTINEL};
use skillshot_core::types::Vec2;

/// Points used to discretize the boundary of a reachable disk.
const BOUNDARY_POINTS: usize = 32;

/// Disk of positions a target can occupy after a time horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachableRegion {
    pub center: Vec2,
    pub max_radius: f64,
    pub area: f64,
    pub boundary: Vec<Vec2>,
}

impl ReachableRegion {
    /// Zero-radius region: the target cannot move.
    pub fn fixed(center: Vec2) -> Self {
        Self {
            center,
            ..Default::default()
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.area < EPSILON
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.max_radius + EPSILON
    }
}

/// Reachable disk after `time` seconds.
///
/// Two-phase kinematics: accelerate from the current speed toward
/// `max_speed` for `min(time, Δv/accel)`, then cover the remainder at
/// `max_speed`. A non-finite or non-positive `acceleration` means speed
/// changes are instant.
pub fn compute_reachable_region(
    position: Vec2,
    velocity: Vec2,
    time: f64,
    max_speed: f64,
    acceleration: f64,
) -> ReachableRegion {
    if time < EPSILON || max_speed <= 0.0 {
        return ReachableRegion::fixed(position);
    }

    let current_speed = velocity.length();
    let speed_diff = max_speed - current_speed;

    let max_distance = if speed_diff > 0.0 && acceleration.is_finite() && acceleration > 0.0 {
        let accel_time = (speed_diff / acceleration).min(time);
        let accel_distance = current_speed * accel_time + 0.5 * acceleration * accel_time * accel_time;
        accel_distance + max_speed * (time - accel_time)
    } else {
        max_speed * time
    };

    let boundary = (0..BOUNDARY_POINTS)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / BOUNDARY_POINTS as f64;
            position + Vec2::from_angle(angle) * max_distance
        })
        .collect();

    ReachableRegion {
        center: position,
        max_radius: max_distance,
        area: PI * max_distance * max_distance,
        boundary,
    }
}

/// Fraction of the reachable disk covered by a circular footprint.
///
/// A degenerate (zero-area) region is a point: the probability is 1 if the
/// footprint covers it and 0 otherwise.
pub fn compute_physics_hit_probability(aim_point: Vec2, radius: f64, region: &ReachableRegion) -> f64 {
    if region.is_degenerate() {
        return if aim_point.distance(region.center) <= radius {
            1.0
        } else {
            0.0
        };
    }

    let overlap = circle_circle_intersection_area(aim_point, radius, region.center, region.max_radius);
    (overlap / region.area).min(1.0)
}

/// Seconds until an effect cast now reaches `target_pos`.
pub fn compute_arrival_time(source_pos: Vec2, target_pos: Vec2, projectile_speed: f64, cast_delay: f64) -> f64 {
    if is_instant_speed(projectile_speed) {
        return cast_delay;
    }
    cast_delay + source_pos.distance(target_pos) / projectile_speed
}

/// Instant when the speed is the sentinel, non-finite, or effectively zero.
pub fn is_instant_speed(projectile_speed: f64) -> bool {
    !projectile_speed.is_finite() || projectile_speed >= INSTANT_SPEED_SENTINEL || projectile_speed < EPSILON
}

/// Area of overlap between two circles.
pub fn circle_circle_intersection_area(c1: Vec2, r1: f64, c2: Vec2, r2: f64) -> f64 {
    if r1 < EPSILON || r2 < EPSILON {
        return 0.0;
    }

    let d = c1.distance(c2);

    if d >= r1 + r2 {
        return 0.0;
    }

    // Containment, including coincident centers.
    if d <= (r1 - r2).abs() || d < EPSILON {
        let smaller = r1.min(r2);
        return PI * smaller * smaller;
    }

    let d2 = d * d;
    let r1_2 = r1 * r1;
    let r2_2 = r2 * r2;

    let alpha = ((d2 + r1_2 - r2_2) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let beta = ((d2 + r2_2 - r1_2) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();

    let mut area = r1_2 * alpha + r2_2 * beta;

    // Can dip below zero from rounding near tangency.
    let sqrt_term = (r1 + r2 - d) * (r1 - r2 + d) * (-r1 + r2 + d) * (r1 + r2 + d);
    if sqrt_term > 0.0 {
        area -= 0.5 * sqrt_term.sqrt();
    }

    area.max(0.0)
}
