//! Small host-facing helpers around `SpellData`.

use skillshot_core::constants::*;
use skillshot_core::enums::TargetingType;
use skillshot_core::spell::SpellData;
use skillshot_core::types::{direction_between, UnitId, Vec2};
use skillshot_core::unit::Unit;

use crate::physics::compute_arrival_time;
use crate::result::HybridPredictionResult;

/// Reach adjusted for the spell's hitbox convention.
pub fn effective_range(spell: &SpellData, source: &Unit, target: &Unit) -> f64 {
    let reach = spell.max_reach();
    match spell.targeting_type {
        TargetingType::CenterToCenter => reach,
        TargetingType::CenterToEdge => reach + target.bounding_radius,
        TargetingType::EdgeToEdge => reach + source.bounding_radius + target.bounding_radius,
    }
}

pub fn is_in_range(spell: &SpellData, source: &Unit, target: &Unit) -> bool {
    source.position.distance(target.position) <= effective_range(spell, source, target)
}

/// Seconds from cast until the effect reaches `point`.
pub fn spell_hit_time(spell: &SpellData, source: Vec2, point: Vec2) -> f64 {
    compute_arrival_time(source, point, spell.projectile_speed, spell.delay)
}

/// Seconds the target needs to walk out of the footprint from its center.
pub fn spell_escape_time(spell: &SpellData, target: &Unit) -> f64 {
    if target.move_speed < 1.0 {
        return f64::MAX;
    }
    (spell.radius + target.bounding_radius) / target.move_speed
}

/// Position after `time` seconds along the unit's waypoints.
///
/// Without a path the unit's velocity is extrapolated linearly.
pub fn predict_on_path(unit: &Unit, time: f64) -> Vec2 {
    if time <= 0.0 {
        return unit.position;
    }
    if unit.path.is_empty() {
        return unit.position + unit.velocity * time;
    }

    let mut remaining = unit.move_speed.max(0.0) * time;
    let mut from = unit.position;
    for &waypoint in &unit.path {
        let leg = from.distance(waypoint);
        if remaining <= leg {
            return match direction_between(from, waypoint) {
                Some(dir) => from + dir * remaining,
                None => waypoint,
            };
        }
        remaining -= leg;
        from = waypoint;
    }
    from
}

/// Pick the (unit, priority) candidate with the best blend of hit chance,
/// priority and proximity. `predict` is asked only for candidates near
/// enough to matter.
pub fn select_best_target(
    source: &Unit,
    spell: &SpellData,
    candidates: &[(Unit, f64)],
    mut predict: impl FnMut(&Unit) -> HybridPredictionResult,
) -> Option<(UnitId, HybridPredictionResult)> {
    let mut best: Option<(f64, UnitId, HybridPredictionResult)> = None;
    for (unit, priority) in candidates {
        if !unit.is_alive || !unit.is_enemy_of(source) {
            continue;
        }
        let distance = source.position.distance(unit.position);
        if distance > spell.range + TARGET_SELECTION_BUFFER {
            continue;
        }
        let prediction = predict(unit);
        if !prediction.is_valid {
            continue;
        }
        let proximity = 1.0 - (distance / spell.range.max(EPSILON)).min(1.0);
        let score = prediction.hit_chance * priority * (0.7 + 0.3 * proximity);
        if best.as_ref().map_or(true, |(s, _, _)| score > *s) {
            best = Some((score, unit.id, prediction));
        }
    }
    best.map(|(_, id, prediction)| (id, prediction))
}
