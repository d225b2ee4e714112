//! Line (capsule) and cone footprints anchored at the caster.
//!
//! Both are aimed by sweeping a small fan of orientations around the
//! direction to the reachable region's center; the fan spans the region's
//! angular width as seen from the caster.

use skillshot_core::constants::*;
use skillshot_core::types::Vec2;

use super::{EvalContext, Footprint, ShapeEvaluation};

pub(crate) fn evaluate_capsule(ctx: &EvalContext) -> Option<ShapeEvaluation> {
    best_orientation(ctx, |dir| Footprint::Capsule {
        start: ctx.source,
        end: ctx.source + dir * ctx.spell.range,
        radius: ctx.hit_radius,
    })
}

pub(crate) fn evaluate_cone(ctx: &EvalContext) -> Option<ShapeEvaluation> {
    best_orientation(ctx, |dir| Footprint::Cone {
        apex: ctx.source,
        direction: dir,
        half_angle: ctx.cone_half_angle,
        range: ctx.spell.range,
    })
}

/// `None` when the region center sits on top of the caster.
fn best_orientation(ctx: &EvalContext, footprint_for: impl Fn(Vec2) -> Footprint) -> Option<ShapeEvaluation> {
    let to_center = ctx.region.center - ctx.source;
    let distance = to_center.length();
    if distance < MIN_SAFE_DISTANCE {
        return None;
    }
    let base_angle = to_center.y.atan2(to_center.x);
    let spread = (ctx.region.max_radius / distance).atan() / ORIENTATION_FAN_STEPS as f64;
    let reach = distance.min(ctx.spell.range);

    // Center first so ties keep the straight shot.
    let fan = std::iter::once(0).chain((1..=ORIENTATION_FAN_STEPS).flat_map(|m| [-m, m]));
    let mut best: Option<ShapeEvaluation> = None;
    for k in fan {
        let dir = Vec2::from_angle(base_angle + k as f64 * spread);
        let (hit_chance, physics, behavior) = ctx.score(&footprint_for(dir));
        if best.map_or(true, |b| hit_chance > b.hit_chance) {
            best = Some(ShapeEvaluation {
                cast_position: ctx.source + dir * reach,
                first_cast_position: None,
                hit_chance,
                physics,
                behavior,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::BehaviorPdf;
    use crate::physics::compute_reachable_region;
    use skillshot_core::spell::SpellData;

    fn context(spell: &SpellData, center: Vec2, radius: f64, pdf: BehaviorPdf) -> EvalContext<'_> {
        EvalContext {
            source: Vec2::ZERO,
            spell,
            region: compute_reachable_region(center, Vec2::ZERO, 1.0, radius, f64::INFINITY),
            pdf,
            hit_radius: 100.0,
            confidence: 1.0,
            behavior_weight: 0.5,
            cone_half_angle: 0.3,
        }
    }

    #[test]
    fn test_capsule_points_at_region() {
        let spell = SpellData {
            range: 1100.0,
            ..Default::default()
        };
        let ctx = context(&spell, Vec2::new(0.0, 700.0), 150.0, BehaviorPdf::new(Vec2::ZERO, 25.0));
        let best = evaluate_capsule(&ctx).unwrap();
        assert!(best.cast_position.x.abs() < 1e-6);
        assert!((best.cast_position.y - 700.0).abs() < 1e-6);
        assert!(best.physics > 0.5);
    }

    #[test]
    fn test_fan_turns_toward_behavior_mass() {
        let spell = SpellData {
            range: 1100.0,
            ..Default::default()
        };
        let center = Vec2::new(700.0, 0.0);
        let mut pdf = BehaviorPdf::new(center, 25.0);
        pdf.add_weighted_sample(Vec2::new(700.0, 250.0), 1.0);
        pdf.normalize();
        let best = evaluate_capsule(&context(&spell, center, 300.0, pdf)).unwrap();
        assert!(best.cast_position.y > 0.0);
    }

    #[test]
    fn test_too_close_is_rejected() {
        let spell = SpellData::default();
        let ctx = context(&spell, Vec2::new(0.5, 0.0), 100.0, BehaviorPdf::new(Vec2::ZERO, 25.0));
        assert!(evaluate_capsule(&ctx).is_none());
        assert!(evaluate_cone(&ctx).is_none());
    }

    #[test]
    fn test_cone_covers_nearby_region() {
        let spell = SpellData {
            range: 600.0,
            cone_angle: 40.0,
            ..Default::default()
        };
        let ctx = context(&spell, Vec2::new(400.0, 0.0), 50.0, BehaviorPdf::new(Vec2::ZERO, 25.0));
        let best = evaluate_cone(&ctx).unwrap();
        assert_eq!(best.physics, 1.0);
        assert_eq!(best.hit_chance, 1.0);
    }
}
