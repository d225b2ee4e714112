//! Two-point "vector" effects: a line of fixed length whose start point is
//! limited by the caster's cast range.

use skillshot_core::constants::*;
use skillshot_core::types::{direction_between, Vec2};

use super::{EvalContext, Footprint, ShapeEvaluation};

/// Below this fused score no orientation is worth keeping.
const VECTOR_SCORE_FLOOR: f64 = 1e-3;

pub(crate) fn evaluate(ctx: &EvalContext, target_position: Vec2) -> ShapeEvaluation {
    let center = ctx.region.center;
    let length = ctx.spell.range;
    let cast_range = ctx.spell.first_cast_range();
    let toward_center = direction_between(ctx.source, center).unwrap_or(Vec2::X);

    let mut best: Option<ShapeEvaluation> = None;
    for i in 0..VECTOR_ORIENTATIONS {
        let dir = Vec2::from_angle(std::f64::consts::TAU * i as f64 / VECTOR_ORIENTATIONS as f64);
        let mut first = center - dir * (length / 2.0);
        let mut second = center + dir * (length / 2.0);
        if first.distance(ctx.source) > cast_range {
            first = ctx.source + toward_center * cast_range;
            second = first + dir * length;
        }

        let (hit_chance, physics, behavior) = ctx.score(&Footprint::Capsule {
            start: first,
            end: second,
            radius: ctx.hit_radius,
        });
        if best.map_or(true, |b| hit_chance > b.hit_chance) {
            best = Some(ShapeEvaluation {
                cast_position: second,
                first_cast_position: Some(first),
                hit_chance,
                physics,
                behavior,
            });
        }
    }

    match best {
        Some(b) if b.hit_chance > VECTOR_SCORE_FLOOR => b,
        _ => fallback(ctx, target_position, cast_range, length),
    }
}

/// Start on the target and point away from the caster.
fn fallback(ctx: &EvalContext, target_position: Vec2, cast_range: f64, length: f64) -> ShapeEvaluation {
    let dir = direction_between(ctx.source, target_position).unwrap_or(Vec2::X);
    let first = ctx.source + dir * ctx.source.distance(target_position).min(cast_range);
    ShapeEvaluation {
        cast_position: first + dir * length,
        first_cast_position: Some(first),
        hit_chance: VECTOR_FALLBACK_HIT_CHANCE,
        physics: VECTOR_FALLBACK_HIT_CHANCE,
        behavior: 1.0,
    }
}
