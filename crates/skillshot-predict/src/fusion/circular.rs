//! Circular footprints: coarse grid scan, then local refinement.

use skillshot_core::constants::*;
use skillshot_core::types::Vec2;

use super::{EvalContext, Footprint, ShapeEvaluation};

pub(crate) fn evaluate(ctx: &EvalContext) -> ShapeEvaluation {
    let center = ctx.region.center;
    let extent = ctx.region.max_radius;

    let mut best = Candidate::at(ctx, center);
    if extent > EPSILON {
        let step = 2.0 * extent / (AIM_GRID_SIZE - 1) as f64;
        for i in 0..AIM_GRID_SIZE {
            for j in 0..AIM_GRID_SIZE {
                let aim = center + Vec2::new(-extent + i as f64 * step, -extent + j as f64 * step);
                let candidate = Candidate::at(ctx, aim);
                if candidate.objective > best.objective {
                    best = candidate;
                }
            }
        }
        best = refine(ctx, best);
    }
    best.evaluation
}

/// Aim point ranked by `physics * behavior * confidence`; the fused blend
/// is only reported for the point finally chosen.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    evaluation: ShapeEvaluation,
    objective: f64,
}

impl Candidate {
    fn at(ctx: &EvalContext, aim: Vec2) -> Self {
        let aim = clamp_to_range(ctx.source, aim, ctx.spell.range);
        let footprint = Footprint::Circle {
            center: aim,
            radius: ctx.hit_radius,
        };
        let (hit_chance, physics, behavior) = ctx.score(&footprint);
        Self {
            evaluation: ShapeEvaluation {
                cast_position: aim,
                first_cast_position: None,
                hit_chance,
                physics,
                behavior,
            },
            objective: physics * behavior * ctx.confidence,
        }
    }
}

/// Gradient ascent with fixed-step finite differences; the surface need not be convex.
fn refine(ctx: &EvalContext, mut best: Candidate) -> Candidate {
    for _ in 0..AIM_REFINE_ITERATIONS {
        let origin = best.evaluation.cast_position;
        let mut ascent: Option<(Vec2, f64)> = None;
        for k in 0..AIM_REFINE_DIRECTIONS {
            let dir = Vec2::from_angle(std::f64::consts::TAU * k as f64 / AIM_REFINE_DIRECTIONS as f64);
            let trial = Candidate::at(ctx, origin + dir * AIM_REFINE_DELTA);
            let gain = trial.objective - best.objective;
            if gain > 0.0 && ascent.map_or(true, |(_, g)| gain > g) {
                ascent = Some((dir, gain));
            }
        }
        let Some((dir, _)) = ascent else {
            break;
        };
        let moved = Candidate::at(ctx, origin + dir * AIM_REFINE_STEP);
        if moved.objective <= best.objective {
            break;
        }
        best = moved;
    }
    best
}

fn clamp_to_range(source: Vec2, aim: Vec2, range: f64) -> Vec2 {
    let offset = aim - source;
    let distance = offset.length();
    if distance <= range || distance < EPSILON {
        aim
    } else {
        source + offset / distance * range
    }
}
