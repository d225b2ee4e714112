//! Hybrid physics + behavior fusion.
//!
//! `HybridFusionEngine` turns one (source, target, spell) request into a
//! `HybridPredictionResult`:
//!
//! 1. validation, fog and range checks
//! 2. edge-case short-circuits (`crate::edge_cases`)
//! 3. reachable region, contextualized behavior grid, confidence
//! 4. shape dispatch and aim search (`circular`, `linear`, `vector`)
//! 5. post-adjustment and opportunity tracking
//!
//! Every footprint answers the same two questions through `Footprint`:
//! how much of the reachable disk it covers, and how much behavior mass
//! it captures.

mod circular;
mod linear;
mod vector;

use tracing::trace;

use skillshot_core::constants::*;
use skillshot_core::enums::{ConeAngleConvention, SpellShape};
use skillshot_core::spell::SpellData;
use skillshot_core::types::Vec2;
use skillshot_core::unit::Unit;

use crate::behavior::{apply_contextual_factors, AppliedBias};
use crate::config::PredictionConfig;
use crate::edge_cases::{EdgeCaseAnalysis, EdgeCaseDecision, EvaluationPlan};
use crate::error::PredictionError;
use crate::pdf::BehaviorPdf;
use crate::physics::{compute_arrival_time, compute_physics_hit_probability, compute_reachable_region, ReachableRegion};
use crate::result::HybridPredictionResult;
use crate::spell_math::effective_range;
use crate::tracker::TargetBehaviorTracker;
use crate::world::WorldView;

// --- Footprints ---

/// Ground area an effect covers once it lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    Circle { center: Vec2, radius: f64 },
    /// Segment swept by a disk of `radius`.
    Capsule { start: Vec2, end: Vec2, radius: f64 },
    /// Sector with its apex at the caster.
    Cone { apex: Vec2, direction: Vec2, half_angle: f64, range: f64 },
}

impl Footprint {
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            Footprint::Circle { center, radius } => point.distance(center) <= radius,
            Footprint::Capsule { start, end, radius } => distance_to_segment(point, start, end) <= radius,
            Footprint::Cone {
                apex,
                direction,
                half_angle,
                range,
            } => {
                let offset = point - apex;
                let distance = offset.length();
                if distance < EPSILON {
                    return true;
                }
                if distance > range {
                    return false;
                }
                let cos = (offset.dot(direction) / distance).clamp(-1.0, 1.0);
                cos.acos() <= half_angle
            }
        }
    }

    /// Fraction of the reachable disk inside the footprint.
    ///
    /// Circles use the exact lens area; other shapes are sampled with a
    /// Fermat spiral over the disk.
    pub fn reachability_overlap(&self, region: &ReachableRegion) -> f64 {
        if let Footprint::Circle { center, radius } = *self {
            return compute_physics_hit_probability(center, radius, region);
        }
        if region.is_degenerate() {
            return if self.contains(region.center) { 1.0 } else { 0.0 };
        }
        let inside = fermat_spiral(region.center, region.max_radius)
            .filter(|p| self.contains(*p))
            .count();
        inside as f64 / SPIRAL_SAMPLES as f64
    }

    /// Behavior mass captured by the footprint.
    pub fn behavior_overlap(&self, pdf: &BehaviorPdf) -> f64 {
        pdf.mass_where(|center| self.contains(center))
    }
}

/// `SPIRAL_SAMPLES` points evenly covering a disk.
pub fn fermat_spiral(center: Vec2, radius: f64) -> impl Iterator<Item = Vec2> {
    (0..SPIRAL_SAMPLES).map(move |i| {
        let t = i as f64 / SPIRAL_SAMPLES as f64;
        let r = radius * t.sqrt();
        let theta = std::f64::consts::TAU * t * SPIRAL_FACTOR;
        center + Vec2::from_angle(theta) * r
    })
}

pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f64 {
    let segment = end - start;
    let len_sq = segment.length_squared();
    if len_sq < EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Cone half-angle in radians under the configured convention.
pub fn cone_half_angle(spell: &SpellData, convention: ConeAngleConvention) -> f64 {
    match convention {
        ConeAngleConvention::WidthAtRange => spell.radius.max(0.0).atan2(spell.range.max(EPSILON)),
        ConeAngleConvention::HalfAngle => spell.cone_angle.to_radians(),
        ConeAngleConvention::FullAngle => (spell.cone_angle / 2.0).to_radians(),
    }
}

// --- Evaluation ---

/// Inputs shared by every shape evaluator.
pub(crate) struct EvalContext<'a> {
    pub source: Vec2,
    pub spell: &'a SpellData,
    pub region: ReachableRegion,
    pub pdf: BehaviorPdf,
    /// Effect radius widened by the target's hitbox.
    pub hit_radius: f64,
    pub confidence: f64,
    pub behavior_weight: f64,
    pub cone_half_angle: f64,
}

impl EvalContext<'_> {
    pub fn fuse(&self, physics: f64, behavior: f64) -> f64 {
        self.confidence * ((1.0 - self.behavior_weight) * physics + self.behavior_weight * behavior)
    }

    /// Score a footprint: (fused, physics, behavior).
    pub fn score(&self, footprint: &Footprint) -> (f64, f64, f64) {
        let physics = footprint.reachability_overlap(&self.region);
        let behavior = footprint.behavior_overlap(&self.pdf);
        (self.fuse(physics, behavior), physics, behavior)
    }
}

/// Best placement found by a shape evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShapeEvaluation {
    pub cast_position: Vec2,
    pub first_cast_position: Option<Vec2>,
    pub hit_chance: f64,
    pub physics: f64,
    pub behavior: f64,
}

/// Orchestrates a single prediction.
#[derive(Debug, Clone, Copy)]
pub struct HybridFusionEngine<'a> {
    config: &'a PredictionConfig,
}

impl<'a> HybridFusionEngine<'a> {
    pub fn new(config: &'a PredictionConfig) -> Self {
        Self { config }
    }

    pub fn compute_hybrid_prediction(
        &self,
        world: &dyn WorldView,
        source: &Unit,
        target: &Unit,
        spell: &SpellData,
        tracker: &mut TargetBehaviorTracker,
    ) -> Result<HybridPredictionResult, PredictionError> {
        validate(source, target, spell)?;
        let now = world.game_time();

        let mut fog_scale = 1.0;
        if !target.visible {
            let Some(last_seen) = tracker.last_sample_time() else {
                return Ok(HybridPredictionResult::rejected("target hidden with no history"));
            };
            let age = (now - last_seen).max(0.0);
            if age > self.config.fog_stale_after {
                return Ok(HybridPredictionResult::rejected("target hidden too long"));
            }
            fog_scale = (-age).exp().max(FOG_CONFIDENCE_FLOOR);
        }

        if source.position.distance(target.position) > effective_range(spell, source, target) + RANGE_CHECK_BUFFER {
            return Ok(HybridPredictionResult::rejected("target out of range"));
        }

        let analysis = EdgeCaseAnalysis::analyze(world, source, target, spell);
        let mut result = match analysis.decide(source, target, spell, self.config) {
            EdgeCaseDecision::Resolved(result) => result,
            EdgeCaseDecision::Evaluate(plan) => {
                let mut result = self.evaluate(world, source, target, spell, tracker, &plan, fog_scale)?;
                if result.is_valid {
                    self.post_adjust(&mut result, &analysis, tracker, now, fog_scale < 1.0);
                }
                result
            }
        };

        if result.is_valid {
            let signals = tracker.get_or_create_window(spell.slot, now).record(now, result.hit_chance, spell);
            result.opportunity_score = signals.score;
            result.adaptive_threshold = signals.adaptive_threshold;
            result.is_peak_opportunity = signals.is_peak;
        }
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        world: &dyn WorldView,
        source: &Unit,
        target: &Unit,
        spell: &SpellData,
        tracker: &mut TargetBehaviorTracker,
        plan: &EvaluationPlan,
        fog_scale: f64,
    ) -> Result<HybridPredictionResult, PredictionError> {
        let now = world.game_time();
        let arrival = compute_arrival_time(source.position, plan.origin, spell.projectile_speed, spell.delay);
        let horizon = (arrival - plan.elapsed).max(0.0);
        let region = compute_reachable_region(plan.origin, tracker.current_velocity(), horizon, target.move_speed, f64::INFINITY);

        let samples = tracker.history().len();
        let mut behavior_weight = self.behavior_weight(samples);
        let mut pdf = tracker.build_behavior_pdf(now, horizon, target.move_speed);
        let mut bias = AppliedBias::default();
        if plan.origin == target.position {
            bias = apply_contextual_factors(&mut pdf, tracker, target, world, self.config);
        } else {
            // History describes the pre-dash position; it says nothing about the endpoint.
            pdf = BehaviorPdf::new(plan.origin, pdf.cell_size);
            pdf.add_weighted_sample(plan.origin, 1.0);
            pdf.normalize();
            behavior_weight = 0.0;
        }
        if pdf.is_empty() {
            behavior_weight = 0.0;
        }

        let confidence = self.compute_confidence_score(source.position, plan.origin, target, spell, tracker, world.ping_secs())
            * plan.confidence_scale
            * fog_scale;

        let ctx = EvalContext {
            source: source.position,
            spell,
            region,
            pdf,
            hit_radius: spell.radius.max(0.0) + target.bounding_radius.max(0.0),
            confidence,
            behavior_weight,
            cone_half_angle: cone_half_angle(spell, self.config.cone_angle_convention),
        };

        let evaluation = match spell.shape {
            _ if spell.is_cone() && spell.shape != SpellShape::Targeted => linear::evaluate_cone(&ctx),
            SpellShape::Targeted => Some(ShapeEvaluation {
                cast_position: plan.origin,
                first_cast_position: None,
                hit_chance: 1.0,
                physics: 1.0,
                behavior: 1.0,
            }),
            SpellShape::Circular => Some(circular::evaluate(&ctx)),
            SpellShape::Linear => linear::evaluate_capsule(&ctx),
            SpellShape::Vector => Some(vector::evaluate(&ctx, plan.origin)),
        };
        let Some(evaluation) = evaluation else {
            return Ok(HybridPredictionResult::rejected("target too close"));
        };
        if !(evaluation.hit_chance.is_finite() && evaluation.cast_position.is_finite()) {
            return Err(PredictionError::NonFinite("shape evaluation"));
        }

        trace!(
            target_id = target.id,
            physics = evaluation.physics,
            behavior = evaluation.behavior,
            confidence,
            hit_chance = evaluation.hit_chance,
            "fused prediction"
        );

        let mut result = HybridPredictionResult {
            cast_position: evaluation.cast_position,
            first_cast_position: evaluation.first_cast_position,
            hit_chance: evaluation.hit_chance,
            physics_contribution: evaluation.physics,
            behavior_contribution: evaluation.behavior,
            confidence_score: confidence,
            arrival_time: Some(arrival),
            reachable_region: ctx.region,
            behavior_pdf: ctx.pdf,
            is_valid: true,
            reasoning: shape_label(spell).to_string(),
            ..Default::default()
        };
        if let Some(note) = plan.note {
            result.annotate(note);
        }
        if bias.animation_lock {
            result.annotate("animation locked");
        }
        if bias.last_hit_targets > 0 {
            result.annotate(&format!("last-hit bias toward {} minion(s)", bias.last_hit_targets));
        }
        Ok(result)
    }

    fn post_adjust(
        &self,
        result: &mut HybridPredictionResult,
        analysis: &EdgeCaseAnalysis,
        tracker: &TargetBehaviorTracker,
        now: f64,
        in_fog: bool,
    ) {
        let multiplier = analysis.confidence_multiplier();
        result.confidence_score = (result.confidence_score * multiplier).clamp(0.0, 1.0);
        result.hit_chance = (result.hit_chance * multiplier).clamp(0.0, 1.0);
        for note in analysis.notes() {
            result.annotate(note);
        }
        if in_fog {
            result.annotate("target in fog of war");
        }

        let floor = tracker.get_stationary_hitchance_boost(now);
        if floor > result.hit_chance {
            result.hit_chance = floor;
            result.annotate("stationary target");
        }
    }

    /// Trust placed in this prediction, in `[CONFIDENCE_MIN, CONFIDENCE_MAX]`.
    pub fn compute_confidence_score(
        &self,
        source: Vec2,
        target_position: Vec2,
        target: &Unit,
        spell: &SpellData,
        tracker: &TargetBehaviorTracker,
        ping_secs: f64,
    ) -> f64 {
        if is_obvious_hit(target, tracker) {
            return OBVIOUS_HIT_CONFIDENCE;
        }

        let mut confidence = 1.0;
        confidence *= (-source.distance(target_position) * CONFIDENCE_DISTANCE_DECAY).exp();
        confidence *= (-ping_secs.max(0.0) * CONFIDENCE_LATENCY_FACTOR).exp();

        if spell.is_instant() {
            confidence *= INSTANT_PROJECTILE_BONUS;
        } else if spell.projectile_speed < SLOW_PROJECTILE_SPEED {
            confidence *= SLOW_PROJECTILE_PENALTY;
        }

        let mobility = (target.move_speed / MOBILITY_REFERENCE_SPEED).clamp(MOBILITY_PENALTY_MIN, MOBILITY_PENALTY_MAX);
        confidence /= mobility;

        let samples = tracker.history().len();
        let min_samples = self.config.min_samples_for_behavior;
        if samples < min_samples {
            confidence *= samples as f64 / min_samples as f64;
        }

        confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
    }

    /// Weight on behavior, rising toward the configured maximum with history.
    pub fn behavior_weight(&self, sample_count: usize) -> f64 {
        let n = sample_count as f64;
        self.config.fusion_max_behavior_weight * n / (n + self.config.fusion_half_samples)
    }

    pub fn fuse_probabilities(&self, physics: f64, behavior: f64, confidence: f64, sample_count: usize) -> f64 {
        let w = self.behavior_weight(sample_count);
        confidence * ((1.0 - w) * physics + w * behavior)
    }
}

/// Locked, channeling, or running a straight line.
pub fn is_obvious_hit(target: &Unit, tracker: &TargetBehaviorTracker) -> bool {
    target.is_animation_locked()
        || tracker.is_animation_locked()
        || target.status.channel.is_some()
        || tracker.is_moving_straight()
}

fn validate(source: &Unit, target: &Unit, spell: &SpellData) -> Result<(), PredictionError> {
    if !source.is_alive {
        return Err(PredictionError::DeadUnit(source.id));
    }
    if !target.is_alive {
        return Err(PredictionError::DeadUnit(target.id));
    }
    if !(source.position.is_finite() && target.position.is_finite() && target.velocity.is_finite()) {
        return Err(PredictionError::NonFinite("unit kinematics"));
    }
    if !(target.move_speed.is_finite() && target.move_speed >= 0.0) {
        return Err(PredictionError::NonFinite("target move speed"));
    }
    if !(spell.range.is_finite() && spell.range > 0.0) {
        return Err(PredictionError::InvalidSpell("range must be positive"));
    }
    if !(spell.radius.is_finite() && spell.radius >= 0.0) {
        return Err(PredictionError::InvalidSpell("radius must be non-negative"));
    }
    if !(spell.delay.is_finite() && spell.delay >= 0.0) {
        return Err(PredictionError::InvalidSpell("delay must be non-negative"));
    }
    if spell.projectile_speed.is_nan() || spell.projectile_speed <= 0.0 {
        return Err(PredictionError::InvalidSpell("projectile speed must be positive"));
    }
    Ok(())
}

fn shape_label(spell: &SpellData) -> &'static str {
    if spell.is_cone() && spell.shape != SpellShape::Targeted {
        return "cone";
    }
    match spell.shape {
        SpellShape::Targeted => "targeted",
        SpellShape::Circular => "circular",
        SpellShape::Linear => "linear",
        SpellShape::Vector => "vector",
    }
}
