//! Output record of a prediction.

use serde::{Deserialize, Serialize};

use skillshot_core::enums::HitChance;
use skillshot_core::types::Vec2;

use crate::pdf::BehaviorPdf;
use crate::physics::ReachableRegion;

/// Where to aim and how likely the effect is to land.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HybridPredictionResult {
    pub cast_position: Vec2,
    /// First cast point of two-point vector effects.
    pub first_cast_position: Option<Vec2>,
    pub hit_chance: f64,
    pub physics_contribution: f64,
    pub behavior_contribution: f64,
    pub confidence_score: f64,
    /// Seconds until the effect lands, when an evaluator computed it.
    pub arrival_time: Option<f64>,
    pub reachable_region: ReachableRegion,
    pub behavior_pdf: BehaviorPdf,
    pub is_valid: bool,
    /// Human-readable account of the decision.
    pub reasoning: String,
    pub opportunity_score: f64,
    pub adaptive_threshold: f64,
    pub is_peak_opportunity: bool,
}

impl HybridPredictionResult {
    /// Invalid result carrying the reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reasoning: reason.into(),
            ..Default::default()
        }
    }

    /// Deterministic hit at a known position.
    pub fn guaranteed(position: Vec2, reasoning: impl Into<String>) -> Self {
        Self {
            cast_position: position,
            hit_chance: 1.0,
            physics_contribution: 1.0,
            behavior_contribution: 1.0,
            confidence_score: 1.0,
            reachable_region: ReachableRegion::fixed(position),
            is_valid: true,
            reasoning: reasoning.into(),
            ..Default::default()
        }
    }

    pub fn hit_chance_level(&self) -> HitChance {
        if !self.is_valid {
            return HitChance::Any;
        }
        HitChance::from_probability(self.hit_chance)
    }

    /// Valid and at or above the requested bucket.
    pub fn meets(&self, wanted: HitChance) -> bool {
        self.is_valid && self.hit_chance >= wanted.min_probability()
    }

    pub(crate) fn annotate(&mut self, note: &str) {
        if !self.reasoning.is_empty() {
            self.reasoning.push_str("; ");
        }
        self.reasoning.push_str(note);
    }
}
