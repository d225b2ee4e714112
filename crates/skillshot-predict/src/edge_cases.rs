//! Game-state conditions that override normal prediction.
//!
//! Stasis, channels, hard crowd-control and dashes make the target's
//! position known (or unreachable); clones and wind walls make the cast
//! pointless. These are decided before any shape is evaluated.

use tracing::debug;

use skillshot_core::constants::*;
use skillshot_core::enums::{ChannelKind, SpellShape};
use skillshot_core::spell::SpellData;
use skillshot_core::types::Vec2;
use skillshot_core::unit::{ChannelState, DashState, StasisState, Unit};

use crate::config::PredictionConfig;
use crate::physics::compute_arrival_time;
use crate::result::HybridPredictionResult;
use crate::world::WorldView;

/// Flags gathered from the source, the target, and the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeCaseAnalysis {
    pub is_clone: bool,
    pub blocked_by_windwall: bool,
    pub stasis: Option<StasisState>,
    pub channel: Option<ChannelState>,
    pub dash: Option<DashState>,
    pub hard_cc_remaining: Option<f64>,
    pub is_slowed: bool,
    pub has_spell_shield: bool,
    /// The caster cannot be seen by the target's team.
    pub source_hidden: bool,
}

/// How the engine should proceed after edge-case analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeCaseDecision {
    /// Final answer, valid or not.
    Resolved(HybridPredictionResult),
    /// Run the shape evaluator with these adjustments.
    Evaluate(EvaluationPlan),
}

/// Adjustments applied to a normal shape evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPlan {
    /// Where the target is assumed to start moving from.
    pub origin: Vec2,
    /// Seconds of the flight already spent reaching `origin`.
    pub elapsed: f64,
    /// Extra factor on the confidence score.
    pub confidence_scale: f64,
    pub note: Option<&'static str>,
}

impl EvaluationPlan {
    fn from_position(origin: Vec2) -> Self {
        Self {
            origin,
            elapsed: 0.0,
            confidence_scale: 1.0,
            note: None,
        }
    }
}

impl EdgeCaseAnalysis {
    pub fn analyze(world: &dyn WorldView, source: &Unit, target: &Unit, spell: &SpellData) -> Self {
        let projectile = spell.shape != SpellShape::Targeted && !spell.is_instant();
        Self {
            is_clone: target.status.is_clone,
            blocked_by_windwall: projectile && world.projectile_blocked(source.position, target.position, source.team),
            stasis: target.status.stasis,
            channel: target.status.channel,
            dash: target.status.dash,
            hard_cc_remaining: target.status.hard_cc_remaining.filter(|t| *t > 0.0),
            is_slowed: target.status.is_slowed,
            has_spell_shield: target.status.has_spell_shield,
            source_hidden: !source.visible,
        }
    }

    /// Multiplier on confidence and hit chance once a shape was evaluated.
    pub fn confidence_multiplier(&self) -> f64 {
        let mut multiplier = 1.0;
        if self.is_slowed {
            multiplier *= SLOWED_MULTIPLIER;
        }
        if self.source_hidden {
            multiplier *= HIDDEN_SOURCE_MULTIPLIER;
        }
        multiplier
    }

    /// Notes appended to the reasoning of an evaluated result.
    pub fn notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if self.is_slowed {
            notes.push("target slowed");
        }
        if self.has_spell_shield {
            notes.push("spell shield active, the effect will be absorbed");
        }
        if self.source_hidden {
            notes.push("caster hidden from target");
        }
        notes
    }

    pub fn decide(&self, source: &Unit, target: &Unit, spell: &SpellData, config: &PredictionConfig) -> EdgeCaseDecision {
        let decision = self.decide_inner(source, target, spell, config);
        if let EdgeCaseDecision::Resolved(result) = &decision {
            debug!(
                target_id = target.id,
                valid = result.is_valid,
                reasoning = %result.reasoning,
                "edge case resolved prediction"
            );
        }
        decision
    }

    fn decide_inner(&self, source: &Unit, target: &Unit, spell: &SpellData, config: &PredictionConfig) -> EdgeCaseDecision {
        use EdgeCaseDecision::*;

        if self.is_clone {
            return Resolved(HybridPredictionResult::rejected("target is a clone"));
        }
        if self.blocked_by_windwall {
            return Resolved(HybridPredictionResult::rejected("projectile blocked by wind wall"));
        }

        if let Some(stasis) = &self.stasis {
            let arrival = compute_arrival_time(source.position, stasis.exit_position, spell.projectile_speed, spell.delay);
            let cast_delay = stasis.remaining - arrival;
            if cast_delay < -STASIS_TIMING_TOLERANCE {
                return Resolved(HybridPredictionResult::rejected(format!(
                    "stasis: travel time exceeds remaining stasis by {:.2}s",
                    -cast_delay
                )));
            }
            if cast_delay > STASIS_TIMING_TOLERANCE {
                return Resolved(HybridPredictionResult::rejected(format!(
                    "stasis: wait {cast_delay:.2}s before casting"
                )));
            }
            let mut result = HybridPredictionResult::guaranteed(stasis.exit_position, "stasis exit timed");
            result.arrival_time = Some(arrival);
            return Resolved(result);
        }

        if let Some(channel) = &self.channel {
            let arrival = compute_arrival_time(source.position, channel.position, spell.projectile_speed, spell.delay);
            if arrival > channel.remaining {
                return Resolved(HybridPredictionResult::rejected(
                    "channel ends before the effect arrives",
                ));
            }
            let reason = match channel.kind {
                ChannelKind::Channel => "channel interrupt",
                ChannelKind::Recall => "recall interrupt",
            };
            let mut result = HybridPredictionResult::guaranteed(channel.position, reason);
            result.arrival_time = Some(arrival);
            return Resolved(result);
        }

        if let Some(remaining) = self.hard_cc_remaining {
            let arrival = compute_arrival_time(source.position, target.position, spell.projectile_speed, spell.delay);
            if remaining >= arrival {
                let mut result = HybridPredictionResult::guaranteed(target.position, "immobilized");
                result.arrival_time = Some(arrival);
                return Resolved(result);
            }
        }

        if let (Some(dash), true) = (&self.dash, config.enable_dash_prediction) {
            if source.position.distance(dash.end_position) > spell.range {
                return Resolved(HybridPredictionResult::rejected("dash endpoint out of range"));
            }
            let arrival = compute_arrival_time(source.position, dash.end_position, spell.projectile_speed, spell.delay);
            if arrival >= dash.remaining {
                return Evaluate(EvaluationPlan {
                    origin: dash.end_position,
                    elapsed: dash.remaining,
                    confidence_scale: 1.0,
                    note: Some("aiming at dash endpoint"),
                });
            }
            return Evaluate(EvaluationPlan {
                confidence_scale: MID_DASH_CONFIDENCE,
                note: Some("effect lands mid-dash"),
                ..EvaluationPlan::from_position(target.position)
            });
        }

        Evaluate(EvaluationPlan::from_position(target.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillshot_core::types::UnitId;

    struct EmptyWorld {
        blocked: bool,
    }

    impl WorldView for EmptyWorld {
        fn game_time(&self) -> f64 {
            0.0
        }
        fn ping_secs(&self) -> f64 {
            0.0
        }
        fn unit(&self, _id: UnitId) -> Option<Unit> {
            None
        }
        fn units_near(&self, _center: Vec2, _radius: f64) -> Vec<Unit> {
            Vec::new()
        }
        fn hero_ids(&self) -> Vec<UnitId> {
            Vec::new()
        }
        fn projectile_blocked(&self, _from: Vec2, _to: Vec2, _team: u32) -> bool {
            self.blocked
        }
    }

    fn setup() -> (Unit, Unit, SpellData) {
        let source = Unit::hero(1, 1, Vec2::ZERO);
        let target = Unit::hero(2, 2, Vec2::new(600.0, 0.0));
        let spell = SpellData {
            delay: 0.2,
            projectile_speed: 1500.0,
            range: 1000.0,
            ..Default::default()
        };
        (source, target, spell)
    }

    fn decide(source: &Unit, target: &Unit, spell: &SpellData, world: &EmptyWorld) -> EdgeCaseDecision {
        EdgeCaseAnalysis::analyze(world, source, target, spell).decide(source, target, spell, &PredictionConfig::default())
    }

    fn resolved(decision: EdgeCaseDecision) -> HybridPredictionResult {
        match decision {
            EdgeCaseDecision::Resolved(r) => r,
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_and_windwall_rejected() {
        let (source, mut target, spell) = setup();
        target.status.is_clone = true;
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(!r.is_valid);

        target.status.is_clone = false;
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: true }));
        assert!(r.reasoning.contains("wind wall"));
    }

    #[test]
    fn test_windwall_ignored_for_instant_effects() {
        let (source, target, mut spell) = setup();
        spell.projectile_speed = f64::MAX;
        let d = decide(&source, &target, &spell, &EmptyWorld { blocked: true });
        assert!(matches!(d, EdgeCaseDecision::Evaluate(_)));
    }

    #[test]
    fn test_stasis_timing() {
        let (source, mut target, spell) = setup();
        // Arrival = 0.2 + 600/1500 = 0.6.
        let exit = target.position;
        target.status.stasis = Some(StasisState {
            exit_position: exit,
            remaining: 0.6,
        });
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(r.is_valid);
        assert_eq!(r.hit_chance, 1.0);
        assert_eq!(r.cast_position, exit);

        target.status.stasis = Some(StasisState {
            exit_position: exit,
            remaining: 1.5,
        });
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(!r.is_valid);
        assert!(r.reasoning.contains("wait"));
    }

    #[test]
    fn test_channel_interrupt() {
        let (source, mut target, spell) = setup();
        target.status.channel = Some(ChannelState {
            position: target.position,
            remaining: 2.0,
            kind: ChannelKind::Recall,
        });
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(r.is_valid);
        assert_eq!(r.reasoning, "recall interrupt");

        target.status.channel = Some(ChannelState {
            position: target.position,
            remaining: 0.3,
            kind: ChannelKind::Channel,
        });
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(!r.is_valid);
    }

    #[test]
    fn test_short_cc_falls_through() {
        let (source, mut target, spell) = setup();
        target.status.hard_cc_remaining = Some(0.1);
        let d = decide(&source, &target, &spell, &EmptyWorld { blocked: false });
        assert!(matches!(d, EdgeCaseDecision::Evaluate(_)));
    }

    #[test]
    fn test_dash_handling() {
        let (source, mut target, spell) = setup();
        target.status.dash = Some(DashState {
            end_position: Vec2::new(1400.0, 0.0),
            remaining: 0.2,
        });
        let r = resolved(decide(&source, &target, &spell, &EmptyWorld { blocked: false }));
        assert!(r.reasoning.contains("out of range"));

        target.status.dash = Some(DashState {
            end_position: Vec2::new(800.0, 0.0),
            remaining: 0.2,
        });
        match decide(&source, &target, &spell, &EmptyWorld { blocked: false }) {
            EdgeCaseDecision::Evaluate(plan) => {
                assert_eq!(plan.origin, Vec2::new(800.0, 0.0));
                assert_eq!(plan.elapsed, 0.2);
            }
            other => panic!("unexpected {other:?}"),
        }

        target.status.dash = Some(DashState {
            end_position: Vec2::new(800.0, 0.0),
            remaining: 5.0,
        });
        match decide(&source, &target, &spell, &EmptyWorld { blocked: false }) {
            EdgeCaseDecision::Evaluate(plan) => assert_eq!(plan.confidence_scale, MID_DASH_CONFIDENCE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_dash_prediction_can_be_disabled() {
        let (source, mut target, spell) = setup();
        target.status.dash = Some(DashState {
            end_position: Vec2::new(5000.0, 0.0),
            remaining: 0.2,
        });
        let config = PredictionConfig {
            enable_dash_prediction: false,
            ..Default::default()
        };
        let world = EmptyWorld { blocked: false };
        let d = EdgeCaseAnalysis::analyze(&world, &source, &target, &spell).decide(&source, &target, &spell, &config);
        assert!(matches!(d, EdgeCaseDecision::Evaluate(plan) if plan.origin == target.position));
    }

    #[test]
    fn test_multiplier() {
        let analysis = EdgeCaseAnalysis {
            is_slowed: true,
            source_hidden: true,
            ..Default::default()
        };
        assert!((analysis.confidence_multiplier() - 1.15 * 1.35).abs() < 1e-12);
        assert_eq!(EdgeCaseAnalysis::default().confidence_multiplier(), 1.0);
    }
}
