//! Context biases layered on top of the learned behavior grid.
//!
//! Biases reshape an existing distribution. An empty grid carries no
//! information and is left neutral.

use skillshot_core::constants::*;
use skillshot_core::enums::UnitKind;
use skillshot_core::types::{direction_between, Vec2};
use skillshot_core::unit::Unit;

use crate::config::PredictionConfig;
use crate::pdf::BehaviorPdf;
use crate::tracker::TargetBehaviorTracker;
use crate::world::WorldView;

/// Confidence that the path ends in auto-attack range of the minion.
const CS_PATH_IN_RANGE: f64 = 0.85;
const CS_PATH_NEAR_RANGE: f64 = 0.5;
const CS_PATH_RANGE_SLACK: f64 = 50.0;
const CS_PATH_NEAR_SLACK: f64 = 150.0;

/// Velocity alignment toward the minion, strong then weak.
const CS_ALIGN_STRONG_DOT: f64 = 0.7;
const CS_ALIGN_STRONG: f64 = 0.6;
const CS_ALIGN_WEAK_DOT: f64 = 0.3;
const CS_ALIGN_WEAK: f64 = 0.4;

/// A minion the target is likely walking up to last-hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastHitCandidate {
    /// Where the target is expected to stand while attacking.
    pub attack_position: Vec2,
    pub confidence: f64,
}

/// Which biases were applied by `apply_contextual_factors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedBias {
    pub animation_lock: bool,
    pub last_hit_targets: usize,
}

/// Apply every enabled context bias to `pdf` and re-normalize.
pub fn apply_contextual_factors(
    pdf: &mut BehaviorPdf,
    tracker: &TargetBehaviorTracker,
    target: &Unit,
    world: &dyn WorldView,
    config: &PredictionConfig,
) -> AppliedBias {
    let mut applied = AppliedBias::default();
    if pdf.is_empty() {
        return applied;
    }

    if config.animation_lock_bias_enabled && (tracker.is_animation_locked() || target.is_animation_locked()) {
        pdf.add_point_mass(target.position, ANIMATION_LOCK_BIAS_WEIGHT);
        applied.animation_lock = true;
    }

    if config.cs_bias_enabled && target.kind == UnitKind::Hero {
        for candidate in last_hit_candidates(target, world) {
            pdf.add_weighted_sample(candidate.attack_position, 1.0 + candidate.confidence);
            applied.last_hit_targets += 1;
        }
    }

    if applied != AppliedBias::default() {
        pdf.normalize();
    }
    applied
}

/// Low-health enemy minions near `target` worth walking to, strongest first.
pub fn last_hit_candidates(target: &Unit, world: &dyn WorldView) -> Vec<LastHitCandidate> {
    let mut candidates: Vec<LastHitCandidate> = world
        .units_near(target.position, CS_SEARCH_RADIUS)
        .iter()
        .filter(|m| m.kind == UnitKind::Minion && m.is_alive && m.is_enemy_of(target))
        .filter_map(|minion| score_minion(target, minion))
        .filter(|c| c.confidence >= CS_MIN_CONFIDENCE)
        .collect();
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    candidates
}

fn score_minion(target: &Unit, minion: &Unit) -> Option<LastHitCandidate> {
    let ad = target.attack_damage.max(EPSILON);
    if minion.health > CS_HEALTH_AD_MULTIPLE * ad {
        return None;
    }
    let distance = target.position.distance(minion.position);
    if distance > CS_SEARCH_RADIUS {
        return None;
    }

    let hp_conf = if minion.health <= 1.2 * ad {
        0.8
    } else if minion.health <= 2.0 * ad {
        0.5
    } else {
        0.3
    };
    let dist_conf = 1.0 - distance / CS_SEARCH_RADIUS;
    let path_conf = path_confidence(target, minion)?;
    let confidence = 0.5 * hp_conf + 0.2 * dist_conf + 0.3 * path_conf;

    // Stand at auto-attack range on the target's side of the minion.
    let away = direction_between(minion.position, target.position).unwrap_or(Vec2::X);
    Some(LastHitCandidate {
        attack_position: minion.position + away * target.attack_range,
        confidence,
    })
}

fn path_confidence(target: &Unit, minion: &Unit) -> Option<f64> {
    if let Some(end) = target.path.last() {
        let d = end.distance(minion.position);
        if d <= target.attack_range + CS_PATH_RANGE_SLACK {
            return Some(CS_PATH_IN_RANGE);
        }
        if d <= target.attack_range + CS_PATH_NEAR_SLACK {
            return Some(CS_PATH_NEAR_RANGE);
        }
    }

    let heading = target.velocity.try_normalize()?;
    let toward = direction_between(target.position, minion.position)?;
    let dot = heading.dot(toward);
    if dot > CS_ALIGN_STRONG_DOT {
        Some(CS_ALIGN_STRONG)
    } else if dot > CS_ALIGN_WEAK_DOT {
        Some(CS_ALIGN_WEAK)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillshot_core::types::UnitId;

    struct Lane {
        units: Vec<Unit>,
    }

    impl WorldView for Lane {
        fn game_time(&self) -> f64 {
            0.0
        }
        fn ping_secs(&self) -> f64 {
            0.0
        }
        fn unit(&self, id: UnitId) -> Option<Unit> {
            self.units.iter().find(|u| u.id == id).cloned()
        }
        fn units_near(&self, center: Vec2, radius: f64) -> Vec<Unit> {
            self.units
                .iter()
                .filter(|u| u.position.distance(center) <= radius)
                .cloned()
                .collect()
        }
        fn hero_ids(&self) -> Vec<UnitId> {
            Vec::new()
        }
    }

    fn walking_hero() -> Unit {
        let mut hero = Unit::hero(1, 1, Vec2::ZERO);
        hero.velocity = Vec2::new(340.0, 0.0);
        hero
    }

    #[test]
    fn test_low_minion_ahead_is_a_candidate() {
        let hero = walking_hero();
        let lane = Lane {
            units: vec![
                Unit::minion(10, 2, Vec2::new(300.0, 0.0), 50.0),
                // Too healthy.
                Unit::minion(11, 2, Vec2::new(300.0, 50.0), 500.0),
                // Allied.
                Unit::minion(12, 1, Vec2::new(250.0, 0.0), 10.0),
            ],
        };
        let found = last_hit_candidates(&hero, &lane);
        assert_eq!(found.len(), 1);
        // hp 0.8, dist 0.4, aligned 0.6.
        let expected = 0.5 * 0.8 + 0.2 * 0.4 + 0.3 * 0.6;
        assert!((found[0].confidence - expected).abs() < 1e-9);
        // Attack position sits on the hero's side of the minion.
        assert!((found[0].attack_position.x - (300.0 - 550.0)).abs() < 1e-9);
    }

    #[test]
    fn test_minion_behind_is_ignored() {
        let hero = walking_hero();
        let lane = Lane {
            units: vec![Unit::minion(10, 2, Vec2::new(-300.0, 0.0), 50.0)],
        };
        assert!(last_hit_candidates(&hero, &lane).is_empty());
    }

    #[test]
    fn test_path_end_near_minion() {
        let mut hero = Unit::hero(1, 1, Vec2::ZERO);
        hero.path = vec![Vec2::new(0.0, 200.0)];
        let minion = Unit::minion(10, 2, Vec2::new(0.0, -300.0), 50.0);
        let candidate = score_minion(&hero, &minion).unwrap();
        assert!(candidate.confidence > 0.5 * 0.8);
    }

    #[test]
    fn test_animation_lock_bias_pulls_mass_to_position() {
        let config = PredictionConfig::default();
        let tracker = TargetBehaviorTracker::new(1, &config);
        let mut hero = Unit::hero(1, 1, Vec2::new(100.0, 0.0));
        hero.status.is_casting = true;

        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        pdf.add_weighted_sample(Vec2::new(-200.0, 0.0), 1.0);
        pdf.normalize();
        let before = pdf.sample(hero.position);

        let applied = apply_contextual_factors(&mut pdf, &tracker, &hero, &Lane { units: Vec::new() }, &config);
        assert!(applied.animation_lock);
        assert_eq!(applied.last_hit_targets, 0);
        assert!(pdf.sample(hero.position) > before + 0.3);
        let sum: f64 = pdf.grid.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_grid_stays_neutral() {
        let config = PredictionConfig::default();
        let tracker = TargetBehaviorTracker::new(1, &config);
        let mut hero = Unit::hero(1, 1, Vec2::ZERO);
        hero.status.is_auto_attacking = true;
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        let applied = apply_contextual_factors(&mut pdf, &tracker, &hero, &Lane { units: Vec::new() }, &config);
        assert_eq!(applied, AppliedBias::default());
        assert!(pdf.is_empty());
    }
}
