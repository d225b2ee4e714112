//! End-to-end tests for the prediction manager and algebraic properties of
//! the geometry, grid and opportunity code.

use std::collections::BTreeMap;

use proptest::prelude::*;

use skillshot_core::enums::SpellShape;
use skillshot_core::spell::SpellData;
use skillshot_core::types::{TeamId, UnitId, Vec2};
use skillshot_core::unit::{DashState, StasisState, Unit};

use crate::opportunity::OpportunityWindow;
use crate::pdf::BehaviorPdf;
use crate::physics::*;
use crate::{PredictionConfig, PredictionManager, WorldView};

const SOURCE: UnitId = 1;
const TARGET: UnitId = 2;

/// In-memory world driven by the tests.
struct TestWorld {
    time: f64,
    ping: f64,
    units: BTreeMap<UnitId, Unit>,
    windwall: bool,
}

impl TestWorld {
    fn duel(target_position: Vec2) -> Self {
        let mut units = BTreeMap::new();
        units.insert(SOURCE, Unit::hero(SOURCE, 1, Vec2::ZERO));
        units.insert(TARGET, Unit::hero(TARGET, 2, target_position));
        Self {
            time: 0.0,
            ping: 0.0,
            units,
            windwall: false,
        }
    }

    fn target_mut(&mut self) -> &mut Unit {
        self.units.get_mut(&TARGET).expect("target exists")
    }

    /// Move the target at `velocity` and sample it every 50 ms for `samples` steps,
    /// ending at its current position.
    fn replay_motion(&mut self, manager: &mut PredictionManager, velocity: Vec2, samples: usize) {
        let end = self.target_mut().position;
        for i in 0..samples {
            let remaining = (samples - 1 - i) as f64 * 0.05;
            self.time = i as f64 * 0.05;
            let target = self.target_mut();
            target.position = end - velocity * remaining;
            target.velocity = velocity;
            manager.update(&*self);
        }
    }

    fn idle(&mut self, manager: &mut PredictionManager, samples: usize) {
        self.replay_motion(manager, Vec2::ZERO, samples);
    }
}

impl WorldView for TestWorld {
    fn game_time(&self) -> f64 {
        self.time
    }

    fn ping_secs(&self) -> f64 {
        self.ping
    }

    fn unit(&self, id: UnitId) -> Option<Unit> {
        self.units.get(&id).cloned()
    }

    fn units_near(&self, center: Vec2, radius: f64) -> Vec<Unit> {
        self.units
            .values()
            .filter(|u| u.position.distance(center) <= radius)
            .cloned()
            .collect()
    }

    fn hero_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    fn projectile_blocked(&self, _from: Vec2, _to: Vec2, _team: TeamId) -> bool {
        self.windwall
    }
}

fn skillshot(delay: f64, speed: f64, range: f64, radius: f64) -> SpellData {
    SpellData {
        shape: SpellShape::Circular,
        delay,
        projectile_speed: speed,
        range,
        radius,
        ..Default::default()
    }
}

// ---- Scenarios ----

#[test]
fn test_scenario_stationary_target() {
    let mut world = TestWorld::duel(Vec2::new(600.0, 0.0));
    world.target_mut().move_speed = 0.0;
    let mut manager = PredictionManager::default();
    world.idle(&mut manager, 25);
    assert!((world.time - 1.2).abs() < 1e-9);

    let result = manager.predict(&world, SOURCE, TARGET, &skillshot(0.25, 2000.0, 1000.0, 60.0));
    assert!(result.is_valid, "{}", result.reasoning);
    assert!(result.reachable_region.max_radius < 1e-9);
    assert!(result.hit_chance >= 0.75);
}

#[test]
fn test_stationary_floor_with_move_speed() {
    let mut world = TestWorld::duel(Vec2::new(600.0, 0.0));
    let mut manager = PredictionManager::default();
    world.idle(&mut manager, 25);

    let result = manager.predict(&world, SOURCE, TARGET, &skillshot(0.25, 2000.0, 1000.0, 60.0));
    assert!(result.is_valid);
    assert!(result.hit_chance >= 0.75);
    assert!(result.reasoning.contains("stationary"));
}

fn fleeing_prediction(move_speed: f64) -> crate::HybridPredictionResult {
    let mut world = TestWorld::duel(Vec2::new(300.0, 0.0));
    world.target_mut().move_speed = move_speed;
    let mut manager = PredictionManager::default();
    world.replay_motion(&mut manager, Vec2::new(350.0, 0.0), 10);
    manager.predict(&world, SOURCE, TARGET, &skillshot(0.25, 1500.0, 900.0, 60.0))
}

#[test]
fn test_scenario_fleeing_target() {
    let result = fleeing_prediction(350.0);
    assert!(result.is_valid, "{}", result.reasoning);
    let arrival = result.arrival_time.unwrap();
    assert!((arrival - 0.45).abs() < 1e-9);
    assert!((result.reachable_region.max_radius - 350.0 * arrival).abs() < 1e-6);
    let region = &result.reachable_region;
    assert!(result.cast_position.distance(region.center) <= region.max_radius + 1e-6);
}

#[test]
fn test_scenario_faster_target_is_harder_to_hit() {
    let slow = fleeing_prediction(350.0);
    let fast = fleeing_prediction(700.0);
    assert!(fast.hit_chance < slow.hit_chance, "{} vs {}", fast.hit_chance, slow.hit_chance);
}

#[test]
fn test_scenario_hard_cc_is_guaranteed() {
    for x in [200.0, 800.0] {
        let mut world = TestWorld::duel(Vec2::new(x, 0.0));
        world.target_mut().status.hard_cc_remaining = Some(1.5);
        let mut manager = PredictionManager::default();
        let result = manager.predict(&world, SOURCE, TARGET, &skillshot(0.25, 1500.0, 1000.0, 60.0));
        assert!(result.is_valid);
        assert_eq!(result.hit_chance, 1.0);
        assert_eq!(result.cast_position, Vec2::new(x, 0.0));
        assert_eq!(result.reasoning, "immobilized");
    }
}

#[test]
fn test_scenario_stasis_exit() {
    let exit = Vec2::new(600.0, 0.0);
    let mut world = TestWorld::duel(exit);
    world.target_mut().status.stasis = Some(StasisState {
        exit_position: exit,
        remaining: 0.6,
    });
    let mut manager = PredictionManager::default();

    let timed = manager.predict(&world, SOURCE, TARGET, &skillshot(0.2, 1500.0, 1000.0, 60.0));
    assert!(timed.is_valid);
    assert_eq!(timed.cast_position, exit);
    assert_eq!(timed.hit_chance, 1.0);

    let late = manager.predict(&world, SOURCE, TARGET, &skillshot(0.2, 750.0, 1000.0, 60.0));
    assert!(!late.is_valid);
    assert!(late.reasoning.contains("travel time"), "{}", late.reasoning);
}

#[test]
fn test_scenario_dash_endpoint_ignores_history() {
    let mut world = TestWorld::duel(Vec2::new(600.0, 0.0));
    let mut manager = PredictionManager::default();
    world.replay_motion(&mut manager, Vec2::new(350.0, 0.0), 30);
    world.target_mut().status.dash = Some(DashState {
        end_position: Vec2::new(800.0, 0.0),
        remaining: 0.1,
    });

    let result = manager.predict(&world, SOURCE, TARGET, &skillshot(0.25, 500.0, 1000.0, 60.0));
    assert!(result.is_valid, "{}", result.reasoning);
    assert!(result.reasoning.contains("aiming at dash endpoint"), "{}", result.reasoning);
    // Behavior carries no weight at the endpoint, so only physics is fused.
    assert!(result.hit_chance <= result.confidence_score * result.physics_contribution + 1e-9);
    assert!(result.hit_chance < 0.2, "{}", result.hit_chance);
}

#[test]
fn test_scenario_pdf_cache_is_deterministic() {
    let mut world = TestWorld::duel(Vec2::new(500.0, 0.0));
    let mut manager = PredictionManager::default();
    world.replay_motion(&mut manager, Vec2::new(0.0, 300.0), 20);
    let spell = skillshot(0.25, 1600.0, 1000.0, 70.0);

    let first = manager.predict(&world, SOURCE, TARGET, &spell);
    let second = manager.predict(&world, SOURCE, TARGET, &spell);
    assert!(!first.behavior_pdf.is_empty());
    assert_eq!(first.behavior_pdf, second.behavior_pdf);
    assert_eq!(
        serde_json::to_string(&first.behavior_pdf).unwrap(),
        serde_json::to_string(&second.behavior_pdf).unwrap()
    );
}

// ---- Manager behavior ----

#[test]
fn test_missing_and_dead_units_are_invalid() {
    let mut world = TestWorld::duel(Vec2::new(500.0, 0.0));
    let mut manager = PredictionManager::default();
    let spell = SpellData::default();

    let missing = manager.predict(&world, SOURCE, 99, &spell);
    assert!(!missing.is_valid);
    assert!(missing.reasoning.contains("99"));

    world.target_mut().is_alive = false;
    let dead = manager.predict(&world, SOURCE, TARGET, &spell);
    assert!(!dead.is_valid);
}

#[test]
fn test_out_of_range_and_windwall() {
    let mut world = TestWorld::duel(Vec2::new(1200.0, 0.0));
    let mut manager = PredictionManager::default();
    let spell = skillshot(0.25, 1500.0, 1000.0, 60.0);
    let far = manager.predict(&world, SOURCE, TARGET, &spell);
    assert_eq!(far.reasoning, "target out of range");

    world.target_mut().position = Vec2::new(500.0, 0.0);
    world.windwall = true;
    let blocked = manager.predict(&world, SOURCE, TARGET, &spell);
    assert!(!blocked.is_valid);
    assert!(blocked.reasoning.contains("wind wall"));
}

#[test]
fn test_fog_of_war_handling() {
    let mut world = TestWorld::duel(Vec2::new(500.0, 0.0));
    let mut manager = PredictionManager::default();
    world.idle(&mut manager, 12);
    let spell = skillshot(0.25, 1500.0, 1000.0, 60.0);
    let visible = manager.predict(&world, SOURCE, TARGET, &spell);

    world.target_mut().visible = false;
    world.time += 0.5;
    manager.update(&world);
    let hidden = manager.predict(&world, SOURCE, TARGET, &spell);
    assert!(hidden.is_valid);
    assert!(hidden.reasoning.contains("fog"));
    assert!(hidden.confidence_score < visible.confidence_score);

    world.time += 3.0;
    manager.update(&world);
    let stale = manager.predict(&world, SOURCE, TARGET, &spell);
    assert_eq!(stale.reasoning, "target hidden too long");
    assert!(manager.tracker(TARGET).is_some(), "hidden targets keep their tracker");
}

#[test]
fn test_trackers_are_evicted_after_timeout() {
    let mut world = TestWorld::duel(Vec2::new(500.0, 0.0));
    let mut manager = PredictionManager::default();
    world.idle(&mut manager, 4);
    assert!(manager.tracker(TARGET).is_some());

    world.units.remove(&TARGET);
    world.time += 1.0;
    manager.update(&world);
    assert!(manager.tracker(TARGET).is_some(), "recent history survives");

    world.time += 10.0;
    manager.update(&world);
    assert!(manager.tracker(TARGET).is_none());
    assert!(manager.tracker(SOURCE).is_some());
}

#[test]
fn test_predict_creates_tracker_without_sampling() {
    let world = TestWorld::duel(Vec2::new(500.0, 0.0));
    let mut manager = PredictionManager::default();
    let result = manager.predict(&world, SOURCE, TARGET, &SpellData::default());
    assert!(result.is_valid);
    let tracker = manager.tracker(TARGET).unwrap();
    assert!(tracker.history().is_empty());
    assert!(tracker.window(0).is_some());
    assert_eq!(result.adaptive_threshold, 0.65);
}

#[test]
fn test_every_shape_produces_a_valid_result() {
    let mut world = TestWorld::duel(Vec2::new(600.0, 0.0));
    let mut manager = PredictionManager::new(PredictionConfig::default());
    world.replay_motion(&mut manager, Vec2::new(0.0, 320.0), 20);

    let base = skillshot(0.25, 1600.0, 1000.0, 70.0);
    let shapes = [
        SpellData {
            shape: SpellShape::Targeted,
            ..base.clone()
        },
        base.clone(),
        SpellData {
            shape: SpellShape::Linear,
            ..base.clone()
        },
        SpellData {
            shape: SpellShape::Linear,
            cone_angle: 50.0,
            ..base.clone()
        },
        SpellData {
            shape: SpellShape::Vector,
            range: 500.0,
            cast_range: 650.0,
            ..base.clone()
        },
    ];
    for spell in &shapes {
        let result = manager.predict(&world, SOURCE, TARGET, spell);
        assert!(result.is_valid, "{:?}: {}", spell.shape, result.reasoning);
        assert!((0.0..=1.0).contains(&result.hit_chance));
        assert!((0.0..=1.0).contains(&result.confidence_score));
    }
}

// ---- Properties ----

fn grid_strategy() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((-500.0..500.0f64, -500.0..500.0f64, 0.01..10.0f64), 0..12)
}

proptest! {
    #[test]
    fn prop_normalize_sums_to_one(samples in grid_strategy()) {
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        for (x, y, w) in &samples {
            pdf.add_weighted_sample(Vec2::new(*x, *y), *w);
        }
        let was_empty = pdf.is_empty();
        pdf.normalize();
        let sum: f64 = pdf.grid.iter().sum();
        if was_empty {
            prop_assert!(pdf.grid.iter().all(|v| *v == 0.0));
        } else {
            prop_assert!((sum - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn prop_intersection_is_symmetric(
        x1 in -300.0..300.0f64, y1 in -300.0..300.0f64, r1 in 0.0..200.0f64,
        x2 in -300.0..300.0f64, y2 in -300.0..300.0f64, r2 in 0.0..200.0f64,
    ) {
        let a = circle_circle_intersection_area(Vec2::new(x1, y1), r1, Vec2::new(x2, y2), r2);
        let b = circle_circle_intersection_area(Vec2::new(x2, y2), r2, Vec2::new(x1, y1), r1);
        prop_assert!((a - b).abs() < 1e-6 * (1.0 + a.abs()));
        prop_assert!(a.is_finite() && a >= 0.0);
    }

    #[test]
    fn prop_intersection_identity_and_disjoint(
        x in -300.0..300.0f64, y in -300.0..300.0f64, r in 0.1..200.0f64, gap in 1e-3..500.0f64,
    ) {
        let c = Vec2::new(x, y);
        let same = circle_circle_intersection_area(c, r, c, r);
        prop_assert!((same - std::f64::consts::PI * r * r).abs() < 1e-6 * same);
        let far = c + Vec2::new(2.0 * r + gap, 0.0);
        prop_assert_eq!(circle_circle_intersection_area(c, r, far, r), 0.0);
    }

    #[test]
    fn prop_physics_probability_non_increasing(
        offset in 0.0..1.0f64, radius in 10.0..200.0f64, r_small in 0.0..400.0f64, growth in 0.0..400.0f64,
    ) {
        // Aim point within one footprint radius of the region center.
        let aim = Vec2::new(offset * radius, 0.0);
        let small = compute_reachable_region(Vec2::ZERO, Vec2::ZERO, 1.0, r_small, f64::INFINITY);
        let large = compute_reachable_region(Vec2::ZERO, Vec2::ZERO, 1.0, r_small + growth, f64::INFINITY);
        let p_small = compute_physics_hit_probability(aim, radius, &small);
        let p_large = compute_physics_hit_probability(aim, radius, &large);
        prop_assert!(p_large <= p_small + 1e-9, "{} > {}", p_large, p_small);
    }

    #[test]
    fn prop_arrival_time_at_source_is_delay(
        x in -1e4..1e4f64, y in -1e4..1e4f64, speed in 1.0..1e5f64, delay in 0.0..2.0f64, far in 0.0..5000.0f64,
    ) {
        let src = Vec2::new(x, y);
        prop_assert!((compute_arrival_time(src, src, speed, delay) - delay).abs() < 1e-12);
        let elsewhere = src + Vec2::new(far, 0.0);
        prop_assert_eq!(compute_arrival_time(src, elsewhere, f64::MAX, delay), delay);
    }

    #[test]
    fn prop_patience_vetoes_every_hit_chance(
        hits in prop::collection::vec(0.0..1.0f64, 0..40),
        hit in 0.0..1.0f64,
        threshold in 0.0..1.0f64,
        patience in 1.5..3.0f64,
        fraction in 0.0..1.0f64,
    ) {
        let mut window = OpportunityWindow::new(0.0);
        for (i, h) in hits.iter().enumerate() {
            window.update(i as f64 * 0.05, *h);
        }
        let now = hits.len() as f64 * 0.05;
        let elapsed = patience * fraction * 0.999;
        prop_assert!(!window.is_peak_opportunity(now, hit, threshold, elapsed, patience));
    }
}
