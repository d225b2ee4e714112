//! Scenario definitions: hardcoded duels between one caster and one target.
//!
//! The caster always stands at the origin on team 1; the target is an
//! enemy hero on team 2 whose motion script defines the scenario.

use std::f64::consts::FRAC_PI_3;

use serde::{Deserialize, Serialize};

use skillshot_core::enums::SpellShape;
use skillshot_core::spell::SpellData;
use skillshot_core::types::{TeamId, UnitId, Vec2};

use crate::components::MotionScript;
use crate::engine::SimulationEngine;

pub const CASTER_TEAM: TeamId = 1;
pub const TARGET_TEAM: TeamId = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Target stands still at mid range.
    Standing,
    /// Target strafes sideways across the caster's line of sight.
    Strafing,
    /// Target zig-zags with a regular left/right cadence.
    ZigZag,
    /// Target jukes in random directions at random intervals.
    Juking,
    /// Target walks toward a low-health enemy minion to last-hit it.
    LaneFarm,
}

/// Units spawned for a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub caster: UnitId,
    pub target: UnitId,
    pub minions: Vec<UnitId>,
}

/// Populate `engine` for `scenario`.
pub fn setup(engine: &mut SimulationEngine, scenario: ScenarioId) -> Matchup {
    let caster = engine.spawn_hero(CASTER_TEAM, Vec2::ZERO, MotionScript::Idle);
    let mut minions = Vec::new();

    let target = match scenario {
        ScenarioId::Standing => engine.spawn_hero(TARGET_TEAM, Vec2::new(700.0, 0.0), MotionScript::Idle),
        ScenarioId::Strafing => engine.spawn_hero(
            TARGET_TEAM,
            Vec2::new(700.0, -200.0),
            MotionScript::Straight { heading: Vec2::Y },
        ),
        ScenarioId::ZigZag => engine.spawn_hero(
            TARGET_TEAM,
            Vec2::new(600.0, -300.0),
            MotionScript::ZigZag {
                heading: Vec2::Y,
                angle: FRAC_PI_3,
                leg_ticks: 12,
            },
        ),
        ScenarioId::Juking => engine.spawn_hero(
            TARGET_TEAM,
            Vec2::new(650.0, 0.0),
            MotionScript::RandomJuke {
                min_ticks: 6,
                max_ticks: 18,
            },
        ),
        ScenarioId::LaneFarm => {
            minions.push(engine.spawn_minion(CASTER_TEAM, Vec2::new(900.0, 0.0), 80.0));
            minions.push(engine.spawn_minion(CASTER_TEAM, Vec2::new(950.0, 150.0), 400.0));
            engine.spawn_hero(
                TARGET_TEAM,
                Vec2::new(600.0, 0.0),
                MotionScript::Straight { heading: Vec2::X },
            )
        }
    };

    Matchup {
        caster,
        target,
        minions,
    }
}

/// Fast narrow line projectile.
pub fn line_skillshot() -> SpellData {
    SpellData {
        slot: 0,
        shape: SpellShape::Linear,
        range: 1100.0,
        radius: 70.0,
        delay: 0.25,
        projectile_speed: 1800.0,
        cooldown: 8.0,
        ..Default::default()
    }
}

/// Delayed ground-targeted circle.
pub fn circle_skillshot() -> SpellData {
    SpellData {
        slot: 1,
        shape: SpellShape::Circular,
        range: 900.0,
        radius: 120.0,
        delay: 0.6,
        projectile_speed: f64::MAX,
        cooldown: 10.0,
        ..Default::default()
    }
}
