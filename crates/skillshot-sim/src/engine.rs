//! Simulation engine: the host side of the prediction loop.
//!
//! `SimulationEngine` owns the hecs ECS world, runs the movement systems at
//! a fixed tick rate, and feeds a `PredictionManager` exactly as a game
//! client would: one `update` per tick, `predict` on demand. Completely
//! headless, enabling deterministic testing.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skillshot_core::constants::DT;
use skillshot_core::spell::SpellData;
use skillshot_core::types::{GameTime, TeamId, UnitId, Vec2};
use skillshot_core::unit::Unit;
use skillshot_predict::{HybridPredictionResult, PredictionConfig, PredictionManager};

use crate::components::{Motion, MotionScript, WindWall};
use crate::systems;
use crate::systems::snapshot::SimSnapshot;
use crate::view::SimWorldView;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Simulated round-trip latency reported to the predictor.
    pub ping_secs: f64,
    pub prediction: PredictionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ping_secs: 0.05,
            prediction: PredictionConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world, the clock and the predictor.
pub struct SimulationEngine {
    world: World,
    time: GameTime,
    ping_secs: f64,
    rng: ChaCha8Rng,
    manager: PredictionManager,
    entities: BTreeMap<UnitId, Entity>,
    next_unit_id: UnitId,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: GameTime::default(),
            ping_secs: config.ping_secs,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            manager: PredictionManager::new(config.prediction),
            entities: BTreeMap::new(),
            next_unit_id: 1,
        }
    }

    /// Add `unit` to the world under a fresh id. Units with a script move
    /// on their own; units without one stay where they are put.
    pub fn spawn_unit(&mut self, mut unit: Unit, script: Option<MotionScript>) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id += 1;
        unit.id = id;

        debug!(unit_id = id, kind = ?unit.kind, team = unit.team, "spawn");
        let entity = match script {
            Some(script) => self.world.spawn((unit, Motion::new(script))),
            None => self.world.spawn((unit,)),
        };
        self.entities.insert(id, entity);
        id
    }

    pub fn spawn_hero(&mut self, team: TeamId, position: Vec2, script: MotionScript) -> UnitId {
        self.spawn_unit(Unit::hero(0, team, position), Some(script))
    }

    pub fn spawn_minion(&mut self, team: TeamId, position: Vec2, health: f64) -> UnitId {
        self.spawn_unit(Unit::minion(0, team, position, health), None)
    }

    pub fn spawn_wind_wall(&mut self, team: TeamId, start: Vec2, end: Vec2) -> Entity {
        self.world.spawn((WindWall { team, start, end },))
    }

    /// Remove a unit entirely. Its tracker lingers until the manager's
    /// timeout expires.
    pub fn despawn(&mut self, id: UnitId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        debug!(unit_id = id, "despawn");
        self.world.despawn(entity).is_ok()
    }

    /// Mutate a unit in place (status effects, visibility, stats).
    /// Returns false when the unit does not exist.
    pub fn update_unit(&mut self, id: UnitId, edit: impl FnOnce(&mut Unit)) -> bool {
        let Some(&entity) = self.entities.get(&id) else {
            return false;
        };
        match self.world.get::<&mut Unit>(entity) {
            Ok(mut unit) => {
                edit(&mut *unit);
                true
            }
            Err(_) => false,
        }
    }

    /// Replace a unit's motion script.
    pub fn set_script(&mut self, id: UnitId, script: MotionScript) -> bool {
        let Some(&entity) = self.entities.get(&id) else {
            return false;
        };
        self.world.insert_one(entity, Motion::new(script)).is_ok()
    }

    pub fn unit(&self, id: UnitId) -> Option<Unit> {
        let entity = *self.entities.get(&id)?;
        let unit = self.world.get::<&Unit>(entity).ok()?;
        Some((*unit).clone())
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.run_systems();
        self.time.advance();

        let view = SimWorldView {
            world: &self.world,
            entities: &self.entities,
            time: self.time.elapsed_secs,
            ping_secs: self.ping_secs,
        };
        self.manager.update(&view);

        systems::snapshot::build_snapshot(&self.world, &self.time)
    }

    /// Run `ticks` ticks, discarding snapshots.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Ask the predictor where `source` should aim `spell` at `target`.
    pub fn predict(&mut self, source: UnitId, target: UnitId, spell: &SpellData) -> HybridPredictionResult {
        let view = SimWorldView {
            world: &self.world,
            entities: &self.entities,
            time: self.time.elapsed_secs,
            ping_secs: self.ping_secs,
        };
        self.manager.predict(&view, source, target, spell)
    }

    /// Best of `candidates` (unit, priority) for `source` to aim `spell` at.
    pub fn select_best_target(
        &mut self,
        source: UnitId,
        spell: &SpellData,
        candidates: &[(UnitId, f64)],
    ) -> Option<(UnitId, HybridPredictionResult)> {
        let view = SimWorldView {
            world: &self.world,
            entities: &self.entities,
            time: self.time.elapsed_secs,
            ping_secs: self.ping_secs,
        };
        self.manager.select_best_target(&view, source, spell, candidates)
    }

    pub fn view(&self) -> SimWorldView<'_> {
        SimWorldView {
            world: &self.world,
            entities: &self.entities,
            time: self.time.elapsed_secs,
            ping_secs: self.ping_secs,
        }
    }

    pub fn manager(&self) -> &PredictionManager {
        &self.manager
    }

    pub fn time(&self) -> GameTime {
        self.time
    }

    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.time)
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Status timers (CC, channels, stasis exit)
        systems::status::run(&mut self.world, DT);
        // 2. Scripted movement and dashes
        systems::movement::run(&mut self.world, &mut self.rng, DT);
    }
}
