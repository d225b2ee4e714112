//! Tracker registry and the public prediction entry points.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use skillshot_core::spell::SpellData;
use skillshot_core::types::UnitId;
use skillshot_core::unit::Unit;

use crate::config::PredictionConfig;
use crate::error::PredictionError;
use crate::fusion::HybridFusionEngine;
use crate::result::HybridPredictionResult;
use crate::spell_math;
use crate::tracker::TargetBehaviorTracker;
use crate::world::WorldView;

/// Owns one `TargetBehaviorTracker` per tracked unit.
///
/// `update` is the only call that samples motion or evicts trackers;
/// `predict` only creates trackers lazily and records opportunity state.
#[derive(Debug, Clone, Default)]
pub struct PredictionManager {
    config: PredictionConfig,
    trackers: BTreeMap<UnitId, TargetBehaviorTracker>,
}

impl PredictionManager {
    pub fn new(config: PredictionConfig) -> Self {
        Self {
            config,
            trackers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    pub fn tracker(&self, id: UnitId) -> Option<&TargetBehaviorTracker> {
        self.trackers.get(&id)
    }

    pub fn tracked_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.trackers.keys().copied()
    }

    /// Sample every visible hero, then drop trackers of units that are gone.
    pub fn update(&mut self, world: &dyn WorldView) {
        let now = world.game_time();

        for id in world.hero_ids() {
            let Some(unit) = world.unit(id) else {
                continue;
            };
            if !unit.is_alive || !unit.visible {
                continue;
            }
            tracker_entry(&mut self.trackers, &self.config, id).update(&unit, now);
        }

        let timeout = self.config.tracker_timeout;
        self.trackers.retain(|&id, tracker| {
            let reachable = world.unit(id).is_some_and(|u| u.is_alive);
            if reachable {
                return true;
            }
            let stale = tracker.last_sample_time().map_or(true, |t| now - t > timeout);
            if stale {
                debug!(target_id = id, "evicting tracker");
            }
            !stale
        });
    }

    /// Predict where to aim `spell` from `source_id` at `target_id`.
    ///
    /// Never fails: internal errors become an invalid result.
    pub fn predict(
        &mut self,
        world: &dyn WorldView,
        source_id: UnitId,
        target_id: UnitId,
        spell: &SpellData,
    ) -> HybridPredictionResult {
        match self.try_predict(world, source_id, target_id, spell) {
            Ok(result) => result,
            Err(err) => {
                warn!(source_id, target_id, error = %err, "prediction failed");
                HybridPredictionResult::rejected(err.to_string())
            }
        }
    }

    fn try_predict(
        &mut self,
        world: &dyn WorldView,
        source_id: UnitId,
        target_id: UnitId,
        spell: &SpellData,
    ) -> Result<HybridPredictionResult, PredictionError> {
        let source = live_unit(world, source_id)?;
        let target = live_unit(world, target_id)?;
        self.predict_units(world, &source, &target, spell)
    }

    fn predict_units(
        &mut self,
        world: &dyn WorldView,
        source: &Unit,
        target: &Unit,
        spell: &SpellData,
    ) -> Result<HybridPredictionResult, PredictionError> {
        let tracker = tracker_entry(&mut self.trackers, &self.config, target.id);
        HybridFusionEngine::new(&self.config).compute_hybrid_prediction(world, source, target, spell, tracker)
    }

    /// Best target among `candidates` (id, priority) for `spell`.
    pub fn select_best_target(
        &mut self,
        world: &dyn WorldView,
        source_id: UnitId,
        spell: &SpellData,
        candidates: &[(UnitId, f64)],
    ) -> Option<(UnitId, HybridPredictionResult)> {
        let source = live_unit(world, source_id).ok()?;
        let units: Vec<(Unit, f64)> = candidates
            .iter()
            .filter_map(|&(id, priority)| world.unit(id).map(|u| (u, priority)))
            .collect();
        spell_math::select_best_target(&source, spell, &units, |target| {
            self.predict_units(world, &source, target, spell)
                .unwrap_or_else(|err| HybridPredictionResult::rejected(err.to_string()))
        })
    }
}

fn tracker_entry<'a>(
    trackers: &'a mut BTreeMap<UnitId, TargetBehaviorTracker>,
    config: &PredictionConfig,
    id: UnitId,
) -> &'a mut TargetBehaviorTracker {
    trackers.entry(id).or_insert_with(|| {
        debug!(target_id = id, "tracking new unit");
        TargetBehaviorTracker::new(id, config)
    })
}

fn live_unit(world: &dyn WorldView, id: UnitId) -> Result<Unit, PredictionError> {
    let unit = world.unit(id).ok_or(PredictionError::MissingUnit(id))?;
    if !unit.is_alive {
        return Err(PredictionError::DeadUnit(id));
    }
    Ok(unit)
}
