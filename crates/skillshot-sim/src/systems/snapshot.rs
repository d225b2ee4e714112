//! Snapshot system: read-only dump of the world for inspection and tests.

use hecs::World;
use serde::{Deserialize, Serialize};

use skillshot_core::types::GameTime;
use skillshot_core::unit::Unit;

/// State of every unit after a tick, ordered by unit id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: GameTime,
    pub units: Vec<Unit>,
}

pub fn build_snapshot(world: &World, time: &GameTime) -> SimSnapshot {
    let mut units: Vec<Unit> = world
        .query::<&Unit>()
        .iter()
        .map(|(_entity, unit)| unit.clone())
        .collect();
    units.sort_by_key(|u| u.id);
    SimSnapshot { time: *time, units }
}
