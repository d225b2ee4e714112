//! Fundamental geometric and time types.

use serde::{Deserialize, Serialize};

/// Ground-plane position or direction in world units.
/// x = East, y = North. Height is never modelled.
pub type Vec2 = glam::DVec2;

/// Stable identifier of a unit, assigned by the host.
pub type UnitId = u32;

/// Team identifier. Units on different teams are enemies.
pub type TeamId = u32;

/// Game clock tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed game time in seconds.
    pub elapsed_secs: f64,
}

impl GameTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide.
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let len = delta.length();
    if len < crate::constants::EPSILON {
        None
    } else {
        Some(delta / len)
    }
}
