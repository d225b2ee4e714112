//! Read-only view of the host world.

use skillshot_core::types::{TeamId, UnitId, Vec2};
use skillshot_core::unit::Unit;

/// Everything the engine needs to read from the host each tick.
///
/// Implementations return owned snapshots; the engine never holds on to
/// them past a single call.
pub trait WorldView {
    /// Current game time in seconds.
    fn game_time(&self) -> f64;

    /// Round-trip latency to the server in seconds.
    fn ping_secs(&self) -> f64;

    /// Snapshot of a unit, or `None` if it no longer exists.
    fn unit(&self, id: UnitId) -> Option<Unit>;

    /// All units whose centers lie within `radius` of `center`.
    fn units_near(&self, center: Vec2, radius: f64) -> Vec<Unit>;

    /// Ids of every hero the engine should track.
    fn hero_ids(&self) -> Vec<UnitId>;

    /// True when a projectile from `team` travelling `from` → `to` is blocked
    /// by a wind-wall style barrier.
    fn projectile_blocked(&self, _from: Vec2, _to: Vec2, _team: TeamId) -> bool {
        false
    }
}
