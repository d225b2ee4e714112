//! `WorldView` over the harness ECS world.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use skillshot_core::constants::EPSILON;
use skillshot_core::enums::UnitKind;
use skillshot_core::types::{TeamId, UnitId, Vec2};
use skillshot_core::unit::Unit;
use skillshot_predict::WorldView;

use crate::components::WindWall;

/// Borrowed, read-only view handed to the prediction manager.
pub struct SimWorldView<'a> {
    pub(crate) world: &'a World,
    pub(crate) entities: &'a BTreeMap<UnitId, Entity>,
    pub(crate) time: f64,
    pub(crate) ping_secs: f64,
}

impl WorldView for SimWorldView<'_> {
    fn game_time(&self) -> f64 {
        self.time
    }

    fn ping_secs(&self) -> f64 {
        self.ping_secs
    }

    fn unit(&self, id: UnitId) -> Option<Unit> {
        let entity = *self.entities.get(&id)?;
        let unit = self.world.get::<&Unit>(entity).ok()?;
        Some((*unit).clone())
    }

    fn units_near(&self, center: Vec2, radius: f64) -> Vec<Unit> {
        let mut units: Vec<Unit> = self
            .world
            .query::<&Unit>()
            .iter()
            .filter(|(_entity, unit)| unit.position.distance(center) <= radius)
            .map(|(_entity, unit)| unit.clone())
            .collect();
        units.sort_by_key(|u| u.id);
        units
    }

    fn hero_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .world
            .query::<&Unit>()
            .iter()
            .filter(|(_entity, unit)| unit.kind == UnitKind::Hero)
            .map(|(_entity, unit)| unit.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn projectile_blocked(&self, from: Vec2, to: Vec2, team: TeamId) -> bool {
        self.world
            .query::<&WindWall>()
            .iter()
            .any(|(_entity, wall)| wall.team != team && segments_intersect(from, to, wall.start, wall.end))
    }
}

/// Proper or touching intersection of segments `a1-a2` and `b1-b2`.
pub(crate) fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.perp_dot(s);
    let qp = b1 - a1;

    if denom.abs() < EPSILON {
        // Parallel: only collinear overlap counts.
        if qp.perp_dot(r).abs() > EPSILON {
            return false;
        }
        let rr = r.length_squared();
        if rr < EPSILON {
            return a1.distance(b1) < EPSILON;
        }
        let t0 = qp.dot(r) / rr;
        let t1 = t0 + s.dot(r) / rr;
        let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        return hi >= 0.0 && lo <= 1.0;
    }

    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_segments() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
        ));
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
        ));
    }

    #[test]
    fn test_collinear_overlap() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(20.0, 0.0),
        ));
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        ));
    }
}
