//! Kinematic integration: scripted walking and dashes.
//!
//! Sets each unit's reported velocity and integrates position += velocity * dt.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use skillshot_core::types::Vec2;
use skillshot_core::unit::Unit;

use crate::components::Motion;

/// Advance every scripted unit by one tick of `dt` seconds.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, dt: f64) {
    for (_entity, (unit, motion)) in world.query_mut::<(&mut Unit, &mut Motion)>() {
        if !unit.is_alive {
            unit.velocity = Vec2::ZERO;
            continue;
        }
        if advance_dash(unit, dt) {
            continue;
        }
        if is_rooted(unit) {
            unit.velocity = Vec2::ZERO;
            continue;
        }

        unit.velocity = motion.step(rng) * unit.move_speed;
        unit.position += unit.velocity * dt;
    }
}

/// Move a dashing unit toward its endpoint. Returns false when not dashing.
fn advance_dash(unit: &mut Unit, dt: f64) -> bool {
    let Some(dash) = unit.status.dash.as_mut() else {
        return false;
    };

    let before = unit.position;
    if dash.remaining <= dt {
        unit.position = dash.end_position;
        unit.status.dash = None;
    } else {
        let fraction = dt / dash.remaining;
        unit.position += (dash.end_position - unit.position) * fraction;
        dash.remaining -= dt;
    }
    unit.velocity = (unit.position - before) / dt;
    true
}

fn is_rooted(unit: &Unit) -> bool {
    let status = &unit.status;
    status.is_hard_cced() || status.is_casting || status.channel.is_some() || status.stasis.is_some()
}
