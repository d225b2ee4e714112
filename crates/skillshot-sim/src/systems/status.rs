//! Status timers: crowd-control, channels and stasis count down each tick.

use hecs::World;

use skillshot_core::unit::Unit;

/// Tick every timed status down by `dt` and clear the ones that ran out.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, unit) in world.query_mut::<&mut Unit>() {
        let status = &mut unit.status;

        status.hard_cc_remaining = status
            .hard_cc_remaining
            .map(|t| t - dt)
            .filter(|t| *t > 0.0);

        if let Some(channel) = status.channel.as_mut() {
            channel.remaining -= dt;
            if channel.remaining <= 0.0 {
                status.channel = None;
            }
        }

        if let Some(stasis) = status.stasis.as_mut() {
            stasis.remaining -= dt;
            if stasis.remaining <= 0.0 {
                unit.position = stasis.exit_position;
                status.stasis = None;
            }
        }
    }
}
