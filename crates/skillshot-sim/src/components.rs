//! Components the harness attaches next to each `Unit` snapshot.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use skillshot_core::types::{TeamId, Vec2};

/// How a unit picks its heading each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionScript {
    Idle,
    /// Walk along `heading` indefinitely.
    Straight { heading: Vec2 },
    /// Alternate between `heading` rotated by `+angle` and `-angle`
    /// (radians), switching every `leg_ticks`.
    ZigZag { heading: Vec2, angle: f64, leg_ticks: u32 },
    /// Uniformly random heading, re-rolled after a random number of ticks
    /// in `min_ticks..=max_ticks`.
    RandomJuke { min_ticks: u32, max_ticks: u32 },
}

/// Scripted movement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub script: MotionScript,
    leg_elapsed: u32,
    leg_length: u32,
    leg_index: u32,
    heading: Vec2,
}

impl Motion {
    pub fn new(script: MotionScript) -> Self {
        Self {
            script,
            leg_elapsed: 0,
            leg_length: 0,
            leg_index: 0,
            heading: Vec2::ZERO,
        }
    }

    /// Unit heading for the coming tick, zero when standing still.
    pub fn step(&mut self, rng: &mut ChaCha8Rng) -> Vec2 {
        match self.script {
            MotionScript::Idle => Vec2::ZERO,
            MotionScript::Straight { heading } => heading.normalize_or_zero(),
            MotionScript::ZigZag {
                heading,
                angle,
                leg_ticks,
            } => {
                if self.leg_elapsed >= leg_ticks.max(1) {
                    self.leg_elapsed = 0;
                    self.leg_index += 1;
                }
                self.leg_elapsed += 1;
                let side = if self.leg_index % 2 == 0 { 1.0 } else { -1.0 };
                Vec2::from_angle(angle * side).rotate(heading.normalize_or_zero())
            }
            MotionScript::RandomJuke {
                min_ticks,
                max_ticks,
            } => {
                if self.leg_elapsed >= self.leg_length {
                    let min = min_ticks.max(1);
                    self.leg_elapsed = 0;
                    self.leg_length = rng.gen_range(min..=max_ticks.max(min));
                    self.heading = Vec2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU));
                }
                self.leg_elapsed += 1;
                self.heading
            }
        }
    }
}

/// Barrier that destroys enemy projectiles crossing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindWall {
    /// Owning team; its own projectiles pass through.
    pub team: TeamId,
    pub start: Vec2,
    pub end: Vec2,
}
