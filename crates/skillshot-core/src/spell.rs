//! Effect descriptor supplied by the caller for each prediction.

use serde::{Deserialize, Serialize};

use crate::constants::INSTANT_SPEED_SENTINEL;
use crate::enums::{HitChance, SpellShape, TargetingType};

/// Parameters of a ranged effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellData {
    /// Ability slot; opportunity state is tracked per (target, slot).
    pub slot: i32,
    pub shape: SpellShape,
    /// Maximum cast range, or line length for linear and vector shapes.
    pub range: f64,
    /// Footprint radius, or half-width for lines.
    pub radius: f64,
    /// Cast delay before the effect is released (seconds).
    pub delay: f64,
    /// Travel speed in units/s; `f64::MAX` for instant effects.
    pub projectile_speed: f64,
    /// Nonzero marks the effect as a cone; meaning depends on the configured convention.
    pub cone_angle: f64,
    /// Range of the first cast point for vector effects; 0 falls back to `range`.
    pub cast_range: f64,
    pub targeting_type: TargetingType,
    /// Hit chance the caller wants before casting.
    pub expected_hit_chance: HitChance,
    /// Cooldown in seconds; 0 means unknown.
    pub cooldown: f64,
}

impl Default for SpellData {
    fn default() -> Self {
        Self {
            slot: 0,
            shape: SpellShape::Circular,
            range: 1000.0,
            radius: 60.0,
            delay: 0.25,
            projectile_speed: f64::MAX,
            cone_angle: 0.0,
            cast_range: 0.0,
            targeting_type: TargetingType::CenterToCenter,
            expected_hit_chance: HitChance::High,
            cooldown: 0.0,
        }
    }
}

impl SpellData {
    pub fn is_instant(&self) -> bool {
        !self.projectile_speed.is_finite() || self.projectile_speed >= INSTANT_SPEED_SENTINEL
    }

    pub fn is_cone(&self) -> bool {
        self.cone_angle > 0.0
    }

    /// Range of the first cast point of a vector effect.
    pub fn first_cast_range(&self) -> f64 {
        if self.cast_range > 0.0 {
            self.cast_range
        } else {
            self.range
        }
    }

    /// Farthest distance from the caster the effect can reach.
    pub fn max_reach(&self) -> f64 {
        match self.shape {
            SpellShape::Vector => self.first_cast_range() + self.range,
            _ => self.range,
        }
    }
}
