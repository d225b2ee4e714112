//! Enumeration types used throughout the prediction engine.

use serde::{Deserialize, Serialize};

/// Footprint geometry of an effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellShape {
    /// Unit-targeted; lands on the target regardless of movement.
    Targeted,
    /// Disk of `radius` centered on the aim point.
    #[default]
    Circular,
    /// Capsule of half-width `radius` and length `range` from the caster.
    Linear,
    /// Line of length `range` placed by two casts; the first within `cast_range`.
    Vector,
}

/// Discrete hit-chance buckets used by hosts to gate casts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HitChance {
    Any,
    Low,
    Medium,
    #[default]
    High,
    VeryHigh,
    GuaranteedHit,
}

impl HitChance {
    /// Minimum probability belonging to this bucket.
    pub fn min_probability(self) -> f64 {
        match self {
            HitChance::Any => 0.0,
            HitChance::Low => 0.30,
            HitChance::Medium => 0.50,
            HitChance::High => 0.65,
            HitChance::VeryHigh => 0.80,
            HitChance::GuaranteedHit => 0.95,
        }
    }

    /// Bucket a raw probability.
    pub fn from_probability(p: f64) -> Self {
        [
            HitChance::GuaranteedHit,
            HitChance::VeryHigh,
            HitChance::High,
            HitChance::Medium,
            HitChance::Low,
        ]
        .into_iter()
        .find(|bucket| p >= bucket.min_probability())
        .unwrap_or(HitChance::Any)
    }

    /// Base cast threshold used by the opportunity detector.
    pub fn opportunity_threshold(self) -> f64 {
        match self {
            HitChance::VeryHigh => 0.80,
            HitChance::High => 0.65,
            HitChance::Medium => 0.55,
            HitChance::Low => 0.45,
            _ => 0.65,
        }
    }
}

/// How the effect's range is measured against unit hitboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingType {
    /// Range measured between unit centers.
    #[default]
    CenterToCenter,
    /// Range reaches the edge of the target's hitbox.
    CenterToEdge,
    /// Range measured between both hitbox edges.
    EdgeToEdge,
}

/// Unit category relevant to prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Hero,
    Minion,
}

/// Kind of stationary channel a unit is performing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    #[default]
    Channel,
    Recall,
}

/// Interpretation of a cone effect's angle parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConeAngleConvention {
    /// Half-angle derived as atan2(radius, range): `radius` is the half-width at max range.
    #[default]
    WidthAtRange,
    /// `cone_angle` is already the half-angle, in degrees.
    HalfAngle,
    /// `cone_angle` is the full spread, in degrees.
    FullAngle,
}
