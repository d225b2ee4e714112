//! Per-tick unit snapshots supplied by the host.
//!
//! Snapshots are plain data with a few derived accessors.
//! Prediction logic lives in `skillshot-predict`, not here.

use serde::{Deserialize, Serialize};

use crate::enums::{ChannelKind, UnitKind};
use crate::types::{TeamId, UnitId, Vec2};

/// Active dash: the unit is committed to reaching `end_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashState {
    pub end_position: Vec2,
    /// Seconds until the dash completes.
    pub remaining: f64,
}

/// Stationary channel or recall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    pub position: Vec2,
    /// Seconds until the channel ends.
    pub remaining: f64,
    pub kind: ChannelKind,
}

/// Untargetable stasis; the unit reappears at `exit_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StasisState {
    pub exit_position: Vec2,
    /// Seconds until the unit becomes hittable again.
    pub remaining: f64,
}

/// Status flags relevant to prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Remaining hard crowd-control (stun, root, knock-up), if any.
    pub hard_cc_remaining: Option<f64>,
    pub is_casting: bool,
    pub is_auto_attacking: bool,
    pub is_slowed: bool,
    pub has_spell_shield: bool,
    /// Illusion or clone; hitting it is worthless.
    pub is_clone: bool,
    pub dash: Option<DashState>,
    pub channel: Option<ChannelState>,
    pub stasis: Option<StasisState>,
}

impl UnitStatus {
    pub fn is_hard_cced(&self) -> bool {
        self.hard_cc_remaining.is_some_and(|t| t > 0.0)
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }
}

/// Kinematic and status snapshot of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamId,
    pub kind: UnitKind,
    pub position: Vec2,
    /// Instantaneous velocity reported by the host (units/s).
    pub velocity: Vec2,
    /// Remaining waypoints of the current move order, nearest first.
    #[serde(default)]
    pub path: Vec<Vec2>,
    pub move_speed: f64,
    pub health: f64,
    pub max_health: f64,
    pub attack_damage: f64,
    pub attack_range: f64,
    /// Hitbox radius.
    pub bounding_radius: f64,
    pub is_alive: bool,
    /// Visible to the opposing team.
    pub visible: bool,
    #[serde(default)]
    pub status: UnitStatus,
}

impl Unit {
    /// A visible, alive hero at rest with sensible defaults.
    pub fn hero(id: UnitId, team: TeamId, position: Vec2) -> Self {
        Self {
            id,
            team,
            kind: UnitKind::Hero,
            position,
            velocity: Vec2::ZERO,
            path: Vec::new(),
            move_speed: 340.0,
            health: 600.0,
            max_health: 600.0,
            attack_damage: 60.0,
            attack_range: 550.0,
            bounding_radius: 65.0,
            is_alive: true,
            visible: true,
            status: UnitStatus::default(),
        }
    }

    /// A visible, alive minion at rest.
    pub fn minion(id: UnitId, team: TeamId, position: Vec2, health: f64) -> Self {
        Self {
            kind: UnitKind::Minion,
            move_speed: 325.0,
            max_health: health.max(1.0),
            health,
            attack_range: 110.0,
            bounding_radius: 48.0,
            ..Self::hero(id, team, position)
        }
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.team != other.team
    }

    pub fn health_percent(&self) -> f64 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health * 100.0).clamp(0.0, 100.0)
        }
    }

    /// Attacking, casting, or hard crowd-controlled.
    pub fn is_animation_locked(&self) -> bool {
        self.status.is_auto_attacking || self.status.is_casting || self.status.is_hard_cced()
    }
}
