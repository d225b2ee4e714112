//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use skillshot_core::constants::*;
use skillshot_core::enums::ConeAngleConvention;

use crate::error::ConfigError;

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Evaluate dashing targets at their dash endpoint.
    pub enable_dash_prediction: bool,
    /// Minimum seconds between movement samples.
    pub sample_interval: f64,
    /// Movement samples retained per target.
    pub history_capacity: usize,
    /// Samples before behavior data is fully trusted.
    pub min_samples_for_behavior: usize,
    /// Seconds before an unreachable target's tracker is discarded.
    pub tracker_timeout: f64,
    /// Behavior weight approached as history grows.
    pub fusion_max_behavior_weight: f64,
    /// Sample count at which behavior weight reaches half its maximum.
    pub fusion_half_samples: f64,
    pub cone_angle_convention: ConeAngleConvention,
    /// Bias the behavior grid toward minions the target may last-hit.
    pub cs_bias_enabled: bool,
    /// Add mass at the current position of animation-locked targets.
    pub animation_lock_bias_enabled: bool,
    /// Hidden targets whose last sample is older than this are rejected.
    pub fog_stale_after: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enable_dash_prediction: true,
            sample_interval: SAMPLE_INTERVAL,
            history_capacity: MAX_HISTORY,
            min_samples_for_behavior: MIN_SAMPLES_FOR_BEHAVIOR,
            tracker_timeout: TRACKER_TIMEOUT,
            fusion_max_behavior_weight: 0.6,
            fusion_half_samples: 10.0,
            cone_angle_convention: ConeAngleConvention::WidthAtRange,
            cs_bias_enabled: true,
            animation_lock_bias_enabled: true,
            fog_stale_after: 3.0,
        }
    }
}

impl PredictionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_interval.is_finite() && self.sample_interval > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sample_interval",
                reason: "must be a positive number of seconds",
            });
        }
        if self.history_capacity < 2 {
            return Err(ConfigError::Invalid {
                field: "history_capacity",
                reason: "must hold at least two samples",
            });
        }
        if self.min_samples_for_behavior == 0 {
            return Err(ConfigError::Invalid {
                field: "min_samples_for_behavior",
                reason: "must be at least one",
            });
        }
        if !(self.tracker_timeout.is_finite() && self.tracker_timeout > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tracker_timeout",
                reason: "must be a positive number of seconds",
            });
        }
        if !(0.0..=1.0).contains(&self.fusion_max_behavior_weight) {
            return Err(ConfigError::Invalid {
                field: "fusion_max_behavior_weight",
                reason: "must lie in [0, 1]",
            });
        }
        if !(self.fusion_half_samples.is_finite() && self.fusion_half_samples > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fusion_half_samples",
                reason: "must be positive",
            });
        }
        if !(self.fog_stale_after.is_finite() && self.fog_stale_after >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "fog_stale_after",
                reason: "must be non-negative",
            });
        }
        Ok(())
    }
}
