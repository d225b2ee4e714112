//! Hybrid skillshot prediction engine.
//!
//! Fuses a physics reachable-region model with a learned behavior grid
//! to pick an aim point and a calibrated hit probability. Hosts drive it
//! through `PredictionManager::update` once per tick and
//! `PredictionManager::predict` per request.

pub mod behavior;
pub mod config;
pub mod edge_cases;
pub mod error;
pub mod fusion;
pub mod manager;
pub mod opportunity;
pub mod pattern;
pub mod pdf;
pub mod physics;
pub mod result;
pub mod spell_math;
pub mod tracker;
pub mod world;

pub use skillshot_core as core;
pub use config::PredictionConfig;
pub use error::{ConfigError, PredictionError};
pub use fusion::HybridFusionEngine;
pub use manager::PredictionManager;
pub use result::HybridPredictionResult;
pub use world::WorldView;

#[cfg(test)]
mod tests;
