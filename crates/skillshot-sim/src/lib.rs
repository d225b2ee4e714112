//! Headless skillshot simulation harness.
//!
//! `SimulationEngine` owns a hecs world of scripted units, advances it one
//! fixed tick at a time, and drives a `PredictionManager` the way a game
//! host would. Same seed, same predictions.

pub mod components;
pub mod engine;
pub mod scenario;
pub mod systems;
pub mod view;
