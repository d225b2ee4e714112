//! Core types and definitions for the skillshot prediction workspace.
//!
//! This crate defines the vocabulary shared across all other crates:
//! unit snapshots, spell descriptors, enums, and tuning constants.
//! It has no dependency on any game host or runtime framework.

pub mod constants;
pub mod enums;
pub mod spell;
pub mod types;
pub mod unit;
