//! Per-tick simulation systems.

pub mod ai;
pub mod collision;
pub mod player;
pub mod scoring;
pub mod spawning;
