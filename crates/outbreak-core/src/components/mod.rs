//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod enemies;
mod player;
mod terrain;

pub use common::*;
pub use enemies::*;
pub use player::*;
pub use terrain::*;
