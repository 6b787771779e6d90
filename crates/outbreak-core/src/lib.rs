//! Outbreak Core - Survival Combat Simulation Engine
//!
//! An ECS-based real-time simulation of a top-down survival combat game:
//! enemies that perceive, decide, and move via behavior trees, a per-tick
//! collision/combat resolver, and a wave director that paces enemy
//! introduction and advances difficulty.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System via `hecs`:
//! - **Entities**: the player, enemies, bullets, walls, hazards
//! - **Components**: pure data attached to entities (Position, AiState, etc.)
//! - **Systems**: logic that queries and updates components
//!
//! Rendering, audio, input plumbing, and UI live outside this crate. The
//! host supplies a movement intent vector and fire requests for the player,
//! calls [`engine::Engine::update`] once per frame, and consumes the typed
//! [`events::GameEvent`] values each tick returns.
//!
//! # Example
//!
//! ```rust,no_run
//! use outbreak_core::prelude::*;
//!
//! let mut engine = Engine::new(0xBADC0FFEE);
//!
//! loop {
//!     engine.set_player_intent(Vec2::new(0.0, 1.0));
//!     let events = engine.update(1.0 / 60.0);
//!     for event in &events {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod behavior;
pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod generation;
pub mod systems;
pub mod timing;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{Engine, Phase};
    pub use crate::events::GameEvent;
}
