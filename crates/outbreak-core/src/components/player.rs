//! Player and projectile components.

use crate::components::Vec2;
use crate::config::{self, player};
use crate::timing::Debounce;

/// The player-controlled survivor.
#[derive(Debug, Clone)]
pub struct Player {
    pub life: i32,
    pub heat: i32,
    /// Gate on heat gain from hazard exposure.
    pub fire_gate: Debounce,
    /// Gate on periodic heat decay.
    pub cool_gate: Debounce,
    /// Gate on damage while overheated.
    pub overheat_gate: Debounce,
    pub primary_gate: Debounce,
    pub secondary_gate: Debounce,
}

impl Player {
    pub fn with_life(life: i32) -> Self {
        Self {
            life,
            heat: 0,
            fire_gate: Debounce::new(config::fire::DEBOUNCE),
            cool_gate: Debounce::new(player::REDUCE_HEAT_DEBOUNCE),
            overheat_gate: Debounce::new(player::HANDLE_HEAT_DEBOUNCE),
            primary_gate: Debounce::new(player::PRIMARY_COOLDOWN),
            secondary_gate: Debounce::new(player::SECONDARY_COOLDOWN),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::with_life(player::LIFE)
    }
}

/// A projectile in flight. Despawned once it has covered `max_distance`.
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub direction: Vec2,
    pub traveled: f32,
    pub max_distance: f32,
}

impl Bullet {
    pub fn new(direction: Vec2, max_distance: f32) -> Self {
        Self {
            direction,
            traveled: 0.0,
            max_distance,
        }
    }

    pub fn speed(&self) -> f32 {
        config::bullet::SPEED_MODIFIER * config::BASE_SPEED
    }
}
