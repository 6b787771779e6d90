//! Enemy components - kind configuration and per-actor AI state.
//!
//! Zombies and skeletons share one behavior tree and differ only by
//! configuration, so there is a single enemy archetype parameterized by
//! [`EnemyConfig`] rather than one type per kind.

use serde::{Deserialize, Serialize};

use crate::components::Vec2;
use crate::config::{self, BASE_SPEED};
use crate::timing::Debounce;

/// Which enemy kind an entity is. Drives spawn policy and tuning only;
/// behavior is identical across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Zombie,
    Skeleton,
}

/// Per-kind tuning record attached to every enemy entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub kind: EnemyKind,
    pub speed_modifier: f32,
    pub attack_speed_modifier: f32,
    /// How long an attack charge lasts, in seconds.
    pub attack_time: f32,
    pub attack_range: f32,
    /// Detection radius for the player and gunfire.
    pub awareness: f32,
    pub size: f32,
    pub points: u32,
    pub max_heat: i32,
    pub flee_speed_modifier: f32,
    pub flee_time: f32,
    pub reduce_heat_debounce: f64,
}

impl EnemyConfig {
    pub fn zombie() -> Self {
        use config::zombie as z;
        Self {
            kind: EnemyKind::Zombie,
            speed_modifier: z::SPEED_MODIFIER,
            attack_speed_modifier: z::ATTACK_SPEED_MODIFIER,
            attack_time: z::ATTACK_TIME,
            attack_range: z::ATTACK_RANGE,
            awareness: z::AWARENESS,
            size: z::SIZE,
            points: z::POINT_VALUE,
            max_heat: z::MAX_HEAT,
            flee_speed_modifier: z::FLEE_SPEED_MODIFIER,
            flee_time: z::FLEE_TIME,
            reduce_heat_debounce: z::REDUCE_HEAT_DEBOUNCE,
        }
    }

    /// Skeletons reuse the zombie record with their own overrides.
    pub fn skeleton() -> Self {
        use config::skeleton as s;
        Self {
            kind: EnemyKind::Skeleton,
            speed_modifier: s::SPEED_MODIFIER,
            attack_range: s::ATTACK_RANGE,
            awareness: s::AWARENESS,
            size: s::SIZE,
            points: s::POINT_VALUE,
            ..Self::zombie()
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed_modifier * BASE_SPEED
    }

    pub fn attack_speed(&self) -> f32 {
        self.speed() * self.attack_speed_modifier
    }

    pub fn flee_speed(&self) -> f32 {
        self.speed() * self.flee_speed_modifier
    }
}

/// Mutable AI state for one enemy actor.
///
/// The behavior tree itself is shared by every actor, so anything that has
/// to survive between ticks lives here in named slots: long-running actions
/// write their heading/speed/deadline into their own fields, and sequence
/// nodes keep their resume position in `cursors`.
#[derive(Debug, Clone)]
pub struct AiState {
    /// Last known player position this actor is pursuing, if any.
    pub chase_target: Option<Vec2>,
    /// Accumulated fire exposure. Never negative.
    pub heat: i32,
    /// Latched once heat reaches the kind's maximum. Heat keeps decaying
    /// while the actor flees, so the burn-out run must not depend on it.
    pub burning: bool,
    /// When this actor last cried for help.
    pub last_cry: f64,
    /// Gate on heat gain from hazard exposure.
    pub fire_gate: Debounce,
    /// Gate on periodic heat decay.
    pub cool_gate: Debounce,

    // Wander slots
    pub wander_direction: Vec2,
    pub wander_speed: f32,
    pub wander_time: f32,
    pub wander_start: f64,

    // Lunge/attack slots
    pub attack_target: Vec2,
    pub attack_direction: Vec2,
    pub wind_up: f64,
    pub attack_start: f64,

    // Flee slots
    pub flee_direction: Vec2,
    pub flee_start: f64,
    pub death_wait: f64,

    /// Resume positions for the tree's sequence nodes, indexed by the
    /// cursor slot each sequence was assigned at build time.
    pub cursors: Vec<usize>,
}

impl AiState {
    pub fn new(cursor_count: usize, cfg: &EnemyConfig) -> Self {
        Self {
            chase_target: None,
            heat: 0,
            burning: false,
            last_cry: 0.0,
            fire_gate: Debounce::new(config::fire::DEBOUNCE),
            cool_gate: Debounce::new(cfg.reduce_heat_debounce),
            wander_direction: Vec2::ZERO,
            wander_speed: 0.0,
            wander_time: 0.0,
            wander_start: 0.0,
            attack_target: Vec2::ZERO,
            attack_direction: Vec2::ZERO,
            wind_up: 0.0,
            attack_start: 0.0,
            flee_direction: Vec2::ZERO,
            flee_start: 0.0,
            death_wait: 0.0,
            cursors: vec![0; cursor_count],
        }
    }
}

/// Short-lived marker left where an enemy cried, so hosts can visualize
/// aggro propagation. Culled by the engine after a fixed lifetime.
#[derive(Debug, Clone, Copy)]
pub struct CryMarker {
    pub expires_at: f64,
}
