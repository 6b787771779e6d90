//! Tuning constants for the simulation.
//!
//! Grouped by the part of the game they govern. These are plain constants
//! with no I/O dependency; both the engine and the simtest harness use them.

/// Base movement speed every speed modifier scales from, in units/second.
pub const BASE_SPEED: f32 = 5.0;

pub mod bullet {
    pub const SIZE: f32 = 0.5;
    pub const SPEED_MODIFIER: f32 = 3.0;
}

pub mod collider {
    /// Soft push applied along a wall's outward normal on overlap.
    pub const WALL_PUSH: f32 = 0.25;
}

pub mod fire {
    /// Minimum interval between heat gains while standing in a hazard.
    pub const DEBOUNCE: f64 = 0.1;
    /// Heat added per hazard exposure event.
    pub const HEAT: i32 = 1;
    /// Full width of a hazard patch.
    pub const HAZARD_SIZE: f32 = 2.0;
}

pub mod player {
    pub const LIFE: i32 = 10;
    pub const MAX_HEAT: i32 = 10;
    pub const SIZE: f32 = 1.0;
    pub const PRIMARY_COOLDOWN: f64 = 0.4;
    pub const PRIMARY_MAX_DISTANCE: f32 = 15.0;
    pub const PRIMARY_NOISE_SCALAR: f32 = 1.0;
    pub const SECONDARY_COOLDOWN: f64 = 1.0;
    pub const SECONDARY_MAX_DISTANCE: f32 = 5.0;
    pub const SECONDARY_NOISE_SCALAR: f32 = 5.0;
    /// Half-angle of the secondary spread cone, in degrees.
    pub const SECONDARY_SPREAD: f32 = 40.0;
    /// Minimum interval between overheat damage ticks.
    pub const HANDLE_HEAT_DEBOUNCE: f64 = 0.5;
    pub const REDUCE_HEAT_DEBOUNCE: f64 = 0.4;
    /// Where the player starts each level.
    pub const START_X: f32 = 5.0;
    pub const START_Y: f32 = -5.0;
}

pub mod zombie {
    pub const SPEED_MODIFIER: f32 = 0.7;
    pub const ATTACK_SPEED_MODIFIER: f32 = 2.0;
    pub const ATTACK_TIME: f32 = 0.35;
    pub const ATTACK_RANGE: f32 = 2.5;
    pub const AWARENESS: f32 = 6.0;
    pub const FLEE_SPEED_MODIFIER: f32 = 3.0;
    pub const FLEE_TIME: f32 = 1.0;
    pub const MAX_HEAT: i32 = 1;
    pub const POINT_VALUE: u32 = 10;
    pub const REDUCE_HEAT_DEBOUNCE: f64 = 0.2;
    pub const SIZE: f32 = 1.2;
    /// Group size ceiling is `level * SPAWN_MULTIPLIER`; floor is `level`.
    pub const SPAWN_MULTIPLIER: u32 = 3;
    /// Fractions of the floor/ceiling assigned to each of the three
    /// overlapping group-size draws. Keeping three draws (instead of one
    /// flat range) preserves the deliberately lumpy distribution.
    pub const SPAWN_FIRST_MIN: f32 = 0.5;
    pub const SPAWN_FIRST_MAX: f32 = 0.25;
    pub const SPAWN_SECOND_MIN: f32 = 0.25;
    pub const SPAWN_SECOND_MAX: f32 = 0.5;
    pub const SPAWN_THIRD_MIN: f32 = 0.25;
    pub const SPAWN_THIRD_MAX: f32 = 0.25;
    /// Members of a group land within this offset of the group origin.
    pub const SPAWN_OFFSET_BASE: f32 = 2.5;
}

pub mod skeleton {
    pub const ATTACK_RANGE: f32 = 3.0;
    pub const AWARENESS: f32 = 8.0;
    pub const POINT_VALUE: u32 = 15;
    pub const SIZE: f32 = 0.8;
    pub const SPEED_MODIFIER: f32 = 1.2;
}

pub mod waves {
    /// Hazard patches only appear from this level on.
    pub const HAZARD_MIN_LEVEL: u32 = 5;

    pub const SPAWN_LIMIT_BASE: u32 = 20;
    pub const SPAWN_LIMIT_SCALAR: u32 = 5;

    pub const ZOMBIE_SPAWN_BASE: f32 = 3.0;
    pub const ZOMBIE_SPAWN_INITIAL: f32 = 0.0;

    pub const SKELETON_SPAWN_BASE: f32 = 12.0;
    pub const SKELETON_SPAWN_INITIAL: f32 = 6.0;

    /// Walls placed per level step.
    pub const WALL_SPAWN_STEP_COUNT: u32 = 3;

    /// Play-space half-extent is `BOUNDS_BASE + BOUNDS_SCALAR * level`.
    pub const BOUNDS_BASE: f32 = 10.0;
    pub const BOUNDS_SCALAR: f32 = 3.0;
}

pub mod ai {
    /// Tree-shared cooldown on cry emission while chasing.
    pub const CRY_COOLDOWN: f64 = 1.5;
    /// Per-actor gate on re-crying outside the tree.
    pub const RECRY_GATE: f64 = 0.25;
    /// Pause between capturing an attack target and charging.
    pub const LUNGE_WIND_UP: f64 = 0.1;
    /// Pause between finishing the flee run and burning out.
    pub const BURN_OUT_WAIT: f64 = 0.25;
    /// How long a cry marker lingers before it is culled.
    pub const CRY_MARKER_TTL: f64 = 0.5;
    /// Wander speed roll, as a fraction of the actor's base speed.
    pub const WANDER_SPEED_MIN: f32 = 0.25;
    pub const WANDER_SPEED_MAX: f32 = 0.75;
    /// Wander leg duration roll, in seconds.
    pub const WANDER_TIME_MIN: f32 = 0.25;
    pub const WANDER_TIME_MAX: f32 = 1.5;
    /// An actor has "reached" its chase target within `size * ARRIVAL_FACTOR`.
    pub const ARRIVAL_FACTOR: f32 = 1.5;
    /// Extra clearance demanded around the player for a group origin.
    pub const GROUP_ORIGIN_CLEARANCE: f32 = 2.5;
}
