//! Wave direction - spawn timers, spawn policies, and level progress.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{AiState, EnemyConfig, Extent, Position, Vec2};
use crate::config::{ai, waves, zombie};
use crate::generation::PlaySpace;
use crate::systems::ai::player_position;

/// A countdown that fires, then re-arms itself to a jittered interval in
/// `[0.5, 1.5)` of its base. Owned per scene, never shared across levels.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    base: f32,
    countdown: f32,
}

impl SpawnTimer {
    pub fn new(base: f32, initial: f32) -> Self {
        Self {
            base,
            countdown: initial,
        }
    }

    /// Advance by `dt`; on expiry, re-arm and report the fire.
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) -> bool {
        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.countdown = self.base * (0.5 + rng.gen::<f32>());
            true
        } else {
            false
        }
    }
}

/// How a timer expiry turns into enemies on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPolicy {
    /// A clustered pack around one origin, scaled to the level.
    ZombieGroup,
    /// A few independent points anywhere in bounds.
    SkeletonScatter,
}

/// Drives enemy spawning for one level and tracks quota progress.
///
/// `spawned` counts every enemy ever placed this level, not the live
/// count; the level is complete when the quota is met and the field has
/// been cleared.
#[derive(Debug)]
pub struct WaveDirector {
    pub level: u32,
    pub spawned: u32,
    pub spawn_limit: u32,
    bounds: PlaySpace,
    cursor_count: usize,
    zombie_timer: SpawnTimer,
    skeleton_timer: SpawnTimer,
}

impl WaveDirector {
    pub fn new(level: u32, cursor_count: usize) -> Self {
        Self {
            level,
            spawned: 0,
            spawn_limit: waves::SPAWN_LIMIT_BASE + waves::SPAWN_LIMIT_SCALAR * level,
            bounds: PlaySpace::for_level(level),
            cursor_count,
            zombie_timer: SpawnTimer::new(waves::ZOMBIE_SPAWN_BASE, waves::ZOMBIE_SPAWN_INITIAL),
            skeleton_timer: SpawnTimer::new(
                waves::SKELETON_SPAWN_BASE,
                waves::SKELETON_SPAWN_INITIAL,
            ),
        }
    }

    pub fn bounds(&self) -> PlaySpace {
        self.bounds
    }

    pub fn quota_reached(&self) -> bool {
        self.spawned >= self.spawn_limit
    }

    /// The level ends once the quota has been spawned and every enemy is
    /// dead or despawned.
    pub fn level_complete(&self, world: &World) -> bool {
        self.quota_reached() && world.query::<&EnemyConfig>().iter().next().is_none()
    }

    /// Tick both timers and run their policies on expiry.
    pub fn update(&mut self, world: &mut World, dt: f32, rng: &mut impl Rng) {
        let zombies_due = self.zombie_timer.tick(dt, rng);
        let skeletons_due = self.skeleton_timer.tick(dt, rng);
        if self.quota_reached() {
            return;
        }
        let Some(player_pos) = player_position(world) else {
            return;
        };
        if zombies_due {
            self.run_policy(SpawnPolicy::ZombieGroup, world, player_pos, rng);
        }
        if skeletons_due {
            self.run_policy(SpawnPolicy::SkeletonScatter, world, player_pos, rng);
        }
    }

    fn run_policy(
        &mut self,
        policy: SpawnPolicy,
        world: &mut World,
        player_pos: Vec2,
        rng: &mut impl Rng,
    ) {
        match policy {
            SpawnPolicy::ZombieGroup => self.spawn_zombie_group(world, player_pos, rng),
            SpawnPolicy::SkeletonScatter => self.spawn_skeletons(world, player_pos, rng),
        }
    }

    /// A pack of zombies clustered around a random origin. The whole group
    /// is abandoned if the origin lands too close to the player; individual
    /// members too close or out of bounds are skipped but still possible
    /// for the rest of the group.
    fn spawn_zombie_group(&mut self, world: &mut World, player_pos: Vec2, rng: &mut impl Rng) {
        let cfg = EnemyConfig::zombie();
        let origin = self.bounds.random_point(rng);
        if origin.distance(&player_pos) <= cfg.awareness + ai::GROUP_ORIGIN_CLEARANCE {
            return;
        }

        for _ in 0..group_size(self.level, rng) {
            if self.quota_reached() {
                break;
            }
            let offset = Vec2::new(
                rng.gen_range(-zombie::SPAWN_OFFSET_BASE..=zombie::SPAWN_OFFSET_BASE),
                rng.gen_range(-zombie::SPAWN_OFFSET_BASE..=zombie::SPAWN_OFFSET_BASE),
            );
            let point = origin + offset;
            if point.distance(&player_pos) <= cfg.awareness || self.bounds.outside(point) {
                continue;
            }
            self.spawn_enemy(world, cfg, point);
        }
    }

    /// A handful of skeletons at independent random points. Points are
    /// drawn inside bounds, so only player clearance can reject one.
    fn spawn_skeletons(&mut self, world: &mut World, player_pos: Vec2, rng: &mut impl Rng) {
        let cfg = EnemyConfig::skeleton();
        let count = if self.level > 1 {
            rng.gen_range(1..=self.level)
        } else {
            1
        };
        for _ in 0..count {
            if self.quota_reached() {
                break;
            }
            let point = self.bounds.random_point(rng);
            if point.distance(&player_pos) <= cfg.awareness {
                continue;
            }
            self.spawn_enemy(world, cfg, point);
        }
    }

    fn spawn_enemy(&mut self, world: &mut World, cfg: EnemyConfig, point: Vec2) {
        let _ = world.spawn((
            cfg,
            AiState::new(self.cursor_count, &cfg),
            Position(point),
            Extent::square(cfg.size),
        ));
        self.spawned += 1;
    }
}

/// Group size for a zombie pack: three overlapping draws against fractions
/// of the level floor (`level`) and ceiling (`level * SPAWN_MULTIPLIER`).
/// The overlap makes mid-size groups the common case while keeping both
/// extremes possible. Rounding can push the per-draw tops past the
/// ceiling, so the total is clamped back to it.
fn group_size(level: u32, rng: &mut impl Rng) -> u32 {
    let floor = level as f32;
    let ceiling = level * zombie::SPAWN_MULTIPLIER;
    let draw = |rng: &mut dyn rand::RngCore, min_frac: f32, max_frac: f32| {
        let lo = (floor * min_frac).round() as u32;
        let hi = ((ceiling as f32 * max_frac).round() as u32).max(lo);
        rng.gen_range(lo..=hi)
    };
    let total = draw(rng, zombie::SPAWN_FIRST_MIN, zombie::SPAWN_FIRST_MAX)
        + draw(rng, zombie::SPAWN_SECOND_MIN, zombie::SPAWN_SECOND_MAX)
        + draw(rng, zombie::SPAWN_THIRD_MIN, zombie::SPAWN_THIRD_MAX);
    total.min(ceiling)
}

/// Enemies that drifted onto or past the play-space edge. The engine
/// despawns them without scoring.
pub fn enemies_outside(world: &World, bounds: &PlaySpace) -> Vec<Entity> {
    world
        .query::<(&EnemyConfig, &Position)>()
        .iter()
        .filter(|(_, (_, pos))| bounds.outside(pos.0))
        .map(|(entity, _)| entity)
        .collect()
}
