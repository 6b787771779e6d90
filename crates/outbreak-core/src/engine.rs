//! The simulation engine - owns the world, drives the tick pipeline, and
//! dispatches events.
//!
//! The host feeds intent and fire commands in, calls [`Engine::update`]
//! once per frame with the frame delta, and gets back every event the tick
//! produced. Time is the accumulated sum of deltas; wall clocks are never
//! consulted, so runs with the same seed and the same delta sequence are
//! identical.

use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::{AiState, CryMarker, EnemyConfig, Extent, Player, Position, Vec2};
use crate::config::{ai as ai_tune, player as player_tune};
use crate::events::{Delivery, EventBus, GameEvent};
use crate::generation::{populate_level, PlaySpace};
use crate::systems::ai::{self, CompiledTree};
use crate::systems::collision::Collider;
use crate::systems::player::{
    bullet_flight_system, damage_player, fire_primary, fire_secondary, player_heat_gain,
    player_heat_system, player_move_system,
};
use crate::systems::scoring::ScoreBoard;
use crate::systems::spawning::{enemies_outside, WaveDirector};

/// Whether the simulation is live or has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

pub struct Engine {
    world: World,
    clock: f64,
    phase: Phase,
    bus: EventBus,
    collider: Collider,
    director: WaveDirector,
    tree: CompiledTree,
    scoreboard: ScoreBoard,
    rng: SmallRng,
    intent: Vec2,
}

impl Engine {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = ai::enemy_tree();
        let mut world = World::new();

        let start = Vec2::new(player_tune::START_X, player_tune::START_Y);
        let _ = world.spawn((
            Player::default(),
            Position(start),
            Extent::square(player_tune::SIZE),
        ));
        populate_level(&mut world, 1, start, &mut rng);
        let director = WaveDirector::new(1, tree.cursor_count);

        Self {
            world,
            clock: 0.0,
            phase: Phase::Playing,
            bus: EventBus::new(),
            collider: Collider::new(),
            director,
            tree,
            scoreboard: ScoreBoard::new(),
            rng,
            intent: Vec2::ZERO,
        }
    }

    /// Movement intent applied each tick until replaced. Clamped to unit
    /// length at application time.
    pub fn set_player_intent(&mut self, intent: Vec2) {
        self.intent = intent;
    }

    /// Fire the primary weapon toward a world-space point. Effects land on
    /// the next update.
    pub fn fire_primary(&mut self, at: Vec2) {
        if self.phase == Phase::Playing {
            fire_primary(&mut self.world, &mut self.bus, at, self.clock);
        }
    }

    /// Fire the secondary spread weapon toward a world-space point.
    pub fn fire_secondary(&mut self, at: Vec2) {
        if self.phase == Phase::Playing {
            fire_secondary(&mut self.world, &mut self.bus, &mut self.rng, at, self.clock);
        }
    }

    /// Advance the simulation by `dt` seconds and return every event the
    /// tick produced, in dispatch order.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.phase == Phase::GameOver {
            return Vec::new();
        }
        self.clock += dt as f64;
        let now = self.clock;

        // Movement phase. The resolver is primed here and resolves once
        // after AI, so every mover sees one consistent snapshot.
        player_move_system(&mut self.world, dt, self.intent);
        for bullet in bullet_flight_system(&mut self.world, dt) {
            let _ = self.world.despawn(bullet);
        }
        self.collider.prime();

        let outcome = ai::enemy_ai_system(&mut self.world, &mut self.tree, now, dt, &mut self.rng);
        for (source, position, target) in outcome.cries {
            self.bus.publish(GameEvent::Cry {
                source,
                position,
                target,
            });
            let _ = self.world.spawn((
                CryMarker {
                    expires_at: now + ai_tune::CRY_MARKER_TTL,
                },
                Position(position),
            ));
        }
        for enemy in outcome.despawned {
            let _ = self.world.despawn(enemy);
        }

        for _ in 0..player_heat_system(&mut self.world, now) {
            self.bus.publish(GameEvent::PlayerHurt);
        }

        self.collider.resolve(&mut self.world, &mut self.bus);

        let events = self.dispatch(now);

        if self.phase == Phase::Playing {
            self.director.update(&mut self.world, dt, &mut self.rng);
            self.cull(now);
            if self.director.level_complete(&self.world) {
                self.advance_level();
            }
        }
        events
    }

    /// Drain-and-handle until the bus settles. Handlers may publish
    /// follow-ups (a fatal hit publishes game over), which are processed
    /// in the same tick.
    fn dispatch(&mut self, now: f64) -> Vec<GameEvent> {
        let mut seen = Vec::new();
        while !self.bus.is_empty() {
            for envelope in self.bus.drain() {
                seen.push(envelope.event.clone());
                match envelope.event {
                    GameEvent::ShotFired { position, noise } => {
                        ai::handle_shot_fired(&mut self.world, position, noise);
                    }
                    GameEvent::Cry {
                        source,
                        position,
                        target,
                    } => {
                        ai::handle_cry(&mut self.world, source, position, target);
                    }
                    GameEvent::MobileInFire { target } => {
                        debug_assert!(matches!(envelope.delivery, Delivery::Targeted(_)));
                        if self.world.satisfies::<&Player>(target).unwrap_or(false) {
                            player_heat_gain(&mut self.world, target, now);
                        } else {
                            ai::enemy_heat_gain(&mut self.world, target, now);
                        }
                    }
                    GameEvent::EnemyKilled { points, .. } => {
                        self.scoreboard.award(points);
                    }
                    GameEvent::PlayerHurt => {
                        if damage_player(&mut self.world) {
                            self.bus.publish(GameEvent::GameOver {
                                final_score: self.scoreboard.current,
                            });
                        }
                    }
                    GameEvent::GameOver { .. } => {
                        self.scoreboard.on_game_over();
                        self.phase = Phase::GameOver;
                    }
                }
            }
        }
        seen
    }

    /// Remove enemies that drifted out of bounds (no score) and expired
    /// cry markers.
    fn cull(&mut self, now: f64) {
        for enemy in enemies_outside(&self.world, &self.director.bounds()) {
            let _ = self.world.despawn(enemy);
        }
        let expired: Vec<_> = self
            .world
            .query::<&CryMarker>()
            .iter()
            .filter(|(_, marker)| marker.expires_at <= now)
            .map(|(entity, _)| entity)
            .collect();
        for marker in expired {
            let _ = self.world.despawn(marker);
        }
    }

    /// Tear the level down and build the next one. The player's remaining
    /// life carries over; everything else is rebuilt from scratch.
    fn advance_level(&mut self) {
        let life = self
            .world
            .query::<&Player>()
            .iter()
            .next()
            .map(|(_, p)| p.life)
            .unwrap_or(player_tune::LIFE);
        let level = self.director.level + 1;

        self.world.clear();
        let start = Vec2::new(player_tune::START_X, player_tune::START_Y);
        let _ = self.world.spawn((
            Player::with_life(life),
            Position(start),
            Extent::square(player_tune::SIZE),
        ));
        populate_level(&mut self.world, level, start, &mut self.rng);
        self.director = WaveDirector::new(level, self.tree.cursor_count);
    }

    /// Place an enemy directly, bypassing the wave director and its quota.
    /// For scripted scenarios and harness checks.
    pub fn spawn_enemy(&mut self, cfg: EnemyConfig, at: Vec2) -> Entity {
        self.world.spawn((
            cfg,
            AiState::new(self.tree.cursor_count, &cfg),
            Position(at),
            Extent::square(cfg.size),
        ))
    }

    // ── Host queries ────────────────────────────────────────────────────

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.director.level
    }

    pub fn bounds(&self) -> PlaySpace {
        self.director.bounds()
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    pub fn player_position(&self) -> Option<Vec2> {
        ai::player_position(&self.world)
    }

    pub fn player_life(&self) -> Option<i32> {
        self.world
            .query::<&Player>()
            .iter()
            .next()
            .map(|(_, player)| player.life)
    }
}
