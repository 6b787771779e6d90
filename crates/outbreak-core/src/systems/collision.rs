//! Two-phase collision resolution.
//!
//! The engine primes the resolver during the movement/AI phase and resolves
//! once afterwards, so every mover sees one consistent snapshot of
//! positions regardless of system order. Resolution order inside a pass:
//! wall pushes, hazard exposure, bullets against enemies, enemies against
//! the player. Killed entities are marked during the pass and despawned in
//! one batch at the end, so a bullet is consumed by at most one enemy and a
//! dead enemy cannot also reach the player.

use std::collections::HashSet;

use hecs::{Entity, World};

use crate::components::{
    collides, AiState, Bullet, EnemyConfig, Extent, Hazard, Player, Position, Vec2, WallCollider,
};
use crate::config::collider;
use crate::events::{EventBus, GameEvent};

#[derive(Debug, Default)]
pub struct Collider {
    primed: bool,
}

impl Collider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a resolution pass at the end of the current tick.
    pub fn prime(&mut self) {
        self.primed = true;
    }

    /// Run one resolution pass if primed, publishing outcomes on `bus`.
    pub fn resolve(&mut self, world: &mut World, bus: &mut EventBus) {
        if !self.primed {
            return;
        }
        self.primed = false;

        let walls: Vec<(Vec2, Vec2, Extent)> = world
            .query::<(&WallCollider, &Position, &Extent)>()
            .iter()
            .map(|(_, (c, p, e))| (c.normal, p.0, *e))
            .collect();
        let hazards: Vec<(Vec2, Extent)> = world
            .query::<(&Hazard, &Position, &Extent)>()
            .iter()
            .map(|(_, (_, p, e))| (p.0, *e))
            .collect();
        let enemies: Vec<(Entity, Vec2, Extent, u32)> = world
            .query::<(&EnemyConfig, &AiState, &Position, &Extent)>()
            .iter()
            .map(|(id, (cfg, _, p, e))| (id, p.0, *e, cfg.points))
            .collect();
        let bullets: Vec<(Entity, Vec2, Extent)> = world
            .query::<(&Bullet, &Position, &Extent)>()
            .iter()
            .map(|(id, (_, p, e))| (id, p.0, *e))
            .collect();
        let player: Option<(Entity, Vec2, Extent)> = world
            .query::<(&Player, &Position, &Extent)>()
            .iter()
            .next()
            .map(|(id, (_, p, e))| (id, p.0, *e));

        let mut marked: HashSet<Entity> = HashSet::new();

        // Walls nudge every mover out along the strip's outward normal;
        // bullets are destroyed on the strip instead.
        let mut movers: Vec<(Entity, Vec2, Extent)> =
            enemies.iter().map(|&(id, p, e, _)| (id, p, e)).collect();
        if let Some(p) = player {
            movers.push(p);
        }
        for (entity, pos, extent) in &movers {
            let mut push = Vec2::ZERO;
            for &(normal, wall_pos, wall_extent) in &walls {
                if collides(*pos, *extent, wall_pos, wall_extent) {
                    push += normal * collider::WALL_PUSH;
                }
            }
            if push != Vec2::ZERO {
                if let Ok(mut p) = world.get::<&mut Position>(*entity) {
                    p.0 += push;
                }
            }
        }
        for &(bullet, pos, extent) in &bullets {
            if walls
                .iter()
                .any(|&(_, wall_pos, wall_extent)| collides(pos, extent, wall_pos, wall_extent))
            {
                marked.insert(bullet);
            }
        }

        // Hazard exposure is targeted at the mover standing in it; the
        // receiver's own fire debounce decides whether heat lands.
        for (entity, pos, extent) in &movers {
            for &(hazard_pos, hazard_extent) in &hazards {
                if collides(*pos, *extent, hazard_pos, hazard_extent) {
                    bus.publish_to(GameEvent::MobileInFire { target: *entity }, vec![*entity]);
                    break;
                }
            }
        }

        // First bullet to reach an enemy kills it and is spent; later
        // bullets in the same pass fly on.
        for &(enemy, enemy_pos, enemy_extent, points) in &enemies {
            for &(bullet, bullet_pos, bullet_extent) in &bullets {
                if marked.contains(&bullet) {
                    continue;
                }
                if collides(enemy_pos, enemy_extent, bullet_pos, bullet_extent) {
                    marked.insert(enemy);
                    marked.insert(bullet);
                    bus.publish(GameEvent::EnemyKilled { enemy, points });
                    break;
                }
            }
        }

        // A surviving enemy that reaches the player spends itself on the hit.
        if let Some((_, player_pos, player_extent)) = player {
            for &(enemy, enemy_pos, enemy_extent, _) in &enemies {
                if marked.contains(&enemy) {
                    continue;
                }
                if collides(enemy_pos, enemy_extent, player_pos, player_extent) {
                    marked.insert(enemy);
                    bus.publish(GameEvent::PlayerHurt);
                }
            }
        }

        for entity in marked {
            let _ = world.despawn(entity);
        }
    }
}
