//! Player movement, weapons, heat, and damage.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Bullet, Extent, Player, Position, Vec2};
use crate::config::{self, player as tune, BASE_SPEED};
use crate::events::{EventBus, GameEvent};

/// Move the player along the host-supplied intent vector. Intent longer
/// than a unit vector is clamped so diagonals are no faster.
pub fn player_move_system(world: &mut World, dt: f32, intent: Vec2) {
    let direction = if intent.length() > 1.0 {
        intent.normalize()
    } else {
        intent
    };
    for (_, (_, pos)) in world.query::<(&Player, &mut Position)>().iter() {
        pos.0 += direction * BASE_SPEED * dt;
    }
}

/// Advance bullets and return the ones that have covered their range.
pub fn bullet_flight_system(world: &mut World, dt: f32) -> Vec<Entity> {
    let mut expired = Vec::new();
    for (entity, (bullet, pos)) in world.query::<(&mut Bullet, &mut Position)>().iter() {
        let step = bullet.direction * bullet.speed() * dt;
        pos.0 += step;
        bullet.traveled += step.length();
        if bullet.traveled >= bullet.max_distance {
            expired.push(entity);
        }
    }
    expired
}

/// Per-tick heat handling: while at maximum heat take damage on the
/// overheat gate, then decay one point on the cool gate. Returns how many
/// damage ticks landed (0 or 1) so the caller can publish the hurt event.
pub fn player_heat_system(world: &mut World, now: f64) -> u32 {
    let mut hurts = 0;
    for (_, player) in world.query::<&mut Player>().iter() {
        if player.heat >= tune::MAX_HEAT && player.overheat_gate.try_fire(now) {
            hurts += 1;
        }
        if player.cool_gate.try_fire(now) {
            player.heat = (player.heat - 1).max(0);
        }
    }
    hurts
}

/// Hazard exposure for the player, gated by the fire debounce.
pub fn player_heat_gain(world: &mut World, target: Entity, now: f64) {
    if let Ok(mut player) = world.get::<&mut Player>(target) {
        if player.fire_gate.try_fire(now) {
            player.heat += config::fire::HEAT;
        }
    }
}

/// Take one point of damage. Reports `true` when this hit ended the run;
/// further hits on an already-dead player do nothing, so game over is
/// signalled exactly once.
pub fn damage_player(world: &mut World) -> bool {
    for (_, player) in world.query::<&mut Player>().iter() {
        if player.life <= 0 {
            return false;
        }
        player.life -= 1;
        return player.life == 0;
    }
    false
}

/// Fire the primary weapon toward `at`: one fast, long-range bullet and a
/// quiet report. No-op while the weapon is on cooldown.
pub fn fire_primary(world: &mut World, bus: &mut EventBus, at: Vec2, now: f64) {
    let Some(origin) = try_fire_gate(world, now, Weapon::Primary) else {
        return;
    };
    let direction = (at - origin).normalize();
    spawn_bullet(world, origin, direction, tune::PRIMARY_MAX_DISTANCE);
    bus.publish(GameEvent::ShotFired {
        position: origin,
        noise: tune::PRIMARY_NOISE_SCALAR,
    });
}

/// Fire the secondary weapon toward `at`: a short-range spread of several
/// bullets and a loud report that aggros a wide radius.
pub fn fire_secondary(
    world: &mut World,
    bus: &mut EventBus,
    rng: &mut impl Rng,
    at: Vec2,
    now: f64,
) {
    let Some(origin) = try_fire_gate(world, now, Weapon::Secondary) else {
        return;
    };
    let direction = (at - origin).normalize();
    let count = rng.gen_range(1..=2) + rng.gen_range(1..=2) + rng.gen_range(0..=1);
    for _ in 0..count {
        let spread = rng.gen_range(-tune::SECONDARY_SPREAD..=tune::SECONDARY_SPREAD);
        spawn_bullet(
            world,
            origin,
            direction.rotate(spread),
            tune::SECONDARY_MAX_DISTANCE,
        );
    }
    bus.publish(GameEvent::ShotFired {
        position: origin,
        noise: tune::SECONDARY_NOISE_SCALAR,
    });
}

enum Weapon {
    Primary,
    Secondary,
}

/// Check the relevant cooldown gate; on success, consume it and return the
/// muzzle position.
fn try_fire_gate(world: &mut World, now: f64, weapon: Weapon) -> Option<Vec2> {
    for (_, (player, pos)) in world.query::<(&mut Player, &Position)>().iter() {
        let gate = match weapon {
            Weapon::Primary => &mut player.primary_gate,
            Weapon::Secondary => &mut player.secondary_gate,
        };
        if gate.try_fire(now) {
            return Some(pos.0);
        }
        return None;
    }
    None
}

fn spawn_bullet(world: &mut World, origin: Vec2, direction: Vec2, max_distance: f32) {
    let _ = world.spawn((
        Bullet::new(direction, max_distance),
        Position(origin),
        Extent::square(config::bullet::SIZE),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world_with_player() -> World {
        let mut world = World::new();
        world.spawn((
            Player::default(),
            Position::new(0.0, 0.0),
            Extent::square(tune::SIZE),
        ));
        world
    }

    #[test]
    fn test_intent_is_clamped() {
        let mut world = world_with_player();
        player_move_system(&mut world, 1.0, Vec2::new(3.0, 4.0));
        let pos = world
            .query::<(&Player, &Position)>()
            .iter()
            .next()
            .map(|(_, (_, p))| p.0)
            .unwrap();
        assert!((pos.length() - BASE_SPEED).abs() < 0.001);
    }

    #[test]
    fn test_primary_fires_once_per_cooldown() {
        let mut world = world_with_player();
        let mut bus = EventBus::new();

        fire_primary(&mut world, &mut bus, Vec2::new(10.0, 0.0), 0.0);
        fire_primary(&mut world, &mut bus, Vec2::new(10.0, 0.0), 0.1);
        assert_eq!(world.query::<&Bullet>().iter().count(), 1);
        assert_eq!(bus.drain().len(), 1);

        fire_primary(&mut world, &mut bus, Vec2::new(10.0, 0.0), tune::PRIMARY_COOLDOWN);
        assert_eq!(world.query::<&Bullet>().iter().count(), 2);
    }

    #[test]
    fn test_secondary_spreads_multiple_bullets() {
        let mut world = world_with_player();
        let mut bus = EventBus::new();
        let mut rng = SmallRng::seed_from_u64(5);

        fire_secondary(&mut world, &mut bus, &mut rng, Vec2::new(10.0, 0.0), 0.0);
        let count = world.query::<&Bullet>().iter().count();
        assert!((2..=5).contains(&count));

        match bus.drain()[0].event {
            GameEvent::ShotFired { noise, .. } => {
                assert_eq!(noise, tune::SECONDARY_NOISE_SCALAR)
            }
            ref other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_bullet_expires_at_range() {
        let mut world = World::new();
        let bullet = world.spawn((
            Bullet::new(Vec2::new(1.0, 0.0), 15.0),
            Position::new(0.0, 0.0),
            Extent::square(config::bullet::SIZE),
        ));

        // 15 units at speed 15 is exactly one second of flight.
        assert!(bullet_flight_system(&mut world, 0.5).is_empty());
        let expired = bullet_flight_system(&mut world, 0.5);
        assert_eq!(expired, vec![bullet]);
    }

    #[test]
    fn test_overheat_damage_is_gated() {
        let mut world = world_with_player();
        for (_, player) in world.query::<&mut Player>().iter() {
            player.heat = tune::MAX_HEAT;
        }

        // Decay fires at 0.0 too, but heat stays at max long enough for
        // the overheat gate to land.
        assert_eq!(player_heat_system(&mut world, 0.0), 1);
        for (_, player) in world.query::<&mut Player>().iter() {
            player.heat = tune::MAX_HEAT;
        }
        assert_eq!(player_heat_system(&mut world, 0.1), 0);
        for (_, player) in world.query::<&mut Player>().iter() {
            player.heat = tune::MAX_HEAT;
        }
        assert_eq!(player_heat_system(&mut world, tune::HANDLE_HEAT_DEBOUNCE), 1);
    }

    #[test]
    fn test_damage_reports_death_exactly_once() {
        let mut world = World::new();
        world.spawn((Player::with_life(2), Position::new(0.0, 0.0)));

        assert!(!damage_player(&mut world));
        assert!(damage_player(&mut world));
        // Dead player absorbs nothing further.
        assert!(!damage_player(&mut world));
    }
}
