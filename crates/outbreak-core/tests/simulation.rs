//! End-to-end simulation scenarios driven through the public engine API.

use outbreak_core::components::{AiState, EnemyConfig, Hazard, Vec2, Wall, WallCollider};
use outbreak_core::engine::{Engine, Phase};
use outbreak_core::events::GameEvent;

const TICK: f32 = 1.0 / 60.0;

/// Remove level terrain so a scripted scenario has a clean firing lane.
fn clear_terrain(engine: &mut Engine) {
    let terrain: Vec<_> = engine
        .world()
        .query::<()>()
        .with::<&Wall>()
        .iter()
        .map(|(e, _)| e)
        .chain(
            engine
                .world()
                .query::<()>()
                .with::<&WallCollider>()
                .iter()
                .map(|(e, _)| e),
        )
        .chain(
            engine
                .world()
                .query::<()>()
                .with::<&Hazard>()
                .iter()
                .map(|(e, _)| e),
        )
        .collect();
    for entity in terrain {
        let _ = engine.world_mut().despawn(entity);
    }
}

#[test]
fn test_shot_kills_approaching_enemy_and_scores() {
    let mut engine = Engine::new(1);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();

    // A skeleton down the lane; it will chase the player head-on.
    let target = player_pos + Vec2::new(4.0, 0.0);
    let skeleton = engine.spawn_enemy(EnemyConfig::skeleton(), target);
    engine.fire_primary(target);

    let mut kills = Vec::new();
    for _ in 0..60 {
        for event in engine.update(TICK) {
            if let GameEvent::EnemyKilled { enemy, points } = event {
                kills.push((enemy, points));
            }
        }
    }

    assert_eq!(kills.len(), 1, "one bullet, one kill: {kills:?}");
    assert_eq!(kills[0], (skeleton, EnemyConfig::skeleton().points));
    assert!(!engine.world().contains(skeleton));
    assert_eq!(engine.scoreboard().current, EnemyConfig::skeleton().points);
    // The spent bullet is gone.
    assert_eq!(
        engine
            .world()
            .query::<&outbreak_core::components::Bullet>()
            .iter()
            .count(),
        0
    );
}

#[test]
fn test_simultaneous_hits_end_run_exactly_once() {
    let mut engine = Engine::new(2);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();
    for (_, player) in engine
        .world_mut()
        .query::<&mut outbreak_core::components::Player>()
        .iter()
    {
        player.life = 1;
    }

    // Two zombies standing on the player: both hit in the same resolver
    // pass, but only the first hit can end the run.
    engine.spawn_enemy(EnemyConfig::zombie(), player_pos);
    engine.spawn_enemy(EnemyConfig::zombie(), player_pos);

    let mut game_overs = 0;
    let mut hurts = 0;
    for _ in 0..30 {
        for event in engine.update(TICK) {
            match event {
                GameEvent::GameOver { .. } => game_overs += 1,
                GameEvent::PlayerHurt => hurts += 1,
                _ => {}
            }
        }
    }

    assert_eq!(hurts, 2);
    assert_eq!(game_overs, 1);
    assert_eq!(engine.phase(), Phase::GameOver);
}

#[test]
fn test_cry_recruits_distant_idle_enemy() {
    let mut engine = Engine::new(3);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();

    // The crier sits inside its own awareness of the player; the listener
    // is beyond the crier's awareness radius (cries recruit outward) but
    // cannot see the player itself.
    engine.spawn_enemy(EnemyConfig::zombie(), player_pos + Vec2::new(4.0, 0.0));
    let listener = engine.spawn_enemy(EnemyConfig::zombie(), player_pos + Vec2::new(4.0, 7.0));

    let mut cries = 0;
    for _ in 0..60 {
        for event in engine.update(TICK) {
            if matches!(event, GameEvent::Cry { .. }) {
                cries += 1;
            }
        }
    }

    assert!(cries >= 1, "chasing enemy never cried");
    let state = engine.world().get::<&AiState>(listener).unwrap();
    assert!(
        state.chase_target.is_some(),
        "listener was not recruited by the cry"
    );
}

#[test]
fn test_long_run_keeps_enemies_in_bounds() {
    let mut engine = Engine::new(4);
    engine.set_player_intent(Vec2::new(1.0, 1.0));

    let mut last_score = 0;
    for second in 0..30 {
        for tick in 0..60 {
            // Strafe and fire away from the play space center now and then.
            if tick == 0 {
                let aim = engine.player_position().unwrap_or(Vec2::ZERO) + Vec2::new(10.0, 0.0);
                engine.fire_primary(aim);
            }
            engine.update(TICK);
            if engine.phase() == Phase::GameOver {
                return;
            }
        }
        // Every spawned or surviving enemy stays strictly inside bounds.
        let bounds = engine.bounds();
        for (_, pos) in engine
            .world()
            .query::<&outbreak_core::components::Position>()
            .with::<&EnemyConfig>()
            .iter()
        {
            assert!(
                !bounds.outside(pos.0),
                "enemy outside bounds at second {second}: {:?}",
                pos.0
            );
        }
        // Score never goes down while the run is live.
        assert!(engine.scoreboard().current >= last_score);
        last_score = engine.scoreboard().current;
    }
}
