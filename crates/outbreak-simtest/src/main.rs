//! Outbreak Headless Simulation Harness
//!
//! Validates AI, combat, and wave pacing without a renderer or input
//! devices. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p outbreak-simtest
//!   cargo run -p outbreak-simtest -- --verbose

use hecs::World;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use outbreak_core::components::{
    AiState, Bullet, EnemyConfig, Hazard, Player, Position, Vec2, Wall, WallCollider,
};
use outbreak_core::config::{player as player_tune, waves};
use outbreak_core::engine::{Engine, Phase};
use outbreak_core::events::GameEvent;
use outbreak_core::generation::PlaySpace;
use outbreak_core::systems::spawning::{SpawnTimer, WaveDirector};

const TICK: f32 = 1.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Outbreak Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Tuning table consistency
    results.extend(validate_tuning(verbose));

    // 2. Behavior tree sweep
    results.extend(validate_behavior(verbose));

    // 3. Weapons & combat
    results.extend(validate_combat(verbose));

    // 4. Wave pacing & level progress
    results.extend(validate_waves(verbose));

    // 5. Full-run determinism
    results.extend(validate_determinism(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Strip walls and hazards so scripted scenarios have clean geometry.
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

// ── 1. Tuning table ─────────────────────────────────────────────────────

fn validate_tuning(verbose: bool) -> Vec<TestResult> {
    println!("--- Tuning Table ---");
    let mut results = Vec::new();

    let zombie = EnemyConfig::zombie();
    let skeleton = EnemyConfig::skeleton();

    results.push(check(
        "zombie slower than base, skeleton faster",
        zombie.speed() < 5.0 && skeleton.speed() > 5.0,
        format!("zombie {:.1}, skeleton {:.1}", zombie.speed(), skeleton.speed()),
    ));
    results.push(check(
        "attack and flee speeds scale from walk speed",
        zombie.attack_speed() == zombie.speed() * 2.0
            && zombie.flee_speed() == zombie.speed() * 3.0,
        format!(
            "attack {:.1}, flee {:.1}",
            zombie.attack_speed(),
            zombie.flee_speed()
        ),
    ));
    results.push(check(
        "skeleton sees farther and is worth more",
        skeleton.awareness > zombie.awareness && skeleton.points > zombie.points,
        format!(
            "awareness {} vs {}, points {} vs {}",
            skeleton.awareness, zombie.awareness, skeleton.points, zombie.points
        ),
    ));

    let mut limits = Vec::new();
    let mut monotonic = true;
    for level in 1..=6 {
        let director = WaveDirector::new(level, 0);
        let bounds = PlaySpace::for_level(level);
        if let Some(&(_, prev_limit, prev_right)) = limits.last() {
            monotonic &= director.spawn_limit > prev_limit && bounds.right > prev_right;
        }
        limits.push((level, director.spawn_limit, bounds.right));
    }
    results.push(check(
        "quota and bounds grow with level",
        monotonic,
        format!("level 1 -> {:?}, level 6 -> {:?}", limits[0], limits[5]),
    ));

    if verbose {
        for (level, limit, right) in &limits {
            println!("  level {level}: quota {limit}, half-extent {right}");
        }
    }
    results
}

// ── 2. Behavior tree sweep ──────────────────────────────────────────────

fn validate_behavior(_verbose: bool) -> Vec<TestResult> {
    println!("--- Behavior Tree ---");
    let mut results = Vec::new();

    // Wander: an enemy with nothing to react to still moves.
    let mut engine = Engine::new(11);
    clear_terrain(&mut engine);
    let far = engine.player_position().unwrap() + Vec2::new(-12.0, 9.0);
    let wanderer = engine.spawn_enemy(EnemyConfig::zombie(), far);
    for _ in 0..30 {
        engine.update(TICK);
    }
    let moved = engine
        .world()
        .get::<&Position>(wanderer)
        .map(|p| p.0.distance(&far))
        .unwrap_or(0.0);
    results.push(check(
        "idle enemy wanders",
        moved > 0.0,
        format!("moved {moved:.2} units in 0.5s"),
    ));

    // Chase: awareness capture pulls the enemy toward the player.
    let mut engine = Engine::new(12);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();
    let start = player_pos + Vec2::new(5.0, 0.0);
    let chaser = engine.spawn_enemy(EnemyConfig::zombie(), start);
    for _ in 0..30 {
        engine.update(TICK);
    }
    let (closed, target) = {
        let pos = engine.world().get::<&Position>(chaser).unwrap().0;
        let state = engine.world().get::<&AiState>(chaser).unwrap();
        (
            start.distance(&player_pos) - pos.distance(&player_pos),
            state.chase_target,
        )
    };
    results.push(check(
        "enemy inside awareness chases the player",
        closed > 0.5 && target.is_some(),
        format!("closed {closed:.2} units, target {target:?}"),
    ));

    // Burn out: a maxed-out enemy flees and then dies on its own.
    let mut engine = Engine::new(13);
    clear_terrain(&mut engine);
    let burner = engine.spawn_enemy(
        EnemyConfig::zombie(),
        engine.player_position().unwrap() + Vec2::new(-10.0, 0.0),
    );
    {
        let mut state = engine.world_mut().get::<&mut AiState>(burner).unwrap();
        state.heat = EnemyConfig::zombie().max_heat;
    }
    let mut survived = 0;
    for tick in 0..120 {
        engine.update(TICK);
        if engine.world().contains(burner) {
            survived = tick + 1;
        }
    }
    results.push(check(
        "overheated enemy burns out",
        !engine.world().contains(burner) && survived >= 60,
        format!("despawned after {survived} ticks"),
    ));

    results
}

// ── 3. Weapons & combat ─────────────────────────────────────────────────

fn validate_combat(_verbose: bool) -> Vec<TestResult> {
    println!("--- Weapons & Combat ---");
    let mut results = Vec::new();

    // Primary cooldown: hammering the trigger yields one bullet per gate.
    let mut engine = Engine::new(21);
    clear_terrain(&mut engine);
    let aim = engine.player_position().unwrap() + Vec2::new(10.0, 0.0);
    for _ in 0..12 {
        engine.fire_primary(aim);
        engine.update(TICK);
    }
    // 12 ticks = 0.2s: exactly one shot fits in the 0.4s cooldown.
    let bullets = engine.world().query::<&Bullet>().iter().count();
    results.push(check(
        "primary respects its cooldown",
        bullets == 1,
        format!("{bullets} bullets after 12 trigger pulls in 0.2s"),
    ));

    // Secondary: a spread of 2-5 bullets and a louder report.
    let mut engine = Engine::new(22);
    clear_terrain(&mut engine);
    let aim = engine.player_position().unwrap() + Vec2::new(4.0, 0.0);
    engine.fire_secondary(aim);
    let events = engine.update(TICK);
    let bullets = engine.world().query::<&Bullet>().iter().count();
    let noise = events.iter().find_map(|e| match e {
        GameEvent::ShotFired { noise, .. } => Some(*noise),
        _ => None,
    });
    results.push(check(
        "secondary spreads a burst",
        (2..=5).contains(&bullets) && noise == Some(player_tune::SECONDARY_NOISE_SCALAR),
        format!("{bullets} bullets, noise {noise:?}"),
    ));

    // A kill scores and removes both bullet and enemy.
    let mut engine = Engine::new(23);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();
    let victim = engine.spawn_enemy(EnemyConfig::skeleton(), player_pos + Vec2::new(4.0, 0.0));
    engine.fire_primary(player_pos + Vec2::new(4.0, 0.0));
    let mut killed = false;
    for _ in 0..60 {
        for event in engine.update(TICK) {
            killed |= matches!(event, GameEvent::EnemyKilled { enemy, .. } if enemy == victim);
        }
    }
    results.push(check(
        "bullet kill scores the kind's points",
        killed && engine.scoreboard().current == EnemyConfig::skeleton().points,
        format!(
            "killed={killed}, score {}",
            engine.scoreboard().current
        ),
    ));

    // Contact damage ends a one-life run exactly once.
    let mut engine = Engine::new(24);
    clear_terrain(&mut engine);
    let player_pos = engine.player_position().unwrap();
    for (_, player) in engine.world_mut().query::<&mut Player>().iter() {
        player.life = 1;
    }
    engine.spawn_enemy(EnemyConfig::zombie(), player_pos);
    engine.spawn_enemy(EnemyConfig::zombie(), player_pos);
    let mut game_overs = 0;
    for _ in 0..30 {
        for event in engine.update(TICK) {
            if matches!(event, GameEvent::GameOver { .. }) {
                game_overs += 1;
            }
        }
    }
    results.push(check(
        "game over fires exactly once",
        game_overs == 1 && engine.phase() == Phase::GameOver,
        format!("{game_overs} game-over events"),
    ));

    results
}

// ── 4. Wave pacing ──────────────────────────────────────────────────────

fn validate_waves(verbose: bool) -> Vec<TestResult> {
    println!("--- Wave Pacing ---");
    let mut results = Vec::new();

    let mut rng = SmallRng::seed_from_u64(31);
    let mut timer = SpawnTimer::new(waves::ZOMBIE_SPAWN_BASE, waves::ZOMBIE_SPAWN_INITIAL);
    let mut fires = 0;
    let mut steps = 0u32;
    for _ in 0..(120.0 / TICK) as u32 {
        steps += 1;
        if timer.tick(TICK, &mut rng) {
            fires += 1;
        }
    }
    // Base 3.0 with jitter in [0.5, 1.5): the 2-minute mean is ~40 fires.
    results.push(check(
        "spawn timer fires near its base rate",
        (25..=60).contains(&fires),
        format!("{fires} fires over {} ticks", steps),
    ));

    let mut rng = SmallRng::seed_from_u64(32);
    let mut world = World::new();
    world.spawn((
        Player::default(),
        Position::new(player_tune::START_X, player_tune::START_Y),
    ));
    let mut director = WaveDirector::new(2, 0);
    for _ in 0..(600.0 / TICK) as u32 {
        director.update(&mut world, TICK, &mut rng);
    }
    let live = world.query::<&EnemyConfig>().iter().count() as u32;
    results.push(check(
        "director stops exactly at quota",
        director.spawned == director.spawn_limit && live == director.spawn_limit,
        format!("spawned {}/{}", director.spawned, director.spawn_limit),
    ));

    let bounds = director.bounds();
    let player_pos = Vec2::new(player_tune::START_X, player_tune::START_Y);
    let mut placement_ok = true;
    let mut min_clearance = f32::MAX;
    for (_, (cfg, pos)) in world.query::<(&EnemyConfig, &Position)>().iter() {
        let clearance = pos.0.distance(&player_pos);
        min_clearance = min_clearance.min(clearance);
        placement_ok &= !bounds.outside(pos.0) && clearance > cfg.awareness;
    }
    results.push(check(
        "spawns stay in bounds and clear of the player",
        placement_ok,
        format!("min player clearance {min_clearance:.2}"),
    ));

    let skeletons = world
        .query::<&EnemyConfig>()
        .iter()
        .filter(|(_, cfg)| cfg.kind == outbreak_core::components::EnemyKind::Skeleton)
        .count() as u32;
    results.push(check(
        "both kinds appear over a long session",
        skeletons > 0 && skeletons < director.spawned,
        format!("{} skeletons of {}", skeletons, director.spawned),
    ));

    results.push(check(
        "level holds open while enemies live",
        !director.level_complete(&world),
        format!("{live} enemies alive at quota"),
    ));

    if verbose {
        println!("  director after 10 minutes: {director:?}");
    }
    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let run = |seed: u64| {
        let mut engine = Engine::new(seed);
        engine.set_player_intent(Vec2::new(0.3, 0.8));
        let mut events = 0usize;
        for tick in 0..600 {
            if tick % 30 == 0 {
                let aim = engine.player_position().unwrap_or(Vec2::ZERO) + Vec2::new(8.0, 2.0);
                engine.fire_primary(aim);
            }
            events += engine.update(TICK).len();
        }
        let mut positions: Vec<(f32, f32)> = engine
            .world()
            .query::<(&EnemyConfig, &Position)>()
            .iter()
            .map(|(_, (_, p))| (p.0.x, p.0.y))
            .collect();
        positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
        (events, positions, *engine.scoreboard())
    };

    let (events_a, pos_a, score_a) = run(0xDECAF);
    let (events_b, pos_b, score_b) = run(0xDECAF);
    let (_, pos_c, _) = run(0xBEEF);

    results.push(check(
        "same seed, same run",
        events_a == events_b && pos_a == pos_b && score_a.current == score_b.current,
        format!("{events_a} events, {} enemies", pos_a.len()),
    ));
    results.push(check(
        "different seed, different run",
        pos_a != pos_c,
        format!("{} vs {} enemies", pos_a.len(), pos_c.len()),
    ));

    if verbose {
        println!(
            "  run summary: {}",
            serde_json::to_string(&score_a).unwrap_or_default()
        );
    }
    results
}
