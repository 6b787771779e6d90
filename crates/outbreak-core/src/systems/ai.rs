//! Enemy AI - the compiled behavior tree and its domain actions.
//!
//! Behavior is four Priority-ordered branches, evaluated top to bottom
//! every tick, each taking over exclusively when triggered:
//!
//! 1. **Burn out** - once heat reaches the kind's maximum, flee in a
//!    random direction for a fixed duration, then die.
//! 2. **Lunge** - when the player is within attack range, capture their
//!    position, wind up briefly, then charge along the captured direction.
//! 3. **Chase** - when a chase target is set (gunfire heard, ally cry, or
//!    the player wandering into awareness), close on it and periodically
//!    cry so nearby allies aggro too; clear the target once reached.
//! 4. **Wander** - roll a heading, speed, and duration, walk it out,
//!    re-roll.
//!
//! One compiled tree serves every enemy; zombies and skeletons differ only
//! by the [`EnemyConfig`] on the actor.

use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::behavior::{Actor, Clock, Node, Status, TreeBuilder};
use crate::components::{AiState, EnemyConfig, Player, Position, Vec2};
use crate::config::ai as tune;
use crate::config::fire;

/// Working copy of one enemy for a tree tick. Copied out of the world,
/// mutated by actions, written back by [`enemy_ai_system`].
pub struct EnemyActor {
    pub position: Vec2,
    pub state: AiState,
    pub cfg: EnemyConfig,
    pub despawn_requested: bool,
    pub cry_requested: bool,
}

impl Actor for EnemyActor {
    fn sequence_cursor(&mut self, slot: usize) -> &mut usize {
        &mut self.state.cursors[slot]
    }
}

/// Shared tick context for one AI pass.
pub struct AiCtx {
    pub dt: f32,
    pub now: f64,
    pub player_pos: Vec2,
    pub rng: SmallRng,
}

impl Clock for AiCtx {
    fn now(&self) -> f64 {
        self.now
    }
}

/// The enemy tree plus the cursor storage size actors must allocate.
pub struct CompiledTree {
    pub root: Node<EnemyActor, AiCtx>,
    pub cursor_count: usize,
}

/// What an AI pass asks the engine to do afterwards.
#[derive(Debug, Default)]
pub struct AiOutcome {
    pub despawned: Vec<Entity>,
    /// (source, source position, propagated chase target)
    pub cries: Vec<(Entity, Vec2, Vec2)>,
}

// ── Gates ───────────────────────────────────────────────────────────────

/// Once triggered, a burn-out runs to completion: the latch keeps the
/// branch selected even though heat decay drops `heat` below the maximum
/// during the flee.
fn is_burning(actor: &EnemyActor, _: &AiCtx) -> bool {
    actor.state.burning || actor.state.heat >= actor.cfg.max_heat
}

fn player_within_attack_range(actor: &EnemyActor, ctx: &AiCtx) -> bool {
    ctx.player_pos.distance(&actor.position) <= actor.cfg.attack_range
}

fn player_within_awareness(actor: &EnemyActor, ctx: &AiCtx) -> bool {
    ctx.player_pos.distance(&actor.position) <= actor.cfg.awareness
}

// ── Wander actions ──────────────────────────────────────────────────────

fn pick_wander_direction(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.wander_direction = random_direction(&mut ctx.rng);
    Status::Success
}

fn pick_wander_speed(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    let roll = ctx
        .rng
        .gen_range(tune::WANDER_SPEED_MIN..=tune::WANDER_SPEED_MAX)
        * actor.cfg.speed();
    // A roll above base speed means the tuning table is broken.
    assert!(
        roll <= actor.cfg.speed(),
        "wander speed roll {roll} exceeds base speed"
    );
    actor.state.wander_speed = roll;
    Status::Success
}

fn pick_wander_time(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.wander_time = ctx.rng.gen_range(tune::WANDER_TIME_MIN..=tune::WANDER_TIME_MAX);
    Status::Success
}

fn stamp_wander_start(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.wander_start = ctx.now;
    Status::Success
}

fn wander_step(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    let step = actor.state.wander_direction * actor.state.wander_speed * ctx.dt;
    actor.position += step;
    if ctx.now - actor.state.wander_start >= actor.state.wander_time as f64 {
        Status::Success
    } else {
        Status::Running
    }
}

// ── Lunge actions ───────────────────────────────────────────────────────

fn capture_attack_target(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.attack_target = ctx.player_pos;
    Status::Success
}

fn set_attack_direction(actor: &mut EnemyActor, _: &mut AiCtx) -> Status {
    actor.state.attack_direction = (actor.state.attack_target - actor.position).normalize();
    Status::Success
}

fn stamp_wind_up(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.wind_up = ctx.now;
    Status::Success
}

fn wait_wind_up(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    if ctx.now - actor.state.wind_up >= tune::LUNGE_WIND_UP {
        Status::Success
    } else {
        Status::Running
    }
}

fn stamp_attack_start(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.attack_start = ctx.now;
    Status::Success
}

fn attack_charge(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    let step = actor.state.attack_direction * actor.cfg.attack_speed() * ctx.dt;
    actor.position += step;
    if ctx.now - actor.state.attack_start >= actor.cfg.attack_time as f64 {
        Status::Success
    } else {
        Status::Running
    }
}

// ── Chase actions ───────────────────────────────────────────────────────

fn check_chase_target(actor: &mut EnemyActor, _: &mut AiCtx) -> Status {
    if actor.state.chase_target.is_some() {
        Status::Success
    } else {
        Status::Failure
    }
}

fn move_to_chase_target(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    let Some(target) = actor.state.chase_target else {
        return Status::Failure;
    };
    let step = (target - actor.position).normalize() * actor.cfg.speed() * ctx.dt;
    actor.position += step;
    if (target - actor.position).length() <= actor.cfg.size * tune::ARRIVAL_FACTOR {
        Status::Success
    } else {
        Status::Running
    }
}

fn clear_chase_target(actor: &mut EnemyActor, _: &mut AiCtx) -> Status {
    actor.state.chase_target = None;
    Status::Success
}

fn emit_cry(actor: &mut EnemyActor, _: &mut AiCtx) -> Status {
    actor.cry_requested = true;
    Status::Success
}

fn capture_chase_target(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.chase_target = Some(ctx.player_pos);
    Status::Success
}

// ── Burn-out actions ────────────────────────────────────────────────────

fn pick_flee_direction(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.burning = true;
    actor.state.flee_direction = random_direction(&mut ctx.rng);
    Status::Success
}

fn stamp_flee_start(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.flee_start = ctx.now;
    Status::Success
}

fn flee_step(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    let step = actor.state.flee_direction * actor.cfg.flee_speed() * ctx.dt;
    actor.position += step;
    if ctx.now - actor.state.flee_start >= actor.cfg.flee_time as f64 {
        Status::Success
    } else {
        Status::Running
    }
}

fn stamp_death_wait(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    actor.state.death_wait = ctx.now;
    Status::Success
}

fn wait_death(actor: &mut EnemyActor, ctx: &mut AiCtx) -> Status {
    if ctx.now - actor.state.death_wait >= tune::BURN_OUT_WAIT {
        Status::Success
    } else {
        Status::Running
    }
}

fn burn_out(actor: &mut EnemyActor, _: &mut AiCtx) -> Status {
    actor.despawn_requested = true;
    Status::Success
}

fn random_direction(rng: &mut SmallRng) -> Vec2 {
    Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)).normalize()
}

// ── Tree assembly ───────────────────────────────────────────────────────

/// Build the tree shared by every enemy kind.
pub fn enemy_tree() -> CompiledTree {
    let mut b = TreeBuilder::new();

    let burn_out_branch = Node::gate(
        is_burning,
        b.sequence(vec![
            Node::action(pick_flee_direction),
            Node::action(stamp_flee_start),
            Node::action(flee_step),
            Node::action(stamp_death_wait),
            Node::action(wait_death),
            Node::action(burn_out),
        ]),
    );

    let lunge = b.sequence(vec![
        Node::gate(player_within_attack_range, Node::action(capture_attack_target)),
        Node::action(set_attack_direction),
        Node::action(stamp_wind_up),
        Node::action(wait_wind_up),
        Node::action(stamp_attack_start),
        Node::action(attack_charge),
    ]);

    let chase_move = b.sequence(vec![
        Node::action(check_chase_target),
        Node::action(move_to_chase_target),
        Node::action(clear_chase_target),
    ]);
    let cry = Node::shared_debounce(
        tune::CRY_COOLDOWN,
        b.sequence(vec![Node::action(check_chase_target), Node::action(emit_cry)]),
    );
    let chase = Node::concurrent(
        vec![
            Node::concurrent(vec![chase_move, cry], 2),
            Node::gate(player_within_awareness, Node::action(capture_chase_target)),
        ],
        2,
    );

    let wander = b.sequence(vec![
        Node::action(pick_wander_direction),
        Node::action(pick_wander_speed),
        Node::action(pick_wander_time),
        Node::action(stamp_wander_start),
        Node::action(wander_step),
    ]);

    CompiledTree {
        cursor_count: b.cursor_count(),
        root: Node::priority(vec![burn_out_branch, lunge, chase, wander]),
    }
}

// ── System entry points ─────────────────────────────────────────────────

/// Position of the live player, if any.
pub fn player_position(world: &World) -> Option<Vec2> {
    world
        .query::<(&Player, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| pos.0)
}

/// Tick every enemy's behavior tree, then run the per-tick heat decay and
/// re-cry gate that live outside the tree.
pub fn enemy_ai_system(
    world: &mut World,
    tree: &mut CompiledTree,
    now: f64,
    dt: f32,
    rng: &mut SmallRng,
) -> AiOutcome {
    let mut outcome = AiOutcome::default();
    // No player alive: enemies idle rather than chase a phantom.
    let Some(player_pos) = player_position(world) else {
        return outcome;
    };

    let mut ctx = AiCtx {
        dt,
        now,
        player_pos,
        rng: rng.clone(),
    };

    let mut ticked: Vec<(Entity, EnemyActor)> = Vec::new();
    for (entity, (pos, state, cfg)) in world
        .query::<(&Position, &AiState, &EnemyConfig)>()
        .iter()
    {
        let mut actor = EnemyActor {
            position: pos.0,
            state: state.clone(),
            cfg: *cfg,
            despawn_requested: false,
            cry_requested: false,
        };
        let _ = tree.root.tick(&mut actor, &mut ctx);

        if actor.state.cool_gate.try_fire(now) {
            actor.state.heat = (actor.state.heat - 1).max(0);
        }
        if now - actor.state.last_cry > tune::RECRY_GATE && actor.state.chase_target.is_some() {
            actor.cry_requested = true;
            actor.state.last_cry = now;
        }

        ticked.push((entity, actor));
    }
    *rng = ctx.rng;

    for (entity, actor) in ticked {
        if actor.cry_requested {
            if let Some(target) = actor.state.chase_target {
                outcome.cries.push((entity, actor.position, target));
            }
        }
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.0 = actor.position;
        }
        if let Ok(mut state) = world.get::<&mut AiState>(entity) {
            *state = actor.state;
        }
        if actor.despawn_requested {
            outcome.despawned.push(entity);
        }
    }
    outcome
}

/// Gunfire aggro: every enemy within `awareness * noise` of the shot
/// records the shot position as its chase target.
pub fn handle_shot_fired(world: &mut World, position: Vec2, noise: f32) {
    for (_, (state, pos, cfg)) in world
        .query::<(&mut AiState, &Position, &EnemyConfig)>()
        .iter()
    {
        if position.distance(&pos.0) <= cfg.awareness * noise {
            state.chase_target = Some(position);
        }
    }
}

/// Cry propagation: an idle enemy far enough from the crier (at or beyond
/// its own awareness radius) adopts the crier's chase target. Propagation
/// reaches outward exactly once - receivers copy the target, not the cry.
pub fn handle_cry(world: &mut World, source: Entity, source_pos: Vec2, target: Vec2) {
    for (entity, (state, pos, cfg)) in world
        .query::<(&mut AiState, &Position, &EnemyConfig)>()
        .iter()
    {
        if entity == source || state.chase_target.is_some() {
            continue;
        }
        if pos.0.distance(&source_pos) >= cfg.awareness {
            state.chase_target = Some(target);
        }
    }
}

/// Hazard exposure for one enemy, gated by its own fire debounce.
pub fn enemy_heat_gain(world: &mut World, target: Entity, now: f64) {
    if let Ok(mut state) = world.get::<&mut AiState>(target) {
        if state.fire_gate.try_fire(now) {
            state.heat += fire::HEAT;
        }
    }
}
