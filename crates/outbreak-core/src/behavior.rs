//! Behavior tree engine - generic control flow over a mutable actor.
//!
//! A tree is a [`Node`] composed from the variants below and is evaluated
//! once per simulation step via [`Node::tick`]. One compiled tree serves
//! every actor that uses it, so nodes hold no per-actor state: anything
//! that must survive between ticks (a wander heading, a resume position in
//! a sequence) lives on the actor, reached through the [`Actor`] trait.
//!
//! The exception is [`Node::SharedDebounce`], whose timestamp is
//! deliberately tree-local and shared by all actors - it rate-limits an
//! action across the whole population (e.g. one cry per cooldown, no
//! matter how many enemies are chasing), replacing a global blackboard.

/// Result of ticking a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    /// The node has more work to do and should be resumed next tick.
    Running,
}

/// Per-actor storage the tree needs: one resume cursor per sequence node.
pub trait Actor {
    fn sequence_cursor(&mut self, slot: usize) -> &mut usize;
}

/// Read access to the simulation clock during a tick.
pub trait Clock {
    fn now(&self) -> f64;
}

/// A behavior tree node, generic over the actor `A` and tick context `C`.
pub enum Node<A, C> {
    /// Leaf performing a side effect; returns its status immediately.
    Action(fn(&mut A, &mut C) -> Status),
    /// Gates the child behind a predicate; a false predicate is Failure.
    Gate {
        pred: fn(&A, &C) -> bool,
        child: Box<Node<A, C>>,
    },
    /// Ticks children in order, resuming a Running child on the next
    /// tick. Fails on the first child Failure; succeeds only when every
    /// child has succeeded in one pass.
    Sequence {
        slot: usize,
        children: Vec<Node<A, C>>,
    },
    /// Ticks children in order and returns the first non-Failure result.
    Priority(Vec<Node<A, C>>),
    /// Ticks all children every call. Fails when at least `num_fail`
    /// children fail this tick; otherwise Running while any child runs,
    /// Success when none do.
    Concurrent {
        children: Vec<Node<A, C>>,
        num_fail: usize,
    },
    /// Rate-limits the child across all actors sharing the tree. The
    /// timestamp advances only when the child returns Success; a gated or
    /// failed attempt leaves the window untouched.
    SharedDebounce {
        child: Box<Node<A, C>>,
        cooldown: f64,
        last_fire: f64,
    },
}

impl<A: Actor, C: Clock> Node<A, C> {
    /// Evaluate this node once against `actor`.
    pub fn tick(&mut self, actor: &mut A, ctx: &mut C) -> Status {
        match self {
            Node::Action(run) => run(actor, ctx),
            Node::Gate { pred, child } => {
                if pred(actor, ctx) {
                    child.tick(actor, ctx)
                } else {
                    Status::Failure
                }
            }
            Node::Sequence { slot, children } => {
                let mut index = *actor.sequence_cursor(*slot);
                if index >= children.len() {
                    index = 0;
                }
                while index < children.len() {
                    match children[index].tick(actor, ctx) {
                        Status::Success => index += 1,
                        Status::Failure => {
                            *actor.sequence_cursor(*slot) = 0;
                            return Status::Failure;
                        }
                        Status::Running => {
                            *actor.sequence_cursor(*slot) = index;
                            return Status::Running;
                        }
                    }
                }
                *actor.sequence_cursor(*slot) = 0;
                Status::Success
            }
            Node::Priority(children) => {
                for child in children {
                    match child.tick(actor, ctx) {
                        Status::Failure => continue,
                        other => return other,
                    }
                }
                Status::Failure
            }
            Node::Concurrent { children, num_fail } => {
                let mut failed = 0;
                let mut running = false;
                for child in children {
                    match child.tick(actor, ctx) {
                        Status::Failure => failed += 1,
                        Status::Running => running = true,
                        Status::Success => {}
                    }
                }
                if failed >= *num_fail {
                    Status::Failure
                } else if running {
                    Status::Running
                } else {
                    Status::Success
                }
            }
            Node::SharedDebounce {
                child,
                cooldown,
                last_fire,
            } => {
                let now = ctx.now();
                if now >= *last_fire + *cooldown {
                    let result = child.tick(actor, ctx);
                    if result == Status::Success {
                        *last_fire = now;
                    }
                    result
                } else {
                    Status::Failure
                }
            }
        }
    }
}

/// Assigns cursor slots to sequence nodes as a tree is built, so every
/// actor can size its cursor storage to [`TreeBuilder::cursor_count`].
pub struct TreeBuilder {
    cursors: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { cursors: 0 }
    }

    pub fn sequence<A, C>(&mut self, children: Vec<Node<A, C>>) -> Node<A, C> {
        let slot = self.cursors;
        self.cursors += 1;
        Node::Sequence { slot, children }
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience constructors for the non-sequence variants.
impl<A, C> Node<A, C> {
    pub fn action(run: fn(&mut A, &mut C) -> Status) -> Self {
        Node::Action(run)
    }

    pub fn gate(pred: fn(&A, &C) -> bool, child: Node<A, C>) -> Self {
        Node::Gate {
            pred,
            child: Box::new(child),
        }
    }

    pub fn priority(children: Vec<Node<A, C>>) -> Self {
        Node::Priority(children)
    }

    pub fn concurrent(children: Vec<Node<A, C>>, num_fail: usize) -> Self {
        Node::Concurrent { children, num_fail }
    }

    pub fn shared_debounce(cooldown: f64, child: Node<A, C>) -> Self {
        Node::SharedDebounce {
            child: Box::new(child),
            cooldown,
            last_fire: f64::MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal actor that records which test actions ran.
    struct Probe {
        cursors: Vec<usize>,
        log: Vec<&'static str>,
        fail_second: bool,
        run_first: bool,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                cursors: vec![0; 8],
                log: Vec::new(),
                fail_second: false,
                run_first: false,
            }
        }
    }

    impl Actor for Probe {
        fn sequence_cursor(&mut self, slot: usize) -> &mut usize {
            &mut self.cursors[slot]
        }
    }

    struct TestCtx {
        now: f64,
    }

    impl Clock for TestCtx {
        fn now(&self) -> f64 {
            self.now
        }
    }

    fn first(actor: &mut Probe, _: &mut TestCtx) -> Status {
        actor.log.push("first");
        if actor.run_first {
            Status::Running
        } else {
            Status::Success
        }
    }

    fn second(actor: &mut Probe, _: &mut TestCtx) -> Status {
        actor.log.push("second");
        if actor.fail_second {
            Status::Failure
        } else {
            Status::Success
        }
    }

    fn third(actor: &mut Probe, _: &mut TestCtx) -> Status {
        actor.log.push("third");
        Status::Success
    }

    fn fail(actor: &mut Probe, _: &mut TestCtx) -> Status {
        actor.log.push("fail");
        Status::Failure
    }

    #[test]
    fn test_sequence_stops_at_failure() {
        let mut builder = TreeBuilder::new();
        let mut tree = builder.sequence(vec![
            Node::action(first),
            Node::action(second),
            Node::action(third),
        ]);
        let mut actor = Probe::new();
        actor.fail_second = true;
        let mut ctx = TestCtx { now: 0.0 };

        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
        // Child 1 ran its side effect, child 3 never ticked.
        assert_eq!(actor.log, vec!["first", "second"]);
    }

    #[test]
    fn test_sequence_resumes_running_child() {
        let mut builder = TreeBuilder::new();
        let mut tree = builder.sequence(vec![
            Node::action(second),
            Node::action(first),
            Node::action(third),
        ]);
        let mut actor = Probe::new();
        actor.run_first = true;
        let mut ctx = TestCtx { now: 0.0 };

        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Running);
        assert_eq!(actor.log, vec!["second", "first"]);

        // Next tick resumes at the running child, not the start.
        actor.run_first = false;
        actor.log.clear();
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Success);
        assert_eq!(actor.log, vec!["first", "third"]);
    }

    #[test]
    fn test_priority_returns_first_non_failure() {
        let mut tree = Node::priority(vec![
            Node::action(fail),
            Node::action(third),
            Node::action(second),
        ]);
        let mut actor = Probe::new();
        let mut ctx = TestCtx { now: 0.0 };

        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Success);
        // Exactly the first two children ticked.
        assert_eq!(actor.log, vec!["fail", "third"]);
    }

    #[test]
    fn test_priority_all_fail() {
        let mut tree = Node::priority(vec![Node::action(fail), Node::action(fail)]);
        let mut actor = Probe::new();
        let mut ctx = TestCtx { now: 0.0 };
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
    }

    #[test]
    fn test_concurrent_failure_threshold() {
        let mut tree = Node::concurrent(vec![Node::action(fail), Node::action(third)], 2);
        let mut actor = Probe::new();
        let mut ctx = TestCtx { now: 0.0 };
        // One failure is below the threshold of two.
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Success);

        let mut tree = Node::concurrent(vec![Node::action(fail), Node::action(fail)], 2);
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
    }

    #[test]
    fn test_gate_blocks_child() {
        fn never(_: &Probe, _: &TestCtx) -> bool {
            false
        }
        let mut tree = Node::gate(never, Node::action(third));
        let mut actor = Probe::new();
        let mut ctx = TestCtx { now: 0.0 };
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
        assert!(actor.log.is_empty());
    }

    #[test]
    fn test_shared_debounce_consumed_only_on_success() {
        let mut tree = Node::shared_debounce(1.0, Node::action(fail));
        let mut actor = Probe::new();
        let mut ctx = TestCtx { now: 0.0 };

        // Failed child leaves the window open.
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
        let mut tree = Node::shared_debounce(1.0, Node::action(third));
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Success);
        // Within cooldown: gated without ticking the child.
        actor.log.clear();
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Failure);
        assert!(actor.log.is_empty());
        // After cooldown it fires again.
        ctx.now = 1.0;
        assert_eq!(tree.tick(&mut actor, &mut ctx), Status::Success);
    }
}
