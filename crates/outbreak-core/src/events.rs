//! Typed game events and the bus that queues them during a tick.
//!
//! Events decouple collision outcomes, aggro propagation, and game-over
//! signaling from their direct causes. Delivery is synchronous within the
//! tick: the engine drains the bus after the collision pass and runs every
//! handler to completion before the tick ends. Handlers may publish
//! follow-up events (a fatal `PlayerHurt` publishes `GameOver`) but never
//! trigger a nested resolver pass.

use hecs::Entity;

use crate::components::Vec2;

/// Everything the simulation announces to entities and to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy died to a bullet. Consumed by scoring.
    EnemyKilled { enemy: Entity, points: u32 },
    /// The player's life reached zero. Emitted exactly once per run.
    GameOver { final_score: u32 },
    /// An enemy reached the player and spent itself on the hit.
    PlayerHurt,
    /// The player fired; enemies within `awareness * noise` aggro.
    ShotFired { position: Vec2, noise: f32 },
    /// A mover is standing in a hazard. Always targeted at that mover.
    MobileInFire { target: Entity },
    /// A chasing enemy called for help, propagating its chase target.
    Cry {
        source: Entity,
        position: Vec2,
        target: Vec2,
    },
}

/// Who receives an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Every interested handler sees it.
    Broadcast,
    /// Only the listed entities' handlers see it.
    Targeted(Vec<Entity>),
}

/// An event paired with its delivery mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub event: GameEvent,
    pub delivery: Delivery,
}

/// Queues events published during a tick for synchronous dispatch.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Envelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish to every interested handler.
    pub fn publish(&mut self, event: GameEvent) {
        self.queue.push(Envelope {
            event,
            delivery: Delivery::Broadcast,
        });
    }

    /// Publish to an explicit set of target entities only.
    pub fn publish_to(&mut self, event: GameEvent, targets: Vec<Entity>) {
        self.queue.push(Envelope {
            event,
            delivery: Delivery::Targeted(targets),
        });
    }

    /// Take everything queued so far, leaving the bus empty. Handlers may
    /// publish again while the drained batch is being processed.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let mut bus = EventBus::new();
        bus.publish(GameEvent::PlayerHurt);
        bus.publish(GameEvent::GameOver { final_score: 40 });

        let batch = bus.drain();
        assert_eq!(batch.len(), 2);
        assert!(bus.is_empty());
        assert_eq!(batch[0].delivery, Delivery::Broadcast);
        assert_eq!(batch[0].event, GameEvent::PlayerHurt);
    }

    #[test]
    fn test_targeted_delivery_mode() {
        let mut world = hecs::World::new();
        let target = world.spawn(());

        let mut bus = EventBus::new();
        bus.publish_to(GameEvent::MobileInFire { target }, vec![target]);

        let batch = bus.drain();
        match &batch[0].delivery {
            Delivery::Targeted(targets) => assert_eq!(targets, &vec![target]),
            Delivery::Broadcast => panic!("expected targeted delivery"),
        }
    }
}
