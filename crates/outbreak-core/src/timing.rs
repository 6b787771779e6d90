//! Debounce gate - allows an action at most once per interval.
//!
//! All gates read the engine's simulation clock (seconds accumulated from
//! tick deltas), never wall time, so paused or replayed runs stay coherent.

use serde::{Deserialize, Serialize};

/// A minimum-interval gate. The timestamp advances only on an actual
/// firing: checking a closed gate, or deciding not to run the wrapped
/// action, does not consume it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Debounce {
    interval: f64,
    last: f64,
}

impl Debounce {
    /// A gate that is open immediately and then at most once per `interval`.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last: f64::MIN,
        }
    }

    /// Consume the gate if it is open. Call this only when the wrapped
    /// action actually runs.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if now - self.last >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let mut gate = Debounce::new(0.5);
        assert!(gate.try_fire(1.0));
        assert!(!gate.try_fire(1.2));
        assert!(!gate.try_fire(1.49));
        assert!(gate.try_fire(1.5));
    }

    #[test]
    fn test_suppressed_call_does_not_consume() {
        let mut gate = Debounce::new(1.0);
        assert!(gate.try_fire(0.0));
        // A suppressed attempt must not push the window out.
        assert!(!gate.try_fire(0.9));
        assert!(gate.try_fire(1.0));
    }
}
