//! Run scoring - current, last, and top score tracking.

use serde::{Deserialize, Serialize};

/// Scores survive level transitions but the current run resets on game
/// over, after being folded into `last` and `top`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub current: u32,
    pub last: u32,
    pub top: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, points: u32) {
        self.current += points;
    }

    pub fn on_game_over(&mut self) {
        self.top = self.top.max(self.current);
        self.last = self.current;
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_folds_scores() {
        let mut board = ScoreBoard::new();
        board.award(10);
        board.award(15);
        board.on_game_over();
        assert_eq!(board.current, 0);
        assert_eq!(board.last, 25);
        assert_eq!(board.top, 25);

        // A weaker run updates last but not top.
        board.award(10);
        board.on_game_over();
        assert_eq!(board.last, 10);
        assert_eq!(board.top, 25);
    }
}
