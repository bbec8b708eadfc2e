//! Outcome of a single game.

use adaptive_core::Disc;

/// Winner of a finished game by disc count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    BlackWin,
    WhiteWin,
    Draw,
}

impl GameResult {
    /// Classifies a final position from its disc counts.
    pub fn from_counts(black: usize, white: usize) -> Self {
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => GameResult::BlackWin,
            std::cmp::Ordering::Less => GameResult::WhiteWin,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    /// The winning colour, `None` for a draw.
    pub fn winner(self) -> Option<Disc> {
        match self {
            GameResult::BlackWin => Some(Disc::Black),
            GameResult::WhiteWin => Some(Disc::White),
            GameResult::Draw => None,
        }
    }
}

/// Everything recorded about a finished game.
#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub result: GameResult,
    pub black_discs: usize,
    pub white_discs: usize,
    /// Moves placed by each side, passes excluded
    pub black_moves: usize,
    pub white_moves: usize,
    pub black_ms: u64,
    pub white_ms: u64,
    /// Set when a side ran past its budget plus one move of grace
    pub overrun: Option<Disc>,
}

impl GameOutcome {
    /// Disc difference from Black's point of view.
    pub fn score(&self) -> i32 {
        self.black_discs as i32 - self.white_discs as i32
    }

    /// Disc difference from `player`'s point of view.
    pub fn score_for(&self, player: Disc) -> i32 {
        match player {
            Disc::Black => self.score(),
            Disc::White => -self.score(),
        }
    }

    /// Moves placed by `player`.
    pub fn moves(&self, player: Disc) -> usize {
        match player {
            Disc::Black => self.black_moves,
            Disc::White => self.white_moves,
        }
    }

    /// Milliseconds spent by `player`.
    pub fn time_ms(&self, player: Disc) -> u64 {
        match player {
            Disc::Black => self.black_ms,
            Disc::White => self.white_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(black: usize, white: usize) -> GameOutcome {
        GameOutcome {
            result: GameResult::from_counts(black, white),
            black_discs: black,
            white_discs: white,
            black_moves: 30,
            white_moves: 28,
            black_ms: 10,
            white_ms: 20,
            overrun: None,
        }
    }

    #[test]
    fn test_result_from_counts() {
        assert_eq!(GameResult::from_counts(40, 24), GameResult::BlackWin);
        assert_eq!(GameResult::from_counts(10, 54), GameResult::WhiteWin);
        assert_eq!(GameResult::from_counts(32, 32), GameResult::Draw);
        assert_eq!(GameResult::Draw.winner(), None);
        assert_eq!(GameResult::WhiteWin.winner(), Some(Disc::White));
    }

    #[test]
    fn test_scores() {
        let game = outcome(40, 24);
        assert_eq!(game.score(), 16);
        assert_eq!(game.score_for(Disc::White), -16);
        assert_eq!(game.time_ms(Disc::White), 20);
        assert_eq!(game.moves(Disc::White), 28);
    }
}
