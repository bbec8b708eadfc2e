//! Participants of a match.

use adaptive_core::{Board, Disc, RuleOracle, Square, Strategy};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// A side in a match: the adaptive engine or a random mover.
pub enum Player {
    Engine {
        name: String,
        strategy: Box<Strategy<RuleOracle>>,
    },
    Random {
        name: String,
        rng: StdRng,
    },
}

impl Player {
    pub fn engine(name: impl Into<String>, strategy: Strategy<RuleOracle>) -> Self {
        Player::Engine {
            name: name.into(),
            strategy: Box::new(strategy),
        }
    }

    pub fn random(name: impl Into<String>, rng: StdRng) -> Self {
        Player::Random {
            name: name.into(),
            rng,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Player::Engine { name, .. } | Player::Random { name, .. } => name,
        }
    }

    /// Picks a move from `valid_moves`, `None` when it is empty.
    pub fn choose_move(&mut self, board: &Board, player: Disc, valid_moves: &[Square]) -> Option<Square> {
        match self {
            Player::Engine { strategy, .. } => strategy.choose_move(board, player, valid_moves),
            Player::Random { rng, .. } => valid_moves.choose(rng).copied(),
        }
    }

    /// Prepares for a new game.
    pub fn new_game(&mut self) {
        if let Player::Engine { strategy, .. } = self {
            strategy.new_game();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_random_player_picks_valid_moves() {
        let mut player = Player::random("random", StdRng::seed_from_u64(3));
        let board = Board::standard();
        let moves: Vec<Square> = ["d3", "c4", "f5", "e6"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        for _ in 0..20 {
            let mv = player.choose_move(&board, Disc::Black, &moves).unwrap();
            assert!(moves.contains(&mv));
        }
        assert_eq!(player.choose_move(&board, Disc::Black, &[]), None);
        assert_eq!(player.name(), "random");
    }
}
