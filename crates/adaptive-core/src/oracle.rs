//! The host-facing game oracle.
//!
//! The engine never encodes the rules of the game it plays. Everything it
//! knows about legality, move effects and scoring comes from an [`Oracle`].

use crate::board::Board;
use crate::disc::Disc;
use crate::move_list::MoveList;
use crate::square::Square;
use crate::types::Score;

/// Component scores of a position, from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Evaluation {
    pub total: Score,
    pub pieces: Score,
    pub mobility: Score,
    pub corners: Score,
    pub edges: Score,
}

/// Legality, move simulation and evaluation for one game.
pub trait Oracle {
    /// Returns the legal moves of `player` on `board`.
    fn valid_moves(&self, board: &Board, player: Disc) -> MoveList;

    /// Returns the board after `player` plays `mv`, or `None` if the move is
    /// illegal. The input board is never modified.
    fn simulate_move(&self, board: &Board, player: Disc, mv: Square) -> Option<Board>;

    /// Scores `board` from `player`'s point of view.
    fn evaluate_board(&self, board: &Board, player: Disc) -> Evaluation;

    /// Reports who moves next after `mover` produced `board`, if the host can
    /// answer. The default knows nothing.
    fn next_to_move(&self, _board: &Board, _mover: Disc) -> Option<Disc> {
        None
    }
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn valid_moves(&self, board: &Board, player: Disc) -> MoveList {
        (**self).valid_moves(board, player)
    }

    fn simulate_move(&self, board: &Board, player: Disc, mv: Square) -> Option<Board> {
        (**self).simulate_move(board, player, mv)
    }

    fn evaluate_board(&self, board: &Board, player: Disc) -> Evaluation {
        (**self).evaluate_board(board, player)
    }

    fn next_to_move(&self, board: &Board, mover: Disc) -> Option<Disc> {
        (**self).next_to_move(board, mover)
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn valid_moves(&self, board: &Board, player: Disc) -> MoveList {
        (**self).valid_moves(board, player)
    }

    fn simulate_move(&self, board: &Board, player: Disc, mv: Square) -> Option<Board> {
        (**self).simulate_move(board, player, mv)
    }

    fn evaluate_board(&self, board: &Board, player: Disc) -> Evaluation {
        (**self).evaluate_board(board, player)
    }

    fn next_to_move(&self, board: &Board, mover: Disc) -> Option<Disc> {
        (**self).next_to_move(board, mover)
    }
}
