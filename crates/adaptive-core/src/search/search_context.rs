//! Per-search state shared by every node of one alpha-beta search.

use crate::board::Board;
use crate::disc::Disc;
use crate::move_list::MoveList;
use crate::oracle::Oracle;
use crate::rules::RuleFlags;
use crate::search::time_control::Deadline;
use crate::square::Square;
use crate::transposition_table::TranspositionTable;
use crate::types::Score;
use crate::weights::WeightMatrix;

pub struct SearchContext<'a, O: Oracle + ?Sized> {
    pub oracle: &'a O,
    pub weights: &'a WeightMatrix,
    pub flags: RuleFlags,
    /// Player maximised by the search; every score is from their view.
    pub root_player: Disc,
    pub deadline: Deadline,
    pub tt: &'a mut TranspositionTable,
    pub n_nodes: u64,
    aborted: bool,
}

impl<'a, O: Oracle + ?Sized> SearchContext<'a, O> {
    pub fn new(
        oracle: &'a O,
        weights: &'a WeightMatrix,
        flags: RuleFlags,
        root_player: Disc,
        deadline: Deadline,
        tt: &'a mut TranspositionTable,
    ) -> Self {
        SearchContext {
            oracle,
            weights,
            flags,
            root_player,
            deadline,
            tt,
            n_nodes: 0,
            aborted: false,
        }
    }

    /// Polls the clock. Once the deadline has been seen the search stays aborted.
    #[inline]
    pub fn check_deadline(&mut self) -> bool {
        if !self.aborted && self.deadline.is_reached() {
            self.aborted = true;
        }
        self.aborted
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Leaf value: oracle total plus the positional term, for the root player.
    #[inline]
    pub fn evaluate(&self, board: &Board) -> Score {
        evaluate_leaf(self.oracle, self.weights, board, self.root_player)
    }

    /// Orders moves for search: the transposition move first, then by
    /// descending cell weight.
    pub fn order_moves(&self, moves: MoveList, tt_move: Option<Square>) -> MoveList {
        order_moves(self.weights, moves, tt_move)
    }
}

/// Oracle total plus the positional term, from `player`'s point of view.
pub fn evaluate_leaf<O: Oracle + ?Sized>(
    oracle: &O,
    weights: &WeightMatrix,
    board: &Board,
    player: Disc,
) -> Score {
    oracle.evaluate_board(board, player).total + weights.static_eval(board, player)
}

/// Sorts moves by descending weight, then lifts `first` to the front if present.
pub fn order_moves(weights: &WeightMatrix, mut moves: MoveList, first: Option<Square>) -> MoveList {
    moves.sort_by(|a, b| weights.get(*b).total_cmp(&weights.get(*a)));
    if let Some(pos) = first.and_then(|sq| moves.iter().position(|&m| m == sq)) {
        moves[..=pos].rotate_right(1);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_moves() {
        let weights = WeightMatrix::from_values(2, vec![1.0, 5.0, 3.0, -1.0]);
        let moves: MoveList = [
            Square::new(0, 0),
            Square::new(0, 1),
            Square::new(1, 0),
            Square::new(1, 1),
        ]
        .into_iter()
        .collect();

        let ordered = order_moves(&weights, moves.clone(), None);
        assert_eq!(
            ordered.as_slice(),
            &[
                Square::new(0, 1),
                Square::new(1, 0),
                Square::new(0, 0),
                Square::new(1, 1)
            ]
        );

        let ordered = order_moves(&weights, moves, Some(Square::new(1, 1)));
        assert_eq!(ordered[0], Square::new(1, 1));
        assert_eq!(ordered[1], Square::new(0, 1));
        assert_eq!(ordered.len(), 4);
    }
}
