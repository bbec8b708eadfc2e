//! Plain minimax without pruning or memoization.
//!
//! Shares the leaf, pass and turn-order conventions of the alpha-beta search
//! and serves as its reference value.

use crate::board::Board;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rules::{RuleFlags, next_player};
use crate::search::search_context::evaluate_leaf;
use crate::types::{Depth, Score};
use crate::weights::WeightMatrix;

/// Computes the minimax value of `board` for `root_player`.
pub fn minimax<O: Oracle + ?Sized>(
    oracle: &O,
    weights: &WeightMatrix,
    flags: RuleFlags,
    board: &Board,
    side_to_move: Disc,
    root_player: Disc,
    depth: Depth,
) -> Score {
    let leaf = || evaluate_leaf(oracle, weights, board, root_player);
    if depth == 0 {
        return leaf();
    }

    let moves = oracle.valid_moves(board, side_to_move);
    if moves.is_empty() {
        let opponent = side_to_move.opposite();
        if oracle.valid_moves(board, opponent).is_empty() {
            return leaf();
        }
        return minimax(oracle, weights, flags, board, opponent, root_player, depth - 1);
    }

    let values = moves.iter().filter_map(|&mv| {
        let next = oracle.simulate_move(board, side_to_move, mv)?;
        let next_side = next_player(&next, side_to_move, flags.fewer_pieces_continue);
        Some(minimax(oracle, weights, flags, &next, next_side, root_player, depth - 1))
    });

    let best = if side_to_move == root_player {
        values.fold(None, |best: Option<Score>, v| Some(best.map_or(v, |b| b.max(v))))
    } else {
        values.fold(None, |best: Option<Score>, v| Some(best.map_or(v, |b| b.min(v))))
    };
    best.unwrap_or_else(leaf)
}
