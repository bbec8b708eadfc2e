use crate::board::Board;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rules::{RuleOracle, next_player};

/// Executes a perft run with standard rules from the standard initial position.
///
/// # Arguments
///
/// * `depth` - Number of plies to expand from the initial position. A depth of
///   `1` counts the immediate legal moves; larger values walk the tree
///   recursively.
///
/// # Returns
///
/// The total leaf count of the move tree.
pub fn perft_root(depth: u32) -> u64 {
    perft(&RuleOracle::standard(), &Board::standard(), Disc::Black, depth, false)
}

/// Counts the leaves of the move tree below `board`.
///
/// A side without moves passes when its opponent can move; a position where
/// neither side can move counts as one leaf.
pub fn perft<O: Oracle + ?Sized>(
    oracle: &O,
    board: &Board,
    side_to_move: Disc,
    depth: u32,
    fewer_pieces_continue: bool,
) -> u64 {
    let moves = oracle.valid_moves(board, side_to_move);

    if moves.is_empty() {
        let opponent = side_to_move.opposite();
        if oracle.valid_moves(board, opponent).is_empty() {
            return 1;
        }
        return perft(oracle, board, opponent, depth, fewer_pieces_continue);
    }

    let mut nodes = 0;
    for &mv in &moves {
        let Some(next) = oracle.simulate_move(board, side_to_move, mv) else {
            continue;
        };
        if depth <= 1 {
            nodes += 1;
        } else {
            let next_side = next_player(&next, side_to_move, fewer_pieces_continue);
            nodes += perft(oracle, &next, next_side, depth - 1, fewer_pieces_continue);
        }
    }
    nodes
}
