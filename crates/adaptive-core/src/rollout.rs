//! Uniformly random playouts.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::board::Board;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rules::{RuleFlags, next_player};
use crate::search::time_control::Deadline;

/// Plays up to `plies` uniformly random moves from `board`.
///
/// A side without moves passes; the playout ends early when neither side can
/// move, when the oracle rejects a move it listed, or when `deadline` passes.
///
/// # Returns
///
/// The final board.
pub fn random_playout<O: Oracle + ?Sized, R: Rng + ?Sized>(
    oracle: &O,
    board: &Board,
    player: Disc,
    flags: RuleFlags,
    plies: usize,
    deadline: Deadline,
    rng: &mut R,
) -> Board {
    let mut board = board.clone();
    let mut player = player;
    for _ in 0..plies {
        if deadline.is_reached() {
            break;
        }
        let mut moves = oracle.valid_moves(&board, player);
        if moves.is_empty() {
            player = player.opposite();
            moves = oracle.valid_moves(&board, player);
        }
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        let Some(next) = oracle.simulate_move(&board, player, mv) else {
            break;
        };
        player = next_player(&next, player, flags.fewer_pieces_continue);
        board = next;
    }
    board
}
