//! Black-box inference of hidden rule variants.
//!
//! The prober builds small synthetic positions and asks the oracle about
//! them. It never mutates the real board and never fails: an inconclusive
//! probe leaves the corresponding flag at its standard-rules value.

use tracing::debug;

use crate::board::Board;
use crate::constants::DIRECTIONS;
use crate::disc::{Cell, Disc};
use crate::oracle::Oracle;
use crate::rules::RuleFlags;
use crate::square::Square;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Allowed,
    Denied,
    Inconclusive,
}

/// Infers the active rule variants of `oracle` on the stage whose initial
/// position is `board`.
///
/// # Arguments
///
/// * `board` - The stage's initial board; only its size, blocked cells and
///   placements are read.
/// * `oracle` - The host oracle being probed.
///
/// # Returns
///
/// The inferred flags. Each flag defaults to `false` when its probe is
/// inconclusive.
pub fn probe<O: Oracle + ?Sized>(board: &Board, oracle: &O) -> RuleFlags {
    let occlusion = probe_occlusion(board, oracle);
    let fewer_pieces = probe_fewer_pieces(board, oracle);
    debug!(?occlusion, ?fewer_pieces, "rule probes finished");

    RuleFlags {
        occlusion_allowed: occlusion == Verdict::Allowed,
        fewer_pieces_continue: fewer_pieces == Verdict::Allowed,
    }
}

/// Tries to flip an opponent disc through a blocked cell.
///
/// For a blocked cell `B` and direction `d`, Black plays at `T = B - 2d` with
/// a White disc at `B - d` and a Black anchor at `B + d`. Under strict rules
/// the blocked cell breaks the line and the move is illegal.
fn probe_occlusion<O: Oracle + ?Sized>(board: &Board, oracle: &O) -> Verdict {
    let size = board.size();
    let skeleton = blocked_skeleton(board);

    for blocked in board.squares_with(Cell::Blocked) {
        for (dr, dc) in DIRECTIONS {
            let (Some(target), Some(flanked), Some(anchor)) = (
                blocked.offset(dr, dc, -2, size),
                blocked.offset(dr, dc, -1, size),
                blocked.offset(dr, dc, 1, size),
            ) else {
                continue;
            };
            if [target, flanked, anchor]
                .iter()
                .any(|&sq| skeleton.get(sq).is_blocked())
            {
                continue;
            }

            // Same line with the blocked cell replaced by the anchor: legal
            // under any rules, so a rejection means the oracle does not accept
            // synthetic boards here.
            let control = skeleton
                .clone()
                .with_cell(blocked, Cell::Black)
                .with_cell(flanked, Cell::White);
            if !flips(oracle, &control, target, flanked) {
                debug!(%blocked, %target, "occlusion control probe rejected");
                continue;
            }

            let probe = skeleton
                .clone()
                .with_cell(flanked, Cell::White)
                .with_cell(anchor, Cell::Black);
            let verdict = if flips(oracle, &probe, target, flanked) {
                Verdict::Allowed
            } else {
                Verdict::Denied
            };
            debug!(%blocked, %target, ?verdict, "occlusion probe");
            return verdict;
        }
    }

    Verdict::Inconclusive
}

/// Asks who moves after Black ends a move with fewer discs than White.
fn probe_fewer_pieces<O: Oracle + ?Sized>(board: &Board, oracle: &O) -> Verdict {
    let mut imbalanced = board.clone();
    let mut black = board.squares_with(Cell::Black);
    if black.next().is_none() {
        return Verdict::Inconclusive;
    }
    let removed: Vec<Square> = black.collect();
    for sq in removed {
        imbalanced.set(sq, Cell::Empty);
    }

    let moves = oracle.valid_moves(&imbalanced, Disc::Black);
    if moves.is_empty() {
        debug!("fewer-pieces probe: no black move on the imbalanced board");
        return Verdict::Inconclusive;
    }

    let behind = moves
        .iter()
        .filter_map(|&mv| oracle.simulate_move(&imbalanced, Disc::Black, mv))
        .find(|after| after.disc_count(Disc::Black) < after.disc_count(Disc::White));
    let question = match behind {
        Some(after) => after,
        None if imbalanced.disc_count(Disc::Black) < imbalanced.disc_count(Disc::White) => {
            imbalanced
        }
        None => return Verdict::Inconclusive,
    };

    let verdict = match oracle.next_to_move(&question, Disc::Black) {
        Some(Disc::Black) => Verdict::Allowed,
        Some(Disc::White) => Verdict::Denied,
        None => Verdict::Inconclusive,
    };
    debug!(?verdict, "fewer-pieces probe");
    verdict
}

/// An empty board of the same size keeping only the blocked cells.
fn blocked_skeleton(board: &Board) -> Board {
    let mut skeleton = Board::new(board.size());
    for sq in board.squares_with(Cell::Blocked) {
        skeleton.set(sq, Cell::Blocked);
    }
    skeleton
}

/// Returns `true` if Black may play `target` on `board` and the move flips `flanked`.
fn flips<O: Oracle + ?Sized>(oracle: &O, board: &Board, target: Square, flanked: Square) -> bool {
    oracle
        .simulate_move(board, Disc::Black, target)
        .is_some_and(|after| after.get(flanked) == Cell::Black)
}
