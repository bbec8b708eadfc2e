//! Transposition-memoized alpha-beta.
//!
//! Max nodes belong to the root player, min nodes to the opponent. Scores are
//! fail-soft, so every stored value carries a bound that keeps cached results
//! consistent with the plain minimax value.

use tracing::warn;

use crate::board::Board;
use crate::constants::SCORE_INF;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rules::next_player;
use crate::search::node_type::NodeType;
use crate::search::search_context::SearchContext;
use crate::search::search_result::PvPly;
use crate::transposition_table::Bound;
use crate::types::{Depth, Score};

/// Searches one node.
///
/// # Arguments
///
/// * `ctx` - Search context holding the oracle, weights, table and deadline.
/// * `board` - Position to search.
/// * `side_to_move` - Player to move on `board`.
/// * `depth` - Remaining depth in plies. A pass consumes one ply.
/// * `alpha` - Lower window bound.
/// * `beta` - Upper window bound.
/// * `ply` - Distance from the root.
/// * `pv` - Receives the best line below this node. At the root the best move
///   is always recorded; deeper plies only for PV nodes.
///
/// # Returns
///
/// The node's value from the root player's point of view. Meaningless once
/// the context is aborted.
#[allow(clippy::too_many_arguments)]
pub fn search<NT: NodeType, O: Oracle + ?Sized>(
    ctx: &mut SearchContext<'_, O>,
    board: &Board,
    side_to_move: Disc,
    depth: Depth,
    mut alpha: Score,
    mut beta: Score,
    ply: u32,
    pv: &mut Vec<PvPly>,
) -> Score {
    pv.clear();
    if ctx.check_deadline() {
        return 0.0;
    }
    ctx.n_nodes += 1;

    let track_line = NT::PV_NODE || ply == 0;
    let (alpha_orig, beta_orig) = (alpha, beta);

    let mut tt_move = None;
    if let Some(entry) = ctx.tt.probe(board, side_to_move, depth) {
        // Entries written by a non-PV search carry no line; a PV node re-searches them.
        let line_missing = NT::PV_NODE
            && entry.bound == Bound::Exact
            && entry.pv.is_empty()
            && entry.best_move.is_some();
        if !line_missing
            && let Some(score) = entry.cutoff(alpha, beta)
        {
            if track_line && entry.bound == Bound::Exact {
                if NT::PV_NODE {
                    pv.extend_from_slice(&entry.pv);
                } else if let Some(square) = entry.best_move {
                    pv.push(PvPly {
                        player: side_to_move,
                        square,
                    });
                }
            }
            return score;
        }
        tt_move = entry.best_move;
    }

    if depth == 0 {
        let score = ctx.evaluate(board);
        ctx.tt
            .store(board, side_to_move, depth, score, Bound::Exact, None, Vec::new());
        return score;
    }

    let moves = ctx.oracle.valid_moves(board, side_to_move);
    if moves.is_empty() {
        let opponent = side_to_move.opposite();
        if ctx.oracle.valid_moves(board, opponent).is_empty() {
            let score = ctx.evaluate(board);
            ctx.tt
                .store(board, side_to_move, depth, score, Bound::Exact, None, Vec::new());
            return score;
        }

        let score = search::<NT, O>(ctx, board, opponent, depth - 1, alpha, beta, ply + 1, pv);
        if ctx.is_aborted() {
            return score;
        }
        let bound = Bound::determine_bound(score, alpha_orig, beta_orig);
        let line = if NT::PV_NODE && bound == Bound::Exact {
            pv.clone()
        } else {
            Vec::new()
        };
        ctx.tt
            .store(board, side_to_move, depth, score, bound, None, line);
        return score;
    }

    let maximizing = side_to_move == ctx.root_player;
    let moves = ctx.order_moves(moves, tt_move);
    let mut best_score = if maximizing { -SCORE_INF } else { SCORE_INF };
    let mut best_move = None;
    let mut child_pv = Vec::new();

    for mv in moves {
        if ctx.check_deadline() {
            return best_score;
        }
        let Some(next) = ctx.oracle.simulate_move(board, side_to_move, mv) else {
            warn!(%mv, player = %side_to_move, "oracle rejected a listed move, skipping it");
            continue;
        };
        let next_side = next_player(&next, side_to_move, ctx.flags.fewer_pieces_continue);
        let score = search::<NT, O>(
            ctx,
            &next,
            next_side,
            depth - 1,
            alpha,
            beta,
            ply + 1,
            &mut child_pv,
        );
        if ctx.is_aborted() {
            return best_score;
        }

        let improves = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improves {
            best_score = score;
            best_move = Some(mv);
            if track_line {
                pv.clear();
                pv.push(PvPly {
                    player: side_to_move,
                    square: mv,
                });
                if NT::PV_NODE {
                    pv.extend_from_slice(&child_pv);
                }
            }
        }

        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if alpha >= beta {
            break;
        }
    }

    if best_move.is_none() {
        let score = ctx.evaluate(board);
        ctx.tt
            .store(board, side_to_move, depth, score, Bound::Exact, None, Vec::new());
        return score;
    }

    let bound = Bound::determine_bound(best_score, alpha_orig, beta_orig);
    let line = if NT::PV_NODE && bound == Bound::Exact {
        pv.clone()
    } else {
        Vec::new()
    };
    ctx.tt
        .store(board, side_to_move, depth, best_score, bound, best_move, line);
    best_score
}
