//! Game tree search: alpha-beta with iterative deepening, and MCTS.

pub mod alphabeta;
pub mod mcts;
pub mod minimax;
pub mod node_type;
pub mod search_context;
pub mod search_result;
pub mod time_control;

use tracing::debug;

use crate::board::Board;
use crate::constants::SCORE_INF;
use crate::disc::Disc;
use crate::oracle::Oracle;
use crate::rules::RuleFlags;
use crate::search::node_type::NodeType;
use crate::search::search_context::{SearchContext, order_moves};
use crate::search::search_result::SearchResult;
use crate::search::time_control::Deadline;
use crate::transposition_table::TranspositionTable;
use crate::types::Depth;
use crate::weights::WeightMatrix;

/// Alpha-beta search engine bound to one oracle, weight matrix and rule set.
pub struct Search<'a, O: Oracle + ?Sized> {
    oracle: &'a O,
    weights: &'a WeightMatrix,
    flags: RuleFlags,
}

impl<'a, O: Oracle + ?Sized> Search<'a, O> {
    pub fn new(oracle: &'a O, weights: &'a WeightMatrix, flags: RuleFlags) -> Self {
        Search {
            oracle,
            weights,
            flags,
        }
    }

    /// Searches `board` to a fixed depth with a full window.
    ///
    /// # Arguments
    ///
    /// * `tt` - Transposition table; entries from earlier calls with the same
    ///   root player are reused.
    /// * `board` - Root position.
    /// * `player` - Player to move, maximised by the search.
    /// * `depth` - Depth in plies.
    /// * `deadline` - Abort time.
    ///
    /// # Returns
    ///
    /// The completed result, or `None` if the deadline interrupted the search.
    pub fn search_depth<NT: NodeType>(
        &self,
        tt: &mut TranspositionTable,
        board: &Board,
        player: Disc,
        depth: Depth,
        deadline: Deadline,
    ) -> Option<SearchResult> {
        let mut ctx = SearchContext::new(self.oracle, self.weights, self.flags, player, deadline, tt);
        let mut pv = Vec::new();
        let score = alphabeta::search::<NT, O>(
            &mut ctx,
            board,
            player,
            depth,
            -SCORE_INF,
            SCORE_INF,
            0,
            &mut pv,
        );
        if ctx.is_aborted() {
            return None;
        }

        let best_move = pv
            .first()
            .filter(|ply| ply.player == player)
            .map(|ply| ply.square);
        Some(SearchResult {
            score,
            best_move,
            n_nodes: ctx.n_nodes,
            pv_line: pv,
            depth,
        })
    }

    /// Deepens one ply at a time from `start_depth` until the deadline passes
    /// or `max_depth` is reached.
    ///
    /// The depth is also bounded by the number of empty cells. An interrupted
    /// iteration is discarded; the deepest completed one is returned. If no
    /// iteration completes, the best move by cell weight is returned with
    /// depth zero.
    pub fn iterative_deepening<NT: NodeType>(
        &self,
        tt: &mut TranspositionTable,
        board: &Board,
        player: Disc,
        start_depth: Depth,
        max_depth: Depth,
        deadline: Deadline,
    ) -> SearchResult {
        let ordered = order_moves(self.weights, self.oracle.valid_moves(board, player), None);
        let mut result = SearchResult::new_fallback(ordered.first().copied());

        let limit = max_depth.min(board.empty_count().max(1) as Depth).max(1);
        let start = start_depth.clamp(1, limit);
        let mut n_nodes = 0;

        for depth in start..=limit {
            let Some(mut completed) = self.search_depth::<NT>(tt, board, player, depth, deadline)
            else {
                debug!(depth, "iteration interrupted by the deadline");
                break;
            };
            n_nodes += completed.n_nodes;
            completed.n_nodes = n_nodes;
            if completed.best_move.is_none() {
                completed.best_move = result.best_move;
            }
            debug!(
                depth,
                score = completed.score,
                nodes = n_nodes,
                best = ?completed.best_move,
                "iteration complete"
            );
            result = completed;

            if deadline.is_reached() {
                break;
            }
        }

        result
    }
}
