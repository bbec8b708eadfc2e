//! Search result types.

use crate::disc::Disc;
use crate::square::Square;
use crate::types::{Depth, Score};

/// One ply of a principal variation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PvPly {
    pub player: Disc,
    pub square: Square,
}

/// Result of a search operation.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Score from the root player's point of view.
    pub score: Score,
    pub best_move: Option<Square>,
    pub n_nodes: u64,
    /// Best line from the root. Holds only the root move unless the search
    /// tracked the full variation.
    pub pv_line: Vec<PvPly>,
    /// Depth of the deepest completed iteration; zero if none completed.
    pub depth: Depth,
}

impl SearchResult {
    /// Creates a result for a move chosen without search.
    pub fn new_fallback(mv: Option<Square>) -> Self {
        Self {
            score: 0.0,
            best_move: mv,
            n_nodes: 0,
            pv_line: vec![],
            depth: 0,
        }
    }
}
