//! Transposition table for the alpha-beta search.
//!
//! Entries are keyed by the structural board hash, the side to move and the
//! remaining depth. Each entry keeps the board it was computed for, so a hash
//! collision reads as a miss instead of a wrong score.

use std::collections::HashMap;

use crate::board::Board;
use crate::constants::DEFAULT_TT_CAPACITY;
use crate::disc::Disc;
use crate::search::search_result::PvPly;
use crate::square::Square;
use crate::types::{Depth, Score};

/// Bound type for transposition table entries.
///
/// - `Lower`: Score is a lower bound (fail-high occurred)
/// - `Upper`: Score is an upper bound (fail-low)
/// - `Exact`: Score is the exact minimax value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
    Exact,
}

impl Bound {
    /// Determines the bound type of a fail-soft search result.
    ///
    /// # Arguments
    ///
    /// * `best_score` - The value returned by the node
    /// * `alpha` - The lower window bound the node was entered with
    /// * `beta` - The upper window bound the node was entered with
    #[inline]
    pub fn determine_bound(best_score: Score, alpha: Score, beta: Score) -> Bound {
        if best_score <= alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TTKey {
    hash: u64,
    side_to_move: Disc,
    depth: Depth,
}

/// A stored search result.
#[derive(Clone, Debug)]
pub struct TTEntry {
    board: Board,
    pub score: Score,
    pub bound: Bound,
    pub best_move: Option<Square>,
    /// Principal variation below this node; only filled by line-tracking searches.
    pub pv: Vec<PvPly>,
}

impl TTEntry {
    /// Returns the stored score if it decides the node for the window
    /// `(alpha, beta)`.
    ///
    /// # Returns
    ///
    /// `Some(score)` for an exact entry, a lower bound at or above `beta`, or
    /// an upper bound at or below `alpha`; otherwise `None`.
    #[inline]
    pub fn cutoff(&self, alpha: Score, beta: Score) -> Option<Score> {
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

/// Memo of completed alpha-beta nodes.
///
/// Once `capacity` entries are held, new keys are dropped while existing keys
/// are still refreshed.
pub struct TranspositionTable {
    entries: HashMap<TTKey, TTEntry>,
    capacity: usize,
    probes: u64,
    hits: u64,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TT_CAPACITY)
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity,
            probes: 0,
            hits: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.probes = 0;
        self.hits = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `(probes, hits)` since the last clear.
    pub fn stats(&self) -> (u64, u64) {
        (self.probes, self.hits)
    }

    /// Looks up a position.
    ///
    /// # Arguments
    ///
    /// * `board` - The position
    /// * `side_to_move` - The player to move
    /// * `depth` - The remaining search depth
    ///
    /// # Returns
    ///
    /// The entry stored for exactly this board, side and depth, if any.
    pub fn probe(&mut self, board: &Board, side_to_move: Disc, depth: Depth) -> Option<&TTEntry> {
        self.probes += 1;
        let key = TTKey {
            hash: board.hash(),
            side_to_move,
            depth,
        };
        let entry = self.entries.get(&key).filter(|e| e.board == *board)?;
        self.hits += 1;
        Some(entry)
    }

    /// Stores a fully computed node, replacing any previous entry for the key.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        board: &Board,
        side_to_move: Disc,
        depth: Depth,
        score: Score,
        bound: Bound,
        best_move: Option<Square>,
        pv: Vec<PvPly>,
    ) {
        let key = TTKey {
            hash: board.hash(),
            side_to_move,
            depth,
        };
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            return;
        }
        self.entries.insert(
            key,
            TTEntry {
                board: board.clone(),
                score,
                bound,
                best_move,
                pv,
            },
        );
    }
}
