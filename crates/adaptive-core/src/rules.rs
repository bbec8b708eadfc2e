//! Rule variants and the reference oracle implementing them.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{DIRECTIONS, MAX_BOARD_SIZE};
use crate::disc::{Cell, Disc};
use crate::move_list::MoveList;
use crate::oracle::{Evaluation, Oracle};
use crate::square::Square;

const CORNER_SCORE: f64 = 100.0;
const EDGE_SCORE: f64 = 20.0;
const MOBILITY_FACTOR: f64 = 2.0;
const EDGE_FACTOR: f64 = 0.5;

/// Hidden house rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleFlags {
    /// A blocked cell does not stop a flipping line; the line continues past it.
    pub occlusion_allowed: bool,
    /// The player with strictly fewer discs moves next, regardless of alternation.
    pub fewer_pieces_continue: bool,
}

/// Returns the player to move after `mover` produced `board`.
///
/// # Arguments
///
/// * `board` - Position after the move.
/// * `mover` - Player who just moved.
/// * `fewer_pieces_continue` - Whether the fewer-pieces rule is active.
///
/// # Returns
///
/// `mover` again if the rule is active and `mover` has strictly fewer discs,
/// otherwise the opponent.
pub fn next_player(board: &Board, mover: Disc, fewer_pieces_continue: bool) -> Disc {
    let opponent = mover.opposite();
    if fewer_pieces_continue && board.disc_count(mover) < board.disc_count(opponent) {
        return mover;
    }
    opponent
}

type Flips = ArrayVec<Square, { 8 * MAX_BOARD_SIZE }>;

/// Oracle implementing flanking rules with optional occlusion and
/// fewer-pieces-continue variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleOracle {
    flags: RuleFlags,
}

impl RuleOracle {
    pub fn new(flags: RuleFlags) -> Self {
        RuleOracle { flags }
    }

    /// Standard rules: blocked cells stop lines and turns alternate.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    /// Collects the discs flipped by `player` playing at `sq`.
    fn flips(&self, board: &Board, player: Disc, sq: Square, flips: &mut Flips) {
        let size = board.size();
        for (dr, dc) in DIRECTIONS {
            let start = flips.len();
            let mut step = 1;
            let mut anchored = false;
            while let Some(cur) = sq.offset(dr, dc, step, size) {
                match board.get(cur) {
                    Cell::Blocked if self.flags.occlusion_allowed => {}
                    Cell::Blocked | Cell::Empty => break,
                    c if c.holds(player) => {
                        anchored = true;
                        break;
                    }
                    _ => flips.push(cur),
                }
                step += 1;
            }
            if !anchored {
                flips.truncate(start);
            }
        }
    }

    fn is_legal(&self, board: &Board, player: Disc, sq: Square) -> bool {
        if board.get(sq) != Cell::Empty {
            return false;
        }
        let mut flips = Flips::new();
        self.flips(board, player, sq, &mut flips);
        !flips.is_empty()
    }
}

impl Oracle for RuleOracle {
    fn valid_moves(&self, board: &Board, player: Disc) -> MoveList {
        board
            .squares_with(Cell::Empty)
            .filter(|&sq| self.is_legal(board, player, sq))
            .collect()
    }

    fn simulate_move(&self, board: &Board, player: Disc, mv: Square) -> Option<Board> {
        if board.get(mv) != Cell::Empty {
            return None;
        }
        let mut flips = Flips::new();
        self.flips(board, player, mv, &mut flips);
        if flips.is_empty() {
            return None;
        }

        let own = Cell::from(player);
        let mut next = board.clone();
        next.set(mv, own);
        for sq in flips {
            next.set(sq, own);
        }
        Some(next)
    }

    fn evaluate_board(&self, board: &Board, player: Disc) -> Evaluation {
        let size = board.size();
        let opponent = player.opposite();

        let pieces = board.disc_count(player) as f64 - board.disc_count(opponent) as f64;
        let mobility = self.valid_moves(board, player).len() as f64
            - self.valid_moves(board, opponent).len() as f64;

        let mut corners = 0.0;
        let mut edges = 0.0;
        for sq in board.squares_with(Cell::from(player)) {
            if sq.is_corner(size) {
                corners += CORNER_SCORE;
            } else if sq.is_edge(size) {
                edges += EDGE_SCORE;
            }
        }

        Evaluation {
            total: pieces + MOBILITY_FACTOR * mobility + corners + EDGE_FACTOR * edges,
            pieces,
            mobility,
            corners,
            edges,
        }
    }

    fn next_to_move(&self, board: &Board, mover: Disc) -> Option<Disc> {
        Some(next_player(board, mover, self.flags.fewer_pieces_continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_opening_moves() {
        let oracle = RuleOracle::standard();
        let moves = oracle.valid_moves(&Board::standard(), Disc::Black);
        let mut names: Vec<_> = moves.iter().map(|m| m.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["c4", "d3", "e6", "f5"]);
    }

    #[test]
    fn test_simulate_flips() {
        let oracle = RuleOracle::standard();
        let board = Board::standard();
        let next = oracle.simulate_move(&board, Disc::Black, sq("d3")).unwrap();
        assert_eq!(next.get(sq("d3")), Cell::Black);
        assert_eq!(next.get(sq("d4")), Cell::Black);
        assert_eq!(next.disc_count(Disc::Black), 4);
        assert_eq!(next.disc_count(Disc::White), 1);
        // Input untouched.
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_illegal_move() {
        let oracle = RuleOracle::standard();
        assert!(oracle.simulate_move(&Board::standard(), Disc::Black, sq("a1")).is_none());
        assert!(oracle.simulate_move(&Board::standard(), Disc::Black, sq("d4")).is_none());
    }

    #[test]
    fn test_blocked_cell_stops_line() {
        // O at b1, blocked at c1, X at d1: a1 flanks only through the blocked cell.
        let board = Board::from_string("-O#X ---- ---- ----").unwrap();
        let strict = RuleOracle::standard();
        assert!(strict.simulate_move(&board, Disc::Black, sq("a1")).is_none());

        let occluding = RuleOracle::new(RuleFlags {
            occlusion_allowed: true,
            ..RuleFlags::default()
        });
        let next = occluding.simulate_move(&board, Disc::Black, sq("a1")).unwrap();
        assert_eq!(next.get(sq("b1")), Cell::Black);
        assert_eq!(next.get(sq("c1")), Cell::Blocked);
    }

    #[test]
    fn test_next_player() {
        let board = Board::from_string("XOO- ---- ---- ----").unwrap();
        assert_eq!(next_player(&board, Disc::Black, false), Disc::White);
        assert_eq!(next_player(&board, Disc::Black, true), Disc::Black);
        assert_eq!(next_player(&board, Disc::White, true), Disc::Black);

        let tied = Board::standard();
        assert_eq!(next_player(&tied, Disc::Black, true), Disc::White);
    }

    #[test]
    fn test_evaluate_board() {
        let board = Board::from_string(
            "X--- \
             -XO- \
             -OX- \
             ----",
        )
        .unwrap();
        let oracle = RuleOracle::standard();
        let eval = oracle.evaluate_board(&board, Disc::Black);
        assert_eq!(eval.pieces, 1.0);
        assert_eq!(eval.corners, 100.0);
        assert_eq!(eval.edges, 0.0);
        let expected = eval.pieces + 2.0 * eval.mobility + eval.corners + 0.5 * eval.edges;
        assert_eq!(eval.total, expected);

        let white = oracle.evaluate_board(&board, Disc::White);
        assert_eq!(white.pieces, -1.0);
        assert_eq!(white.mobility, -eval.mobility);
    }
}
