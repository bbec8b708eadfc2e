//! Stable disc detection.
//!
//! A disc is stable when no sequence of moves can ever flip it. Along each of
//! the four axes a disc is safe if the segment through it has no empty cell,
//! or if the next cell in one direction is a wall or a disc of the same
//! colour that is already known to be stable. Stable sets grow to a fixed
//! point from the walls inwards.
//!
//! What counts as a wall depends on occlusion: without it a blocked cell ends
//! every line, with it lines pass through blocked cells and only the board
//! edge is a wall.

use crate::board::Board;
use crate::constants::AXES;
use crate::disc::{Cell, Disc};
use crate::oracle::Oracle;
use crate::square::Square;

/// Computes the stable discs of `player`.
///
/// # Arguments
///
/// * `board` - Position to analyse.
/// * `player` - Owner of the discs to classify.
/// * `occlusion_allowed` - Whether flipping lines pass through blocked cells.
///
/// # Returns
///
/// A mask indexed by [`Square::index`]; `true` marks a stable disc of `player`.
pub fn stable_discs(board: &Board, player: Disc, occlusion_allowed: bool) -> Vec<bool> {
    let size = board.size();
    let own: Vec<Square> = board.squares_with(Cell::from(player)).collect();
    let mut stable = vec![false; size * size];

    loop {
        let mut changed = false;
        for &sq in &own {
            let idx = sq.index(size);
            if stable[idx] {
                continue;
            }
            let anchored = AXES
                .iter()
                .all(|&(dr, dc)| axis_is_safe(board, &stable, sq, dr, dc, occlusion_allowed));
            if anchored {
                stable[idx] = true;
                changed = true;
            }
        }
        if !changed {
            return stable;
        }
    }
}

/// Counts the stable discs of `player`.
pub fn count_stable(board: &Board, player: Disc, occlusion_allowed: bool) -> usize {
    stable_discs(board, player, occlusion_allowed)
        .into_iter()
        .filter(|&s| s)
        .count()
}

/// Returns `true` if `player` playing `mv` leaves the placed disc stable.
///
/// Moves the oracle rejects are never stable.
pub fn is_stable_move<O: Oracle + ?Sized>(
    oracle: &O,
    board: &Board,
    player: Disc,
    mv: Square,
    occlusion_allowed: bool,
) -> bool {
    let Some(next) = oracle.simulate_move(board, player, mv) else {
        return false;
    };
    next.get(mv).holds(player) && stable_discs(&next, player, occlusion_allowed)[mv.index(next.size())]
}

/// Next cell a flipping line reaches from `sq`, or `None` at a wall.
fn line_neighbour(board: &Board, sq: Square, dr: i32, dc: i32, occlusion_allowed: bool) -> Option<Square> {
    let size = board.size();
    let mut current = sq;
    loop {
        let next = current.offset(dr, dc, 1, size)?;
        match board.get(next) {
            Cell::Blocked if occlusion_allowed => current = next,
            Cell::Blocked => return None,
            _ => return Some(next),
        }
    }
}

fn axis_is_safe(
    board: &Board,
    stable: &[bool],
    sq: Square,
    dr: i32,
    dc: i32,
    occlusion_allowed: bool,
) -> bool {
    let size = board.size();
    let anchored = |neighbour: Option<Square>| neighbour.is_none_or(|n| stable[n.index(size)]);

    anchored(line_neighbour(board, sq, dr, dc, occlusion_allowed))
        || anchored(line_neighbour(board, sq, -dr, -dc, occlusion_allowed))
        || segment_is_full(board, sq, dr, dc, occlusion_allowed)
}

/// Returns `true` if no cell of the line segment through `sq` is empty.
fn segment_is_full(board: &Board, sq: Square, dr: i32, dc: i32, occlusion_allowed: bool) -> bool {
    [(dr, dc), (-dr, -dc)].into_iter().all(|(r, c)| {
        let mut current = sq;
        while let Some(next) = line_neighbour(board, current, r, c, occlusion_allowed) {
            if board.get(next).is_empty() {
                return false;
            }
            current = next;
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleOracle;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn is_stable(board: &Board, at: &str, player: Disc, occlusion: bool) -> bool {
        stable_discs(board, player, occlusion)[sq(at).index(board.size())]
    }

    #[test]
    fn test_corner_is_stable() {
        let board = Board::new(8).with_cell(sq("a1"), Cell::Black);
        assert!(is_stable(&board, "a1", Disc::Black, false));
        assert_eq!(count_stable(&board, Disc::Black, false), 1);
        assert_eq!(count_stable(&board, Disc::White, false), 0);
    }

    #[test]
    fn test_standard_start_has_no_stable_discs() {
        let board = Board::standard();
        assert_eq!(count_stable(&board, Disc::Black, false), 0);
        assert_eq!(count_stable(&board, Disc::White, false), 0);
    }

    #[test]
    fn test_edge_chain_from_corner() {
        let board = Board::from_string(
            "XXO-\
             ----\
             ----\
             ----",
        )
        .unwrap();
        assert!(is_stable(&board, "a1", Disc::Black, false));
        assert!(is_stable(&board, "b1", Disc::Black, false));
        // c1 is white and touches an empty cell on its row.
        assert!(!is_stable(&board, "c1", Disc::White, false));
    }

    #[test]
    fn test_lone_edge_disc_is_not_stable() {
        let board = Board::new(4).with_cell(sq("b1"), Cell::Black);
        assert!(!is_stable(&board, "b1", Disc::Black, false));
    }

    #[test]
    fn test_blocked_cell_is_wall_without_occlusion() {
        let board = Board::from_string(
            "-#X-\
             ----\
             ----\
             ----",
        )
        .unwrap();
        assert!(is_stable(&board, "c1", Disc::Black, false));
        assert!(!is_stable(&board, "c1", Disc::Black, true));
    }

    #[test]
    fn test_full_board_is_stable() {
        let board = Board::from_string(
            "XOXO\
             OXOX\
             XOXO\
             OXOX",
        )
        .unwrap();
        assert_eq!(count_stable(&board, Disc::Black, false), 8);
        assert_eq!(count_stable(&board, Disc::White, false), 8);
    }

    #[test]
    fn test_is_stable_move() {
        let oracle = RuleOracle::standard();
        let board = Board::from_string(
            "-OX-\
             ----\
             ----\
             ----",
        )
        .unwrap();
        assert!(is_stable_move(&oracle, &board, Disc::Black, sq("a1"), false));
        assert!(!is_stable_move(&oracle, &board, Disc::Black, sq("d1"), false));

        let standard = Board::standard();
        assert!(!is_stable_move(&oracle, &standard, Disc::Black, sq("d3"), false));
    }
}
