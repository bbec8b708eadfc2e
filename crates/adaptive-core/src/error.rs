//! Error types for stage setup, game play and parsing.
//!
//! Search routines never fail: deadline expiry, passes and oracle
//! disagreements degrade to a best-effort answer. Only configuration and
//! host-facing game bookkeeping report errors.

use thiserror::Error;

use crate::constants::MAX_BOARD_SIZE;
use crate::disc::Disc;
use crate::square::Square;

/// Invalid stage configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("board size {0} is outside the supported range 1..={MAX_BOARD_SIZE}")]
    InvalidBoardSize(usize),
    #[error("{kind} square {square} lies outside a {size}x{size} board")]
    OutOfBounds {
        kind: &'static str,
        square: Square,
        size: usize,
    },
    #[error("square {0} is assigned more than once")]
    Overlap(Square),
    #[error("initial board is {actual}x{actual} but the stage declares {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Illegal action in a [`GameState`](crate::game_state::GameState).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{square} is not a legal move for {player}")]
    IllegalMove { square: Square, player: Disc },
    #[error("{0} cannot pass while legal moves are available")]
    IllegalPass(Disc),
    #[error("the game is already over")]
    GameOver,
}

/// Malformed textual board or square.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
    #[error("invalid board character {0:?}")]
    InvalidCell(char),
    #[error("a board string must describe a square grid of side 1..={MAX_BOARD_SIZE}, got {0} cells")]
    NotSquare(usize),
}
