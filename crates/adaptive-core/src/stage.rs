//! Stage descriptions: board size and initial placements.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::MAX_BOARD_SIZE;
use crate::disc::Cell;
use crate::error::StageError;
use crate::square::Square;

/// Static description of a stage's starting position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub name: String,
    pub board_size: usize,
    #[serde(default)]
    pub initial_blocked: Vec<Square>,
    #[serde(default)]
    pub initial_black: Vec<Square>,
    #[serde(default)]
    pub initial_white: Vec<Square>,
}

impl StageConfig {
    /// The standard 8x8 opening without blocked cells.
    pub fn standard() -> StageConfig {
        StageConfig {
            name: "standard8".to_string(),
            board_size: 8,
            initial_blocked: Vec::new(),
            initial_black: vec![Square::new(3, 4), Square::new(4, 3)],
            initial_white: vec![Square::new(3, 3), Square::new(4, 4)],
        }
    }

    /// A 6x6 board with the centre opening.
    pub fn small() -> StageConfig {
        StageConfig {
            name: "small6".to_string(),
            board_size: 6,
            initial_blocked: Vec::new(),
            initial_black: vec![Square::new(2, 3), Square::new(3, 2)],
            initial_white: vec![Square::new(2, 2), Square::new(3, 3)],
        }
    }

    /// An 8x8 board whose four C-squares next to the corners are blocked.
    pub fn c_squares() -> StageConfig {
        StageConfig {
            name: "csquares8".to_string(),
            initial_blocked: vec![
                Square::new(0, 1),
                Square::new(1, 0),
                Square::new(0, 6),
                Square::new(1, 7),
                Square::new(6, 0),
                Square::new(7, 1),
                Square::new(6, 7),
                Square::new(7, 6),
            ],
            ..StageConfig::standard()
        }
    }

    /// Looks up a built-in stage by name.
    pub fn preset(name: &str) -> Option<StageConfig> {
        match name {
            "standard8" => Some(StageConfig::standard()),
            "small6" => Some(StageConfig::small()),
            "csquares8" => Some(StageConfig::c_squares()),
            _ => None,
        }
    }

    /// Checks the board size, the coordinate ranges and that no square is
    /// assigned twice.
    pub fn validate(&self) -> Result<(), StageError> {
        let size = self.board_size;
        if !(1..=MAX_BOARD_SIZE).contains(&size) {
            return Err(StageError::InvalidBoardSize(size));
        }

        let mut seen = vec![false; size * size];
        for (kind, squares) in self.placements() {
            for &square in squares {
                if !square.is_on_board(size) {
                    return Err(StageError::OutOfBounds { kind, square, size });
                }
                let index = square.index(size);
                if seen[index] {
                    return Err(StageError::Overlap(square));
                }
                seen[index] = true;
            }
        }
        Ok(())
    }

    /// Builds the initial board after validating the stage.
    pub fn initial_board(&self) -> Result<Board, StageError> {
        self.validate()?;
        let mut board = Board::new(self.board_size);
        for &sq in &self.initial_blocked {
            board.set(sq, Cell::Blocked);
        }
        for &sq in &self.initial_black {
            board.set(sq, Cell::Black);
        }
        for &sq in &self.initial_white {
            board.set(sq, Cell::White);
        }
        Ok(board)
    }

    fn placements(&self) -> [(&'static str, &[Square]); 3] {
        [
            ("blocked", &self.initial_blocked),
            ("black", &self.initial_black),
            ("white", &self.initial_white),
        ]
    }
}
