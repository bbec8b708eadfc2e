use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_BOARD_SIZE;
use crate::error::ParseError;

/// A cell coordinate on a board of any supported size. Moves are squares.
///
/// Squares use algebraic notation: files (columns) are labelled `a`..`p` and
/// ranks (rows) `1`..`16`, so `a1` is the top-left cell.
///
/// ```text
///   a b c d ...
/// 1 (0,0) (0,1) (0,2) ...
/// 2 (1,0) (1,1) (1,2) ...
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Creates a square from a row and column index.
    pub const fn new(row: u8, col: u8) -> Self {
        Square { row, col }
    }

    /// Converts the square into a row-major cell index on a board of side `size`.
    #[inline]
    pub fn index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    /// Inverse of [`Square::index`].
    #[inline]
    pub fn from_index(index: usize, size: usize) -> Self {
        Square::new((index / size) as u8, (index % size) as u8)
    }

    /// Returns `true` if the square lies on a board of side `size`.
    #[inline]
    pub fn is_on_board(self, size: usize) -> bool {
        (self.row as usize) < size && (self.col as usize) < size
    }

    /// Steps `steps` times in direction `(dr, dc)`.
    ///
    /// # Arguments
    ///
    /// * `dr` - Row delta of one step.
    /// * `dc` - Column delta of one step.
    /// * `steps` - Number of steps, may be negative to walk backwards.
    /// * `size` - Board side.
    ///
    /// # Returns
    ///
    /// The reached square, or `None` if it falls off the board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32, size: usize) -> Option<Square> {
        let r = self.row as i32 + dr * steps;
        let c = self.col as i32 + dc * steps;
        if r < 0 || c < 0 || r >= size as i32 || c >= size as i32 {
            return None;
        }
        Some(Square::new(r as u8, c as u8))
    }

    /// Returns `true` if the square is one of the four board corners.
    pub fn is_corner(self, size: usize) -> bool {
        let last = size.saturating_sub(1) as u8;
        (self.row == 0 || self.row == last) && (self.col == 0 || self.col == last)
    }

    /// Returns `true` if the square lies on the outer ring of the board.
    pub fn is_edge(self, size: usize) -> bool {
        let last = size.saturating_sub(1) as u8;
        self.row == 0 || self.row == last || self.col == 0 || self.col == last
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match char::from_u32('a' as u32 + self.col as u32).filter(char::is_ascii_lowercase) {
            Some(file) => write!(f, "{}{}", file, self.row as u32 + 1),
            None => write!(f, "({},{})", self.row, self.col),
        }
    }
}

impl FromStr for Square {
    type Err = ParseError;

    /// Parses a string into a `Square`.
    ///
    /// The string must be in algebraic notation (e.g. "a1", "p16"). Both
    /// uppercase and lowercase file letters are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseError::InvalidSquare(s.to_string());

        let mut chars = s.chars();
        let file = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
        let last_file = (b'a' + (MAX_BOARD_SIZE as u8 - 1)) as char;
        if !('a'..=last_file).contains(&file) {
            return Err(invalid());
        }

        let rank: usize = chars.as_str().parse().map_err(|_| invalid())?;
        if !(1..=MAX_BOARD_SIZE).contains(&rank) {
            return Err(invalid());
        }

        Ok(Square::new((rank - 1) as u8, file as u8 - b'a'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Square::new(0, 0).to_string(), "a1");
        assert_eq!(Square::new(2, 3).to_string(), "d3");
        assert_eq!(Square::new(15, 15).to_string(), "p16");
        assert_eq!(Square::new(0, 200).to_string(), "(0,200)");
        assert_eq!(Square::new(255, 255).to_string(), "(255,255)");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("d3".parse::<Square>(), Ok(Square::new(2, 3)));
        assert_eq!("H8".parse::<Square>(), Ok(Square::new(7, 7)));
        assert_eq!("p16".parse::<Square>(), Ok(Square::new(15, 15)));
        assert!("q1".parse::<Square>().is_err());
        assert!("a0".parse::<Square>().is_err());
        assert!("a17".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn test_offset() {
        let sq = Square::new(1, 1);
        assert_eq!(sq.offset(-1, -1, 1, 8), Some(Square::new(0, 0)));
        assert_eq!(sq.offset(-1, -1, 2, 8), None);
        assert_eq!(sq.offset(0, 1, 6, 8), Some(Square::new(1, 7)));
        assert_eq!(sq.offset(0, 1, 7, 8), None);
        assert_eq!(sq.offset(1, 0, -1, 8), Some(Square::new(0, 1)));
    }

    #[test]
    fn test_index_round_trip() {
        for size in [4, 6, 8, 16] {
            for index in 0..size * size {
                assert_eq!(Square::from_index(index, size).index(size), index);
            }
        }
    }

    #[test]
    fn test_corner_and_edge() {
        assert!(Square::new(0, 5).is_corner(6));
        assert!(Square::new(5, 5).is_corner(6));
        assert!(!Square::new(0, 3).is_corner(6));
        assert!(Square::new(0, 3).is_edge(6));
        assert!(!Square::new(2, 3).is_edge(6));
    }
}
