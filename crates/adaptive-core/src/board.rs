use std::fmt;

use crate::constants::MAX_BOARD_SIZE;
use crate::disc::{Cell, Disc};
use crate::error::ParseError;
use crate::square::Square;

/// A square grid of cells.
///
/// Boards are snapshots: the engine never edits a board it was handed, it
/// asks the oracle for a new one. Equality and hashing are structural, so two
/// boards with the same cells compare equal regardless of how they were
/// produced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Box<[Cell]>,
}

impl Board {
    /// Creates an empty board of side `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `1..=MAX_BOARD_SIZE`. Stage validation
    /// rejects such sizes before a board is ever built.
    pub fn new(size: usize) -> Board {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&size),
            "board size {size} is outside 1..={MAX_BOARD_SIZE}"
        );
        Board {
            size,
            cells: vec![Cell::Empty; size * size].into_boxed_slice(),
        }
    }

    /// Creates the standard 8x8 starting position.
    pub fn standard() -> Board {
        let mut board = Board::new(8);
        board.set(Square::new(3, 3), Cell::White);
        board.set(Square::new(4, 4), Cell::White);
        board.set(Square::new(3, 4), Cell::Black);
        board.set(Square::new(4, 3), Cell::Black);
        board
    }

    /// Creates a board from a string representation.
    ///
    /// Whitespace is ignored; every other character is one cell in row-major
    /// order (`-` or `.` empty, `X` black, `O` white, `#` blocked). The number
    /// of cells must be a perfect square.
    ///
    /// # Arguments
    ///
    /// * `board_string` - The textual board.
    ///
    /// # Returns
    ///
    /// The parsed board, or a [`ParseError`] describing the first problem.
    pub fn from_string(board_string: &str) -> Result<Board, ParseError> {
        let cells = board_string
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Cell::from_char(c).ok_or(ParseError::InvalidCell(c)))
            .collect::<Result<Vec<_>, _>>()?;

        let size = (cells.len() as f64).sqrt().round() as usize;
        if size == 0 || size > MAX_BOARD_SIZE || size * size != cells.len() {
            return Err(ParseError::NotSquare(cells.len()));
        }

        Ok(Board {
            size,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Returns the board side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `sq`.
    ///
    /// Squares off the board read as [`Cell::Blocked`], which is how every
    /// rule treats the outside of the grid.
    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        if sq.is_on_board(self.size) {
            self.cells[sq.index(self.size)]
        } else {
            Cell::Blocked
        }
    }

    /// Sets the cell at `sq`. Squares off the board are ignored.
    #[inline]
    pub fn set(&mut self, sq: Square, cell: Cell) {
        if sq.is_on_board(self.size) {
            self.cells[sq.index(self.size)] = cell;
        }
    }

    /// Returns a copy of the board with the cell at `sq` replaced.
    pub fn with_cell(mut self, sq: Square, cell: Cell) -> Board {
        self.set(sq, cell);
        self
    }

    /// Iterates over every square of the board in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + use<> {
        let size = self.size;
        (0..size * size).map(move |i| Square::from_index(i, size))
    }

    /// Iterates over the squares holding `cell`.
    pub fn squares_with(&self, cell: Cell) -> impl Iterator<Item = Square> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == cell)
            .map(move |(i, _)| Square::from_index(i, size))
    }

    /// Counts the cells in the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Counts the discs of one player.
    #[inline]
    pub fn disc_count(&self, disc: Disc) -> usize {
        self.count(Cell::from(disc))
    }

    /// Counts the empty cells.
    #[inline]
    pub fn empty_count(&self) -> usize {
        self.count(Cell::Empty)
    }

    /// Computes a structural hash of the position.
    ///
    /// # Returns
    /// A 64-bit hash over the packed cell bytes. The input length is mixed into
    /// the hash, so boards of different sides never collide structurally.
    #[inline]
    pub fn hash(&self) -> u64 {
        use rapidhash::v3;
        // Cell is repr(u8).
        let bytes: &[u8] =
            unsafe { std::slice::from_raw_parts(self.cells.as_ptr() as *const u8, self.cells.len()) };
        v3::rapidhash_v3_nano_inline::<true, false>(bytes, &v3::DEFAULT_RAPID_SECRETS)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board({}x{})", self.size, self.size)?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board.size(), 8);
        assert_eq!(board.disc_count(Disc::Black), 2);
        assert_eq!(board.disc_count(Disc::White), 2);
        assert_eq!(board.empty_count(), 60);
        assert_eq!(board.get("d5".parse().unwrap()), Cell::Black);
        assert_eq!(board.get("e4".parse().unwrap()), Cell::Black);
        assert_eq!(board.get("d4".parse().unwrap()), Cell::White);
        assert_eq!(board.get("e5".parse().unwrap()), Cell::White);
    }

    #[test]
    fn test_from_string() {
        let board_string = "--------\
                            --------\
                            --------\
                            ---OX---\
                            ---XO---\
                            --------\
                            --------\
                            --------";
        let board = Board::from_string(board_string).unwrap();
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_from_string_with_blocked() {
        let board = Board::from_string(
            "#-- \
             -XO \
             --#",
        )
        .unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.get(Square::new(0, 0)), Cell::Blocked);
        assert_eq!(board.get(Square::new(2, 2)), Cell::Blocked);
        assert_eq!(board.count(Cell::Blocked), 2);
    }

    #[test]
    fn test_from_string_errors() {
        assert_eq!(Board::from_string("--X"), Err(ParseError::NotSquare(3)));
        assert_eq!(Board::from_string("-?--"), Err(ParseError::InvalidCell('?')));
        assert_eq!(Board::from_string(""), Err(ParseError::NotSquare(0)));
    }

    #[test]
    fn test_off_board_reads_blocked() {
        let board = Board::new(4);
        assert_eq!(board.get(Square::new(4, 0)), Cell::Blocked);
    }

    #[test]
    fn test_display_round_trip() {
        let board = Board::standard().with_cell(Square::new(0, 0), Cell::Blocked);
        let parsed = Board::from_string(&board.to_string()).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_hash_is_structural() {
        let a = Board::standard();
        let b = Board::from_string(&a.to_string()).unwrap();
        assert_eq!(a.hash(), b.hash());

        let c = a.clone().with_cell(Square::new(0, 0), Cell::Blocked);
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_hash_differs_across_sizes() {
        assert_ne!(Board::new(4).hash(), Board::new(2).hash());
    }

    #[test]
    fn test_squares_with() {
        let board = Board::standard();
        let black: Vec<_> = board.squares_with(Cell::Black).collect();
        assert_eq!(black, vec![Square::new(3, 4), Square::new(4, 3)]);
    }
}
