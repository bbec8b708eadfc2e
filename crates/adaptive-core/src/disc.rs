use std::fmt;

/// A player, identified by the colour of the discs they place.
///
/// Black (player 1) always moves first from a stage's initial position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disc {
    Black,
    White,
}

impl Disc {
    /// Converts the disc to its corresponding character representation.
    ///
    /// # Returns
    ///
    /// * `'X'` for `Disc::Black`
    /// * `'O'` for `Disc::White`
    pub fn to_char(self) -> char {
        match self {
            Disc::Black => 'X',
            Disc::White => 'O',
        }
    }

    /// Returns the opposite disc.
    ///
    /// # Returns
    ///
    /// * `Disc::White` for `Disc::Black`
    /// * `Disc::Black` for `Disc::White`
    pub fn opposite(self) -> Disc {
        match self {
            Disc::Black => Disc::White,
            Disc::White => Disc::Black,
        }
    }

    /// Returns the player number used by hosts: 1 for Black, 2 for White.
    pub fn player_number(self) -> u8 {
        match self {
            Disc::Black => 1,
            Disc::White => 2,
        }
    }
}

impl fmt::Display for Disc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disc::Black => write!(f, "black"),
            Disc::White => write!(f, "white"),
        }
    }
}

/// State of a single board cell.
///
/// The discriminants match the integer encoding hosts use for boards:
/// `0` empty, `1` black, `2` white, `3` blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Black = 1,
    White = 2,
    Blocked = 3,
}

impl Cell {
    /// Converts the cell to its corresponding character representation.
    ///
    /// # Returns
    ///
    /// * `'-'` for `Cell::Empty`
    /// * `'X'` for `Cell::Black`
    /// * `'O'` for `Cell::White`
    /// * `'#'` for `Cell::Blocked`
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Black => 'X',
            Cell::White => 'O',
            Cell::Blocked => '#',
        }
    }

    /// Parses a cell from its character representation.
    ///
    /// `'.'` is accepted as an alternative spelling of an empty cell.
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Black),
            'O' | 'o' => Some(Cell::White),
            '#' => Some(Cell::Blocked),
            _ => None,
        }
    }

    /// Returns the disc occupying the cell, if any.
    pub fn disc(self) -> Option<Disc> {
        match self {
            Cell::Black => Some(Disc::Black),
            Cell::White => Some(Disc::White),
            Cell::Empty | Cell::Blocked => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_blocked(self) -> bool {
        self == Cell::Blocked
    }

    /// Returns `true` if the cell holds a disc of the given colour.
    #[inline]
    pub fn holds(self, disc: Disc) -> bool {
        self == Cell::from(disc)
    }
}

impl From<Disc> for Cell {
    fn from(disc: Disc) -> Self {
        match disc {
            Disc::Black => Cell::Black,
            Disc::White => Cell::White,
        }
    }
}
