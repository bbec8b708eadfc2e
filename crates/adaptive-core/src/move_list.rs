//! Fixed-capacity move lists.

use arrayvec::ArrayVec;

use crate::constants::MAX_CELLS;
use crate::square::Square;

/// Legal moves of one position. A board never has more moves than cells, so
/// the list lives on the stack.
pub type MoveList = ArrayVec<Square, MAX_CELLS>;
