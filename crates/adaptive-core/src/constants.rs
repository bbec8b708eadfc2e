//! Engine-wide constants.

/// Largest supported board side.
pub const MAX_BOARD_SIZE: usize = 16;

/// Number of cells on the largest supported board.
pub const MAX_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

/// The eight flanking directions as `(row, col)` deltas.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four axes used by the stability analysis, one direction per axis.
pub const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Score bound used as the initial alpha-beta window.
pub const SCORE_INF: f64 = f64::INFINITY;

/// UCT exploration constant.
pub const UCT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default number of transposition table entries.
pub const DEFAULT_TT_CAPACITY: usize = 1 << 19;
