//! Positional weight matrices.
//!
//! A [`WeightMatrix`] assigns every cell a value used additively in leaf
//! evaluation and for move ordering. It is built in two tiers: a structural
//! matrix derived from the board geometry, then an adaptive correction fitted
//! by linear regression on random rollouts scored by the oracle.

use rand::Rng;
use tracing::debug;

use crate::board::Board;
use crate::config::EngineConfig;
use crate::constants::DIRECTIONS;
use crate::disc::{Cell, Disc};
use crate::oracle::Oracle;
use crate::rollout::random_playout;
use crate::rules::RuleFlags;
use crate::search::time_control::Deadline;
use crate::square::Square;

/// Canonical 8x8 positional template.
#[rustfmt::skip]
const TEMPLATE: [[f64; 8]; 8] = [
    [100.0, -20.0, 10.0,  5.0,  5.0, 10.0, -20.0, 100.0],
    [-20.0, -50.0, -2.0, -2.0, -2.0, -2.0, -50.0, -20.0],
    [ 10.0,  -2.0, -1.0, -1.0, -1.0, -1.0,  -2.0,  10.0],
    [  5.0,  -2.0, -1.0, -1.0, -1.0, -1.0,  -2.0,   5.0],
    [  5.0,  -2.0, -1.0, -1.0, -1.0, -1.0,  -2.0,   5.0],
    [ 10.0,  -2.0, -1.0, -1.0, -1.0, -1.0,  -2.0,  10.0],
    [-20.0, -50.0, -2.0, -2.0, -2.0, -2.0, -50.0, -20.0],
    [100.0, -20.0, 10.0,  5.0,  5.0, 10.0, -20.0, 100.0],
];

const CORNER_WEIGHT: f64 = 100.0;
const EDGE_WEIGHT: f64 = 10.0;
/// Substitute for a playable cell whose weight would otherwise be zero.
const MIN_MAGNITUDE: f64 = 0.5;

const N_FEATURES: usize = 3;

type Features = [f64; N_FEATURES];

/// Per-cell weights of one board geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    size: usize,
    values: Box<[f64]>,
}

impl WeightMatrix {
    /// Creates a matrix from row-major values.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != size * size`.
    pub fn from_values(size: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), size * size, "weight matrix shape mismatch");
        WeightMatrix {
            size,
            values: values.into_boxed_slice(),
        }
    }

    /// A matrix of zeros, which turns the static term off.
    pub fn zeros(size: usize) -> Self {
        Self::from_values(size, vec![0.0; size * size])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the weight of `sq`, or zero off the board.
    #[inline]
    pub fn get(&self, sq: Square) -> f64 {
        if sq.is_on_board(self.size) {
            self.values[sq.index(self.size)]
        } else {
            0.0
        }
    }

    /// Sum of `player`'s weights minus the sum of the opponent's.
    pub fn static_eval(&self, board: &Board, player: Disc) -> f64 {
        let own = Cell::from(player);
        let opp = Cell::from(player.opposite());
        board
            .cells()
            .iter()
            .zip(self.values.iter())
            .map(|(&cell, &w)| {
                if cell == own {
                    w
                } else if cell == opp {
                    -w
                } else {
                    0.0
                }
            })
            .sum()
    }

    /// Builds the structural matrix for `board`.
    ///
    /// The canonical template is remapped to the board size by nearest
    /// neighbour. Blocked cells weigh zero. When blocked cells act as
    /// boundaries (occlusion off), a playable cell bounded on both a
    /// horizontal and a vertical side is raised to the corner weight, and a
    /// cell bounded on one axis by a blocked neighbour to at least the edge
    /// weight.
    pub fn structural(board: &Board, flags: RuleFlags) -> Self {
        let size = board.size();
        let remap = |i: usize| {
            if size <= 1 {
                0
            } else {
                ((i * 7) as f64 / (size - 1) as f64).round() as usize
            }
        };

        let values = board
            .squares()
            .map(|sq| {
                if board.get(sq).is_blocked() {
                    return 0.0;
                }
                let mut w = TEMPLATE[remap(sq.row as usize)][remap(sq.col as usize)];

                let is_boundary = |dr: i32, dc: i32| match sq.offset(dr, dc, 1, size) {
                    None => true,
                    Some(n) => board.get(n).is_blocked() && !flags.occlusion_allowed,
                };
                let is_blocked_by = |dr: i32, dc: i32| {
                    sq.offset(dr, dc, 1, size)
                        .is_some_and(|n| board.get(n).is_blocked() && !flags.occlusion_allowed)
                };

                let horizontal = is_boundary(0, -1) || is_boundary(0, 1);
                let vertical = is_boundary(-1, 0) || is_boundary(1, 0);
                let near_blocked = is_blocked_by(0, -1)
                    || is_blocked_by(0, 1)
                    || is_blocked_by(-1, 0)
                    || is_blocked_by(1, 0);

                if horizontal && vertical {
                    w = w.max(CORNER_WEIGHT);
                } else if (horizontal || vertical) && near_blocked {
                    w = w.max(EDGE_WEIGHT);
                }
                nonzero(w)
            })
            .collect();

        Self::from_values(size, values)
    }
}

fn nonzero(w: f64) -> f64 {
    if w.abs() < MIN_MAGNITUDE {
        if w < 0.0 { -MIN_MAGNITUDE } else { MIN_MAGNITUDE }
    } else {
        w
    }
}

/// Feature vector of one cell: `[is_corner, is_edge, blocked_neighbours]`.
fn cell_features(board: &Board, sq: Square) -> Features {
    let size = board.size();
    let blocked_neighbours = DIRECTIONS
        .iter()
        .filter(|&&(dr, dc)| {
            sq.offset(dr, dc, 1, size)
                .is_some_and(|n| board.get(n).is_blocked())
        })
        .count();
    [
        if sq.is_corner(size) { 1.0 } else { 0.0 },
        if sq.is_edge(size) { 1.0 } else { 0.0 },
        blocked_neighbours as f64,
    ]
}

/// Learns a weight matrix for the stage whose initial position is `board`.
///
/// # Arguments
///
/// * `board` - Initial board of the stage.
/// * `oracle` - Scores rollout end positions.
/// * `flags` - Inferred rule variants; decide turn order and whether blocked
///   cells act as boundaries.
/// * `deadline` - Sampling stops once it is reached.
/// * `config` - Rollout count and length, regression iterations and rate.
/// * `rng` - Source of rollout randomness.
///
/// # Returns
///
/// The structural matrix plus the fitted per-cell contribution, or the bare
/// structural matrix when no sample was gathered in time.
pub fn learn<O: Oracle + ?Sized, R: Rng + ?Sized>(
    board: &Board,
    oracle: &O,
    flags: RuleFlags,
    deadline: Deadline,
    config: &EngineConfig,
    rng: &mut R,
) -> WeightMatrix {
    let structural = WeightMatrix::structural(board, flags);
    let features: Vec<Features> = board.squares().map(|sq| cell_features(board, sq)).collect();

    let mut xs: Vec<Features> = Vec::with_capacity(config.weight_rollouts);
    let mut ys: Vec<f64> = Vec::with_capacity(config.weight_rollouts);
    for _ in 0..config.weight_rollouts {
        if deadline.is_reached() {
            break;
        }
        let end = random_playout(
            oracle,
            board,
            Disc::Black,
            flags,
            config.weight_rollout_plies,
            deadline,
            &mut *rng,
        );

        let mut x = [0.0; N_FEATURES];
        for (cell, f) in end.cells().iter().zip(features.iter()) {
            let sign = match cell {
                Cell::Black => 1.0,
                Cell::White => -1.0,
                Cell::Empty | Cell::Blocked => continue,
            };
            for j in 0..N_FEATURES {
                x[j] += sign * f[j];
            }
        }
        xs.push(x);
        ys.push(oracle.evaluate_board(&end, Disc::Black).total);
    }

    if xs.is_empty() {
        debug!("no rollout finished before the deadline, using structural weights");
        return structural;
    }

    let coefficients = fit_linear(
        &xs,
        &ys,
        config.regression_iterations,
        config.regression_learning_rate,
    );
    debug!(samples = xs.len(), ?coefficients, "fitted positional features");

    let values = structural
        .values()
        .iter()
        .zip(features.iter())
        .zip(board.cells())
        .map(|((&w, f), cell)| {
            if cell.is_blocked() {
                return 0.0;
            }
            let contribution: f64 = coefficients.iter().zip(f).map(|(c, v)| c * v).sum();
            nonzero(w + contribution)
        })
        .collect();

    WeightMatrix::from_values(board.size(), values)
}

/// Fits `y ≈ w · x` by batch gradient descent.
///
/// Each feature column and the targets are scaled by their largest magnitude
/// before fitting; the returned coefficients are in the original units.
fn fit_linear(xs: &[Features], ys: &[f64], iterations: usize, learning_rate: f64) -> Features {
    let mut x_scale = [1.0; N_FEATURES];
    for (j, scale) in x_scale.iter_mut().enumerate() {
        *scale = max_magnitude(xs.iter().map(|x| x[j]));
    }
    let y_scale = max_magnitude(ys.iter().copied());

    let m = xs.len() as f64;
    let mut w = [0.0; N_FEATURES];
    for _ in 0..iterations {
        let mut grad = [0.0; N_FEATURES];
        for (x, &y) in xs.iter().zip(ys) {
            let pred: f64 = (0..N_FEATURES).map(|j| w[j] * x[j] / x_scale[j]).sum();
            let err = pred - y / y_scale;
            for j in 0..N_FEATURES {
                grad[j] += err * x[j] / x_scale[j];
            }
        }
        for j in 0..N_FEATURES {
            w[j] -= learning_rate * grad[j] / m;
        }
    }

    let mut coefficients = [0.0; N_FEATURES];
    for j in 0..N_FEATURES {
        coefficients[j] = w[j] * y_scale / x_scale[j];
    }
    coefficients
}

/// Largest absolute value, or one when every value is zero.
fn max_magnitude(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, |m, v| m.max(v.abs()));
    if max > 0.0 { max } else { 1.0 }
}
