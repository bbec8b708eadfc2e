//! Deadlines and the per-game time budget.

use std::time::{Duration, Instant};

/// An absolute point on the monotonic clock after which a search must stop.
///
/// Deadlines are plain `Copy` values handed down to every routine that may
/// run for a while; there is no shared stop flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline `duration` from now.
    pub fn after(duration: Duration) -> Self {
        Deadline(Instant::now() + duration)
    }

    /// A deadline `ms` milliseconds from now.
    pub fn after_ms(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    #[inline]
    pub fn is_reached(self) -> bool {
        Instant::now() >= self.0
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// The earlier of two deadlines.
    pub fn min(self, other: Deadline) -> Deadline {
        Deadline(self.0.min(other.0))
    }

    pub fn instant(self) -> Instant {
        self.0
    }
}

/// Wall-clock budget of one game.
///
/// The budget is consulted once per move to derive that move's deadline and
/// charged once per move with the time actually spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBudget {
    total: Duration,
    used: Duration,
}

impl TimeBudget {
    pub fn new(total_ms: u64) -> Self {
        TimeBudget {
            total: Duration::from_millis(total_ms),
            used: Duration::ZERO,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn used(&self) -> Duration {
        self.used
    }

    /// Budget left for the rest of the game.
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.used)
    }

    /// Computes the allocation of the next move.
    ///
    /// # Arguments
    ///
    /// * `empty_cells` - Empty cells on the board, an upper bound on the
    ///   number of moves still to play.
    /// * `per_move_cap` - Hard cap on a single move.
    ///
    /// # Returns
    ///
    /// `min(per_move_cap, remaining / max(empty_cells, 1))`.
    pub fn allocation(&self, empty_cells: usize, per_move_cap: Duration) -> Duration {
        let share = self.remaining() / empty_cells.max(1) as u32;
        share.min(per_move_cap)
    }

    /// Returns the deadline of the next move, measured from now.
    pub fn allocate(&self, empty_cells: usize, per_move_cap: Duration) -> Deadline {
        Deadline::after(self.allocation(empty_cells, per_move_cap))
    }

    /// Charges the time spent on one move.
    pub fn record(&mut self, elapsed: Duration) {
        self.used += elapsed;
    }

    /// Starts a new game with the full budget.
    pub fn reset(&mut self) {
        self.used = Duration::ZERO;
    }
}
