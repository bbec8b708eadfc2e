//! Per-game clock for both sides.
//!
//! Each side owns a wall-clock budget for the whole game. A side may run past
//! it by at most one move allocation before it is reported as overrunning.

use std::time::Instant;

use adaptive_core::Disc;

/// Tracks the time both players spend during one game.
#[derive(Debug)]
pub struct TimeTracker {
    /// Whole-game budget of each side in milliseconds
    budget_ms: u64,
    /// Allowance past the budget, one move's allocation
    grace_ms: u64,
    /// Milliseconds spent by Black and White
    used_ms: [u64; 2],
    /// Start time of the current move
    move_start: Option<Instant>,
}

impl TimeTracker {
    /// Creates a tracker with both clocks at zero.
    ///
    /// # Arguments
    ///
    /// * `budget_ms` - Whole-game budget of each side
    /// * `grace_ms` - How far a side may exceed the budget
    pub fn new(budget_ms: u64, grace_ms: u64) -> Self {
        Self {
            budget_ms,
            grace_ms,
            used_ms: [0; 2],
            move_start: None,
        }
    }

    /// Starts the clock for a move.
    pub fn start_move(&mut self) {
        self.move_start = Some(Instant::now());
    }

    /// Stops the clock and charges the elapsed time to `player`.
    ///
    /// # Returns
    ///
    /// `true` while the player stays within budget plus grace.
    pub fn end_move(&mut self, player: Disc) -> bool {
        let elapsed_ms = self
            .move_start
            .take()
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.charge(player, elapsed_ms)
    }

    fn charge(&mut self, player: Disc, elapsed_ms: u64) -> bool {
        let used = &mut self.used_ms[slot(player)];
        *used = used.saturating_add(elapsed_ms);
        *used <= self.budget_ms.saturating_add(self.grace_ms)
    }

    /// Milliseconds spent so far by `player`.
    pub fn used_ms(&self, player: Disc) -> u64 {
        self.used_ms[slot(player)]
    }

    /// Clears both clocks for a new game.
    pub fn reset(&mut self) {
        self.used_ms = [0; 2];
        self.move_start = None;
    }
}

fn slot(player: Disc) -> usize {
    match player {
        Disc::Black => 0,
        Disc::White => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charges_each_side_separately() {
        let mut tracker = TimeTracker::new(1_000, 100);
        assert!(tracker.charge(Disc::Black, 400));
        assert!(tracker.charge(Disc::White, 50));
        assert!(tracker.charge(Disc::Black, 300));
        assert_eq!(tracker.used_ms(Disc::Black), 700);
        assert_eq!(tracker.used_ms(Disc::White), 50);
    }

    #[test]
    fn test_grace_then_overrun() {
        let mut tracker = TimeTracker::new(1_000, 100);
        assert!(tracker.charge(Disc::White, 1_050));
        assert!(tracker.charge(Disc::White, 50));
        assert!(!tracker.charge(Disc::White, 1));
    }

    #[test]
    fn test_end_move_without_start_charges_nothing() {
        let mut tracker = TimeTracker::new(10, 0);
        assert!(tracker.end_move(Disc::Black));
        assert_eq!(tracker.used_ms(Disc::Black), 0);

        tracker.start_move();
        tracker.end_move(Disc::Black);
        assert!(tracker.move_start.is_none());
    }

    #[test]
    fn test_reset() {
        let mut tracker = TimeTracker::new(100, 0);
        tracker.charge(Disc::Black, 80);
        tracker.start_move();
        tracker.reset();
        assert_eq!(tracker.used_ms(Disc::Black), 0);
        assert!(tracker.move_start.is_none());
    }
}
