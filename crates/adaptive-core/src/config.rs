//! Engine tuning knobs.
//!
//! Every field has a default, so a partial TOML table (or none at all)
//! deserializes into a complete configuration.

use serde::{Deserialize, Serialize};

use crate::types::Depth;

/// Tuning parameters for analysis and move selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget for one whole game, in milliseconds.
    pub game_budget_ms: u64,
    /// Deadline of the one-time stage analysis, in milliseconds.
    pub analysis_budget_ms: u64,
    /// Upper bound on a single move's allocation, in milliseconds.
    pub max_move_ms: u64,
    /// Positions with at most this many legal moves are searched with alpha-beta.
    pub mcts_threshold: usize,
    pub search_start_depth: Depth,
    pub pv_start_depth: Depth,
    /// Upper bound on iterative deepening; the empty-cell count also bounds it.
    pub max_depth: Depth,
    /// Number of own opening-line moves replayed before searching.
    pub pv_replay_limit: usize,
    pub weight_rollouts: usize,
    pub weight_rollout_plies: usize,
    pub regression_iterations: usize,
    pub regression_learning_rate: f64,
    pub mcts_rollout_plies: usize,
    /// Score scale of the `tanh` squashing applied to rollout results.
    pub mcts_reward_scale: f64,
    /// Optional cap on MCTS iterations, mainly for reproducible runs.
    pub mcts_max_iterations: Option<u32>,
    /// Keep the alpha-beta transposition table across the moves of one game.
    pub reuse_transposition_table: bool,
    /// Seed for rollouts and MCTS. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            game_budget_ms: 10_000,
            analysis_budget_ms: 60_000,
            max_move_ms: 1_000,
            mcts_threshold: 3,
            search_start_depth: 1,
            pv_start_depth: 2,
            max_depth: 64,
            pv_replay_limit: 2,
            weight_rollouts: 200,
            weight_rollout_plies: 10,
            regression_iterations: 50,
            regression_learning_rate: 0.01,
            mcts_rollout_plies: 20,
            mcts_reward_scale: 50.0,
            mcts_max_iterations: None,
            reuse_transposition_table: false,
            seed: None,
        }
    }
}
