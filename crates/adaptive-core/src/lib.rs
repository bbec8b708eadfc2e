//! Adaptive engine for board-flipping territory games with hidden rule variants.
//!
//! The engine probes an opaque legality oracle to discover which house rules
//! are active, learns a positional weight matrix from sampled rollouts, runs a
//! one-time analysis search for an opening line, and then answers move
//! requests under a shrinking per-game time budget by dispatching between
//! iterative-deepening alpha-beta and Monte-Carlo tree search.

pub mod board;
pub mod config;
pub mod constants;
pub mod disc;
pub mod error;
pub mod game_state;
pub mod move_list;
pub mod oracle;
pub mod perft;
pub mod probe;
pub mod rollout;
pub mod rules;
pub mod search;
pub mod square;
pub mod stability;
pub mod stage;
pub mod strategy;
pub mod transposition_table;
pub mod types;
pub mod weights;

pub use board::Board;
pub use config::EngineConfig;
pub use disc::{Cell, Disc};
pub use error::{GameError, ParseError, StageError};
pub use move_list::MoveList;
pub use oracle::{Evaluation, Oracle};
pub use rules::{RuleFlags, RuleOracle};
pub use square::Square;
pub use stage::StageConfig;
pub use strategy::{Strategy, analyze_stage};
