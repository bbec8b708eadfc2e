//! Common type aliases used throughout the engine.

/// Remaining search depth in plies.
pub type Depth = u32;

/// Evaluation score. Positive values favour the player the score is computed for.
pub type Score = f64;
