//! Self-play harness for the adaptive engine.
//!
//! Plays a series of games on a built-in stage whose house rules are hidden
//! from the engines, alternating colours, and prints the results.

use anyhow::Result;
use tracing::info;

mod config;
mod display;
mod game;
mod match_runner;
mod player;
mod statistics;
mod time_tracker;

use config::Config;
use match_runner::MatchRunner;

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let config = Config::parse_args();
    init_tracing(&config.log_level);

    let engine_config = config.engine_config();
    info!(stage = %config.stage, games = config.games, "starting match");

    let mut match_runner = MatchRunner::new();
    match_runner.run_match(&config, &engine_config)
}
