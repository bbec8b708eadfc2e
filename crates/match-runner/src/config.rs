//! Command-line arguments and engine configuration loading.

use std::path::{Path, PathBuf};

use adaptive_core::config::EngineConfig;
use adaptive_core::rules::RuleFlags;
use adaptive_core::stage::StageConfig;
use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

/// Who the engine plays against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Opponent {
    /// A second, independently analysed engine.
    Engine,
    /// Uniformly random legal moves.
    Random,
}

/// Configuration for a self-play match on one stage.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plays matches of the adaptive engine on stages with hidden house rules"
)]
pub struct Config {
    /// Built-in stage to play on
    #[arg(short, long, default_value = "standard8", value_parser = ["standard8", "small6", "csquares8"])]
    pub stage: String,

    /// Hidden rule: blocked cells do not stop a flipping line
    #[arg(long)]
    pub occlusion: bool,

    /// Hidden rule: the player with fewer discs moves again
    #[arg(long)]
    pub fewer_pieces_continue: bool,

    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 2)]
    pub games: u32,

    /// Opponent of the engine
    #[arg(short, long, value_enum, default_value_t = Opponent::Random)]
    pub opponent: Opponent,

    /// TOML file with engine settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-game time budget of each side in milliseconds, overriding the file
    #[arg(long)]
    pub budget_ms: Option<u64>,

    /// Stage analysis deadline in milliseconds, overriding the file
    #[arg(long)]
    pub analysis_ms: Option<u64>,

    /// RNG seed shared by the engines and the random opponent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Parse command-line arguments into a Config instance.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the selected stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a built-in stage.
    pub fn stage_config(&self) -> Result<StageConfig> {
        StageConfig::preset(&self.stage).ok_or_else(|| anyhow!("unknown stage '{}'", self.stage))
    }

    /// Returns the house rules the host enforces.
    pub fn rule_flags(&self) -> RuleFlags {
        RuleFlags {
            occlusion_allowed: self.occlusion,
            fewer_pieces_continue: self.fewer_pieces_continue,
        }
    }

    /// Loads the engine configuration and applies the command-line overrides.
    ///
    /// A missing or malformed file is reported and replaced by the defaults.
    pub fn engine_config(&self) -> EngineConfig {
        let mut engine = match &self.config {
            Some(path) => load_engine_config(path),
            None => EngineConfig::default(),
        };
        if let Some(budget) = self.budget_ms {
            engine.game_budget_ms = budget;
        }
        if let Some(analysis) = self.analysis_ms {
            engine.analysis_budget_ms = analysis;
        }
        if self.seed.is_some() {
            engine.seed = self.seed;
        }
        engine
    }
}

/// Reads an [`EngineConfig`] from a TOML file.
///
/// # Arguments
///
/// * `path` - Path to the file
///
/// # Returns
///
/// The parsed configuration, or the defaults if the file cannot be read or
/// parsed.
pub fn load_engine_config(path: &Path) -> EngineConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded engine config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                EngineConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("match-runner-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["match-runner"]).unwrap();
        assert_eq!(config.stage, "standard8");
        assert_eq!(config.games, 2);
        assert_eq!(config.opponent, Opponent::Random);
        assert_eq!(config.rule_flags(), RuleFlags::default());
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_hidden_rules_and_overrides() {
        let config = Config::try_parse_from([
            "match-runner",
            "--stage",
            "csquares8",
            "--occlusion",
            "--opponent",
            "engine",
            "--budget-ms",
            "5000",
            "--seed",
            "9",
        ])
        .unwrap();
        assert!(config.rule_flags().occlusion_allowed);
        assert!(!config.rule_flags().fewer_pieces_continue);
        assert_eq!(config.stage_config().unwrap().initial_blocked.len(), 8);
        assert_eq!(config.opponent, Opponent::Engine);

        let engine = config.engine_config();
        assert_eq!(engine.game_budget_ms, 5000);
        assert_eq!(engine.seed, Some(9));
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(Config::try_parse_from(["match-runner", "--stage", "hex"]).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let path = write_temp("partial.toml", "mcts_threshold = 5\nmax_move_ms = 250\n");
        let config = load_engine_config(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(config.mcts_threshold, 5);
        assert_eq!(config.max_move_ms, 250);
        assert_eq!(config.game_budget_ms, EngineConfig::default().game_budget_ms);
    }

    #[test]
    fn test_malformed_or_missing_file_falls_back() {
        let path = write_temp("broken.toml", "mcts_threshold = \"many\"");
        let config = load_engine_config(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config, EngineConfig::default());

        let missing = Path::new("/nonexistent/engine.toml");
        assert_eq!(load_engine_config(missing), EngineConfig::default());
    }
}
