//! Match execution and game management.
//!
//! The host side of a match: it owns the true rules, builds each engine
//! through stage analysis with only oracle access to them, and plays the
//! games while charging every move against the mover's clock.

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use adaptive_core::game_state::GameState;
use adaptive_core::{Disc, EngineConfig, RuleOracle, StageConfig, analyze_stage};

use crate::config::{Config, Opponent};
use crate::display::DisplayManager;
use crate::game::{GameOutcome, GameResult};
use crate::player::Player;
use crate::statistics::MatchStatistics;
use crate::time_tracker::TimeTracker;

/// Seed offset of the second engine so the two sides do not mirror each other.
const OPPONENT_SEED_OFFSET: u64 = 0x9e37_79b9;

/// Orchestrates a series of games between the engine and an opponent.
pub struct MatchRunner {
    display: DisplayManager,
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRunner {
    pub fn new() -> Self {
        Self {
            display: DisplayManager::new(),
        }
    }

    /// Analyses the stage, plays the configured number of games and prints
    /// the results.
    ///
    /// # Arguments
    ///
    /// * `config` - Command-line configuration: stage, hidden rules, games
    /// * `engine_config` - Budgets and tuning shared by every engine
    ///
    /// # Errors
    ///
    /// Returns an error if the stage is invalid, its analysis fails, or a
    /// game reaches an illegal state.
    pub fn run_match(&mut self, config: &Config, engine_config: &EngineConfig) -> Result<()> {
        let stage = config.stage_config()?;
        let hidden = config.rule_flags();
        let oracle = RuleOracle::new(hidden);

        let mut engine = self.build_engine(&stage, oracle, engine_config.clone(), "Adaptive")?;
        if let Player::Engine { strategy, .. } = &engine {
            self.display.show_analysis(&stage.name, hidden, strategy);
        }

        let mut opponent = match config.opponent {
            Opponent::Engine => {
                let mut opponent_config = engine_config.clone();
                opponent_config.seed = engine_config.seed.map(|s| s.wrapping_add(OPPONENT_SEED_OFFSET));
                self.build_engine(&stage, oracle, opponent_config, "Adaptive-2")?
            }
            Opponent::Random => {
                let rng = match engine_config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                Player::random("Random", rng)
            }
        };

        let mut time_tracker =
            TimeTracker::new(engine_config.game_budget_ms, engine_config.max_move_ms);
        let mut statistics = MatchStatistics::new();
        let progress_bar = self.display.create_progress_bar(u64::from(config.games));

        for game_index in 0..config.games {
            let engine_color = if game_index % 2 == 0 {
                Disc::Black
            } else {
                Disc::White
            };
            let (black, white) = match engine_color {
                Disc::Black => (&mut engine, &mut opponent),
                Disc::White => (&mut opponent, &mut engine),
            };

            let outcome = match play_game(&stage, &oracle, black, white, &mut time_tracker) {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress_bar.finish_and_clear();
                    return Err(e.context(format!("game {} failed", game_index + 1)));
                }
            };

            let winner = statistics.add_result(&outcome, engine_color);
            progress_bar.println(self.display.format_game_line(
                game_index + 1,
                &outcome,
                winner,
                engine_color,
            ));
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        statistics.print_final_results(engine.name(), opponent.name());
        Ok(())
    }

    fn build_engine(
        &self,
        stage: &StageConfig,
        oracle: RuleOracle,
        engine_config: EngineConfig,
        name: &str,
    ) -> Result<Player> {
        let board = stage.initial_board()?;
        let valid_moves = GameState::new(stage, oracle.flags().fewer_pieces_continue)?
            .valid_moves(&oracle);

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("{name}: analysing stage {}", stage.name));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        let strategy = analyze_stage(stage, &board, &valid_moves, oracle, engine_config)
            .with_context(|| format!("analysis of stage {} failed", stage.name));
        spinner.finish_and_clear();

        let strategy = strategy?;
        info!(
            engine = name,
            occlusion = strategy.flags().occlusion_allowed,
            fewer_pieces_continue = strategy.flags().fewer_pieces_continue,
            "engine ready"
        );
        Ok(Player::engine(name, strategy))
    }
}

/// Plays one game from the stage's initial position.
///
/// # Returns
///
/// The final disc counts, moves and time per side, and the first side that
/// ran past its budget plus grace, if any.
///
/// # Errors
///
/// Returns an error if a player picks a move the rules reject.
pub fn play_game(
    stage: &StageConfig,
    oracle: &RuleOracle,
    black: &mut Player,
    white: &mut Player,
    time_tracker: &mut TimeTracker,
) -> Result<GameOutcome> {
    let mut game = GameState::new(stage, oracle.flags().fewer_pieces_continue)?;
    black.new_game();
    white.new_game();
    time_tracker.reset();

    let mut moves = [0usize; 2];
    let mut overrun = None;

    while !game.is_game_over(oracle) {
        let side = game.side_to_move();
        let valid_moves = game.valid_moves(oracle);
        let player = match side {
            Disc::Black => &mut *black,
            Disc::White => &mut *white,
        };

        time_tracker.start_move();
        let mv = player.choose_move(game.board(), side, &valid_moves);
        let within_budget = time_tracker.end_move(side);
        if !within_budget && overrun.is_none() {
            warn!(player = %side, used_ms = time_tracker.used_ms(side), "time budget exceeded");
            overrun = Some(side);
        }

        if mv.is_none() && !valid_moves.is_empty() {
            bail!("{} ({side}) passed with legal moves available", player.name());
        }
        debug!(player = %side, mv = ?mv, "move played");
        game.make_move(oracle, mv)
            .with_context(|| format!("{} ({side}) played an illegal move", player.name()))?;
        if mv.is_some() {
            moves[side as usize] += 1;
        }
    }

    let (black_discs, white_discs) = game.get_score();
    Ok(GameOutcome {
        result: GameResult::from_counts(black_discs, white_discs),
        black_discs,
        white_discs,
        black_moves: moves[Disc::Black as usize],
        white_moves: moves[Disc::White as usize],
        black_ms: time_tracker.used_ms(Disc::Black),
        white_ms: time_tracker.used_ms(Disc::White),
        overrun,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptive_core::RuleFlags;

    fn fast_config(seed: u64) -> EngineConfig {
        EngineConfig {
            game_budget_ms: 2_000,
            analysis_budget_ms: 300,
            max_move_ms: 100,
            max_depth: 4,
            weight_rollouts: 20,
            seed: Some(seed),
            ..EngineConfig::default()
        }
    }

    fn engine(stage: &StageConfig, oracle: RuleOracle, seed: u64) -> Player {
        MatchRunner::new()
            .build_engine(stage, oracle, fast_config(seed), "engine")
            .unwrap()
    }

    #[test]
    fn test_random_players_finish_a_game() {
        let stage = StageConfig::small();
        let oracle = RuleOracle::standard();
        let mut black = Player::random("a", StdRng::seed_from_u64(1));
        let mut white = Player::random("b", StdRng::seed_from_u64(2));
        let mut tracker = TimeTracker::new(10_000, 1_000);

        let outcome = play_game(&stage, &oracle, &mut black, &mut white, &mut tracker).unwrap();
        assert!(outcome.black_discs + outcome.white_discs <= 36);
        assert!(outcome.black_moves > 0);
        assert_eq!(outcome.overrun, None);
        assert_eq!(
            outcome.result,
            GameResult::from_counts(outcome.black_discs, outcome.white_discs)
        );
    }

    #[test]
    fn test_engine_beats_budget_on_small_board() {
        let stage = StageConfig::small();
        let oracle = RuleOracle::standard();
        let mut black = engine(&stage, oracle, 5);
        let mut white = Player::random("random", StdRng::seed_from_u64(5));
        let mut tracker = TimeTracker::new(2_000, 100);

        let outcome = play_game(&stage, &oracle, &mut black, &mut white, &mut tracker).unwrap();
        assert_eq!(outcome.overrun, None);
        assert!(outcome.black_ms <= 2_100);
    }

    #[test]
    fn test_hidden_occlusion_game_completes() {
        let stage = StageConfig::c_squares();
        let oracle = RuleOracle::new(RuleFlags {
            occlusion_allowed: true,
            fewer_pieces_continue: false,
        });
        let mut black = Player::random("random", StdRng::seed_from_u64(8));
        let mut white = engine(&stage, oracle, 8);
        let mut tracker = TimeTracker::new(2_000, 100);

        let outcome = play_game(&stage, &oracle, &mut black, &mut white, &mut tracker).unwrap();
        assert!(outcome.white_moves > 0);
        if let Player::Engine { strategy, .. } = &white {
            assert!(strategy.flags().occlusion_allowed);
        }
    }
}
