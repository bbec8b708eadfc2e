//! Terminal output for the match runner.
//!
//! Progress is shown with an indicatif bar; finished games are printed above
//! it as one coloured line each.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use adaptive_core::{Disc, RuleFlags, RuleOracle, Strategy};

use crate::game::GameOutcome;
use crate::statistics::MatchWinner;

const MAX_OPENING_DISPLAY_LEN: usize = 24;

/// Formats match progress and per-game results.
pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    /// Create a styled progress bar for match tracking.
    pub fn create_progress_bar(&self, total_games: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total_games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        progress_bar.set_style(style);
        progress_bar
    }

    /// Prints what the engine learned about the stage.
    pub fn show_analysis(&self, stage: &str, hidden: RuleFlags, strategy: &Strategy<RuleOracle>) {
        let detected = strategy.flags();
        let opening: Vec<String> = strategy
            .opening_line()
            .iter()
            .map(|ply| ply.square.to_string())
            .collect();

        println!("{} {}", "Stage:".bright_white(), stage.bright_cyan().bold());
        println!(
            "{} {}",
            "Hidden rules:".bright_white(),
            format_flags(hidden).bright_black()
        );
        let detected_text = format_flags(detected);
        println!(
            "{} {}",
            "Detected rules:".bright_white(),
            if detected == hidden {
                detected_text.bright_green()
            } else {
                detected_text.bright_red()
            }
        );
        println!(
            "{} {}",
            "Opening line:".bright_white(),
            self.format_opening(&opening.join(" ")).bright_yellow()
        );
        println!();
    }

    /// One line summarising a finished game.
    pub fn format_game_line(
        &self,
        game_number: u32,
        outcome: &GameOutcome,
        winner: MatchWinner,
        engine_color: Disc,
    ) -> String {
        let score = outcome.score_for(engine_color);
        let overrun = match outcome.overrun {
            Some(player) => format!(" {} overran", player).bright_red().to_string(),
            None => String::new(),
        };
        format!(
            "{:>5}: {} {} {:>2}-{:<2} {} {}{}",
            game_number.to_string().bright_black(),
            self.format_result_symbol(winner),
            self.format_score(score, winner),
            outcome.black_discs,
            outcome.white_discs,
            self.format_vs_display(engine_color).bright_black(),
            format!("{}ms/{}ms", outcome.black_ms, outcome.white_ms).bright_black(),
            overrun
        )
    }

    fn format_result_symbol(&self, winner: MatchWinner) -> ColoredString {
        match winner {
            MatchWinner::Engine => "W".bright_green().bold(),
            MatchWinner::Opponent => "L".bright_red().bold(),
            MatchWinner::Draw => "D".bright_blue().bold(),
        }
    }

    fn format_score(&self, score: i32, winner: MatchWinner) -> ColoredString {
        let score_str = format!("{score:+3}");
        match winner {
            MatchWinner::Engine => score_str.bright_green(),
            MatchWinner::Opponent => score_str.bright_red(),
            MatchWinner::Draw => score_str.bright_blue(),
        }
    }

    fn format_opening(&self, opening: &str) -> String {
        if opening.is_empty() {
            "-".to_string()
        } else if opening.len() > MAX_OPENING_DISPLAY_LEN {
            format!("{}...", &opening[..MAX_OPENING_DISPLAY_LEN])
        } else {
            opening.to_string()
        }
    }

    fn format_vs_display(&self, engine_color: Disc) -> String {
        let (engine_symbol, opponent_symbol) = match engine_color {
            Disc::Black => ("●", "○"),
            Disc::White => ("○", "●"),
        };
        format!("{engine_symbol} Engine vs Opponent {opponent_symbol}")
    }
}

fn format_flags(flags: RuleFlags) -> String {
    format!(
        "occlusion={} fewer-pieces-continue={}",
        flags.occlusion_allowed, flags.fewer_pieces_continue
    )
}
