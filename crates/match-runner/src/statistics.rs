use colored::*;

use adaptive_core::Disc;

use crate::game::GameOutcome;

const RECENT_RESULTS: usize = 5;
const BAR_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchWinner {
    Engine,
    Opponent,
    Draw,
}

#[derive(Debug, Clone)]
pub struct GameHistory {
    pub winner: MatchWinner,
    /// Disc difference from the engine's point of view
    pub score: i32,
    pub engine_color: Disc,
}

#[derive(Debug, Clone, Default)]
pub struct MatchStatistics {
    pub engine_wins: u32,
    pub opponent_wins: u32,
    pub draws: u32,
    pub total_score: i32,
    pub overruns: u32,
    pub engine_time_ms: u64,
    pub engine_moves: usize,
    pub recent_results: Vec<GameHistory>,
}

impl MatchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished game in which the engine played `engine_color`.
    pub fn add_result(&mut self, outcome: &GameOutcome, engine_color: Disc) -> MatchWinner {
        let winner = match outcome.result.winner() {
            Some(color) if color == engine_color => MatchWinner::Engine,
            Some(_) => MatchWinner::Opponent,
            None => MatchWinner::Draw,
        };
        match winner {
            MatchWinner::Engine => self.engine_wins += 1,
            MatchWinner::Opponent => self.opponent_wins += 1,
            MatchWinner::Draw => self.draws += 1,
        }

        let score = outcome.score_for(engine_color);
        self.total_score += score;
        if outcome.overrun == Some(engine_color) {
            self.overruns += 1;
        }
        self.engine_time_ms += outcome.time_ms(engine_color);
        self.engine_moves += outcome.moves(engine_color);

        self.recent_results.push(GameHistory {
            winner,
            score,
            engine_color,
        });
        if self.recent_results.len() > RECENT_RESULTS {
            self.recent_results.remove(0);
        }
        winner
    }

    pub fn total_games(&self) -> u32 {
        self.engine_wins + self.opponent_wins + self.draws
    }

    pub fn engine_win_rate(&self) -> f64 {
        rate(self.engine_wins, self.total_games())
    }

    pub fn opponent_win_rate(&self) -> f64 {
        rate(self.opponent_wins, self.total_games())
    }

    pub fn average_score(&self) -> f64 {
        match self.total_games() {
            0 => 0.0,
            n => self.total_score as f64 / n as f64,
        }
    }

    pub fn print_final_results(&self, engine_name: &str, opponent_name: &str) {
        let total_games = self.total_games();
        if total_games == 0 {
            println!("No games were played.");
            return;
        }

        println!();
        println!("{}", "═".repeat(80).bright_cyan());
        println!("{:^80}", "MATCH RESULTS".bright_white().bold());
        println!("{}", "═".repeat(80).bright_cyan());
        println!();

        println!(
            "{} {}",
            "Total Games:".bright_white(),
            total_games.to_string().bright_yellow().bold()
        );
        println!(
            "{} {} / {} / {}",
            "Results:".bright_white(),
            format!("{} wins", self.engine_wins).bright_green(),
            format!("{} draws", self.draws).bright_blue(),
            format!("{} losses", self.opponent_wins).bright_red()
        );
        println!();

        self.print_visual_results(engine_name, opponent_name);
        println!();
        self.print_detailed_stats(engine_name, opponent_name);
        println!();
        self.print_timing();

        println!("{}", "═".repeat(80).bright_cyan());
    }

    fn print_visual_results(&self, engine_name: &str, opponent_name: &str) {
        let total = self.total_games() as f64;
        let name_width = engine_name.len().max(opponent_name.len()).max(12);

        println!("{}", "Win Rate".bright_white().underline());
        println!();

        let bar = |count: u32| {
            let len = ((count as f64 / total) * BAR_WIDTH as f64) as usize;
            ("█".repeat(len), "░".repeat(BAR_WIDTH - len).bright_black())
        };

        let (filled, empty) = bar(self.engine_wins);
        println!(
            "{:>width$} {}{} {:.1}%",
            engine_name.bright_cyan().bold(),
            filled.bright_green(),
            empty,
            self.engine_win_rate(),
            width = name_width
        );

        if self.draws > 0 {
            let (filled, empty) = bar(self.draws);
            println!(
                "{:>width$} {}{} {:.1}%",
                "Draws".bright_white(),
                filled.bright_blue(),
                empty,
                rate(self.draws, self.total_games()),
                width = name_width
            );
        }

        let (filled, empty) = bar(self.opponent_wins);
        println!(
            "{:>width$} {}{} {:.1}%",
            opponent_name.bright_cyan().bold(),
            filled.bright_red(),
            empty,
            self.opponent_win_rate(),
            width = name_width
        );
    }

    fn print_detailed_stats(&self, engine_name: &str, opponent_name: &str) {
        println!("{}", "Detailed Statistics".bright_white().underline());
        println!();

        let name_width = engine_name.len().max(opponent_name.len()).max("Player".len());
        let rule = |left: &str, mid: &str, right: &str| {
            format!(
                "{left}─{:─<name_width$}─{mid}─{:─^7}─{mid}─{:─^7}─{mid}─{:─^7}─{mid}─{:─^10}─{mid}─{:─^7}─{right}",
                "", "", "", "", "", ""
            )
            .bright_black()
        };

        println!("{}", rule("┌", "┬", "┐"));
        println!(
            "│ {:^name_width$} │ {:^7} │ {:^7} │ {:^7} │ {:^10} │ {:^7} │",
            "Player".bright_white(),
            "Wins".bright_white(),
            "Losses".bright_white(),
            "Draws".bright_white(),
            "Win Rate".bright_white(),
            "Score".bright_white(),
        );
        println!("{}", rule("├", "┼", "┤"));

        let rows = [
            (engine_name, self.engine_wins, self.opponent_wins, self.engine_win_rate(), self.total_score),
            (opponent_name, self.opponent_wins, self.engine_wins, self.opponent_win_rate(), -self.total_score),
        ];
        for (name, wins, losses, win_rate, score) in rows {
            println!(
                "│ {:name_width$} │ {:^7} │ {:^7} │ {:^7} │ {:^10} │ {:>7} │",
                name.bright_cyan().bold(),
                wins.to_string().bright_green(),
                losses.to_string().bright_red(),
                self.draws.to_string().bright_blue(),
                format!("{win_rate:.1}%").bright_yellow(),
                colored_score(score),
            );
        }
        println!("{}", rule("└", "┴", "┘"));
    }

    fn print_timing(&self) {
        println!("{}", "Engine Timing".bright_white().underline());
        println!();
        let per_move = match self.engine_moves {
            0 => 0.0,
            n => self.engine_time_ms as f64 / n as f64,
        };
        println!(
            "{:>20}: {}",
            "Average Disc Diff".bright_white(),
            format!("{:+.1}", self.average_score()).bright_yellow()
        );
        println!(
            "{:>20}: {}",
            "Time per Move".bright_white(),
            format!("{per_move:.1} ms").bright_yellow()
        );
        let overruns = self.overruns.to_string();
        println!(
            "{:>20}: {}",
            "Budget Overruns".bright_white(),
            if self.overruns == 0 {
                overruns.bright_green()
            } else {
                overruns.bright_red()
            }
        );
    }
}

fn rate(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn colored_score(score: i32) -> ColoredString {
    let text = format!("{score:+}");
    match score.cmp(&0) {
        std::cmp::Ordering::Greater => text.bright_green(),
        std::cmp::Ordering::Less => text.bright_red(),
        std::cmp::Ordering::Equal => text.bright_yellow(),
    }
}
