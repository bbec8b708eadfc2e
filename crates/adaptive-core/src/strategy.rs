//! Stage analysis and per-move dispatch.
//!
//! [`analyze_stage`] runs once per stage: it probes the hidden rules, learns a
//! weight matrix and searches an opening line. The returned [`Strategy`] then
//! answers move requests, trying in order
//!
//! 1. the next own move of the opening line, while it is still legal,
//! 2. the first legal move whose disc would be stable,
//! 3. alpha-beta for narrow positions, MCTS for wide ones.

use std::fmt;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::disc::Disc;
use crate::error::StageError;
use crate::oracle::Oracle;
use crate::probe::probe;
use crate::rules::RuleFlags;
use crate::search::Search;
use crate::search::mcts::{Mcts, MctsParams};
use crate::search::node_type::{NonPV, PV};
use crate::search::search_result::PvPly;
use crate::search::time_control::{Deadline, TimeBudget};
use crate::square::Square;
use crate::stability::is_stable_move;
use crate::stage::StageConfig;
use crate::transposition_table::TranspositionTable;
use crate::weights::{WeightMatrix, learn};

/// Share of the analysis budget granted to the weight learner, as a divisor.
const LEARNER_BUDGET_DIVISOR: u32 = 4;

/// How the last move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    OpeningReplay,
    StableShortcut,
    AlphaBeta,
    Mcts,
    /// The chosen routine produced no usable move; the first legal move was played.
    Fallback,
    Pass,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Decision::OpeningReplay => "opening",
            Decision::StableShortcut => "stable",
            Decision::AlphaBeta => "alphabeta",
            Decision::Mcts => "mcts",
            Decision::Fallback => "fallback",
            Decision::Pass => "pass",
        };
        f.write_str(name)
    }
}

/// Per-game state of a strategy.
#[derive(Debug, Clone)]
struct Session {
    budget: TimeBudget,
    /// Index of the next unread ply of the opening line.
    opening_cursor: usize,
    replayed: usize,
    opening_abandoned: bool,
    /// Empty cells on the last board a move was requested for.
    last_empties: Option<usize>,
}

impl Session {
    fn new(game_budget_ms: u64) -> Self {
        Session {
            budget: TimeBudget::new(game_budget_ms),
            opening_cursor: 0,
            replayed: 0,
            opening_abandoned: false,
            last_empties: None,
        }
    }

    fn reset(&mut self) {
        self.budget.reset();
        self.opening_cursor = 0;
        self.replayed = 0;
        self.opening_abandoned = false;
        self.last_empties = None;
    }
}

/// A player for one stage, built by [`analyze_stage`].
///
/// Owns everything the per-move calls need: the oracle, the inferred rules,
/// the learned weights, the opening line and the game session.
pub struct Strategy<O: Oracle> {
    oracle: O,
    config: EngineConfig,
    initial_board: Board,
    flags: RuleFlags,
    weights: WeightMatrix,
    opening_line: Vec<PvPly>,
    session: Session,
    rng: StdRng,
    tt: TranspositionTable,
    /// Root player of the searches whose results the table holds.
    tt_owner: Option<Disc>,
    last_decision: Option<Decision>,
}

/// Analyses a stage and builds its strategy.
///
/// # Arguments
///
/// * `stage` - Stage description; validated first.
/// * `initial_board` - Starting position as the host presents it.
/// * `initial_valid_moves` - Black's legal moves on `initial_board`.
/// * `oracle` - The host's rules.
/// * `config` - Budgets and tuning.
///
/// # Returns
///
/// The strategy, or a [`StageError`] if the stage is malformed or does not
/// match the board size.
pub fn analyze_stage<O: Oracle>(
    stage: &StageConfig,
    initial_board: &Board,
    initial_valid_moves: &[Square],
    oracle: O,
    config: EngineConfig,
) -> Result<Strategy<O>, StageError> {
    stage.validate()?;
    if stage.board_size != initial_board.size() {
        return Err(StageError::SizeMismatch {
            expected: stage.board_size,
            actual: initial_board.size(),
        });
    }

    let start = Instant::now();
    let analysis_budget = Duration::from_millis(config.analysis_budget_ms);
    let deadline = Deadline::after(analysis_budget);
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

    let flags = probe(initial_board, &oracle);

    let learner_deadline = Deadline::after(analysis_budget / LEARNER_BUDGET_DIVISOR).min(deadline);
    let weights = learn(initial_board, &oracle, flags, learner_deadline, &config, &mut rng);

    let mut tt = TranspositionTable::new();
    let result = Search::new(&oracle, &weights, flags).iterative_deepening::<PV>(
        &mut tt,
        initial_board,
        Disc::Black,
        config.pv_start_depth,
        config.max_depth,
        deadline,
    );

    let mut opening_line = result.pv_line;
    if let Some(first) = opening_line.first()
        && first.player == Disc::Black
        && !initial_valid_moves.contains(&first.square)
    {
        warn!(mv = %first.square, "opening line starts with a move the host rejects, dropping it");
        opening_line.clear();
    }

    info!(
        occlusion = flags.occlusion_allowed,
        fewer_pieces_continue = flags.fewer_pieces_continue,
        depth = result.depth,
        score = result.score,
        nodes = result.n_nodes,
        opening = %format_line(&opening_line),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "stage analysed"
    );

    Ok(Strategy {
        oracle,
        session: Session::new(config.game_budget_ms),
        config,
        initial_board: initial_board.clone(),
        flags,
        weights,
        opening_line,
        rng,
        tt,
        tt_owner: Some(Disc::Black),
        last_decision: None,
    })
}

fn format_line(line: &[PvPly]) -> String {
    line.iter()
        .map(|ply| ply.square.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl<O: Oracle> Strategy<O> {
    /// Picks the move for `player`.
    ///
    /// # Arguments
    ///
    /// * `board` - Current position.
    /// * `player` - Player to move.
    /// * `valid_moves` - The host's legal moves for `player`.
    ///
    /// # Returns
    ///
    /// A member of `valid_moves`, or `None` exactly when `valid_moves` is empty.
    pub fn choose_move(&mut self, board: &Board, player: Disc, valid_moves: &[Square]) -> Option<Square> {
        let Some(&first_valid) = valid_moves.first() else {
            self.last_decision = Some(Decision::Pass);
            return None;
        };

        // Every own move fills a cell, so a board that is not emptier than the
        // last one seen belongs to a new game.
        let empties = board.empty_count();
        if *board == self.initial_board || self.session.last_empties.is_some_and(|last| empties >= last) {
            self.new_game();
        }
        self.session.last_empties = Some(empties);

        let start = Instant::now();
        let deadline = self
            .session
            .budget
            .allocate(board.empty_count(), Duration::from_millis(self.config.max_move_ms));

        let (candidate, decision) = self.decide(board, player, valid_moves, deadline);
        let (mv, decision) = match candidate {
            Some(mv) if valid_moves.contains(&mv) => (mv, decision),
            _ => {
                warn!(?candidate, %decision, "no usable move from the search, playing the first legal move");
                (first_valid, Decision::Fallback)
            }
        };

        let elapsed = start.elapsed();
        self.session.budget.record(elapsed);
        self.last_decision = Some(decision);
        debug!(
            %player,
            %mv,
            %decision,
            moves = valid_moves.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            remaining_ms = self.session.budget.remaining().as_millis() as u64,
            "move chosen"
        );
        Some(mv)
    }

    /// Resets the game session: time used and opening progress.
    ///
    /// Happens on its own when the strategy is shown the initial board or a
    /// board no emptier than the previous request.
    pub fn new_game(&mut self) {
        self.session.reset();
        self.tt.clear();
        self.tt_owner = None;
    }

    /// Converts the strategy into a plain move function.
    pub fn into_fn(mut self) -> impl FnMut(&Board, Disc, &[Square]) -> Option<Square> {
        move |board, player, valid_moves| self.choose_move(board, player, valid_moves)
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Opening line found by the analysis, starting with Black.
    pub fn opening_line(&self) -> &[PvPly] {
        &self.opening_line
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    pub fn budget(&self) -> &TimeBudget {
        &self.session.budget
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn decide(
        &mut self,
        board: &Board,
        player: Disc,
        valid_moves: &[Square],
        deadline: Deadline,
    ) -> (Option<Square>, Decision) {
        if let Some(mv) = self.replay_opening(player, valid_moves) {
            return (Some(mv), Decision::OpeningReplay);
        }

        let occlusion = self.flags.occlusion_allowed;
        if let Some(&mv) = valid_moves
            .iter()
            .take_while(|_| !deadline.is_reached())
            .find(|&&mv| is_stable_move(&self.oracle, board, player, mv, occlusion))
        {
            return (Some(mv), Decision::StableShortcut);
        }

        if valid_moves.len() <= self.config.mcts_threshold {
            (self.alpha_beta(board, player, deadline), Decision::AlphaBeta)
        } else {
            let params = MctsParams::from(&self.config);
            let result = Mcts::new(&self.oracle, self.flags, params, &mut self.rng).search(board, player, deadline);
            (result.best_move, Decision::Mcts)
        }
    }

    /// Returns the next own opening move if it is still legal.
    ///
    /// The first own move that is no longer legal abandons the line for the
    /// rest of the game.
    fn replay_opening(&mut self, player: Disc, valid_moves: &[Square]) -> Option<Square> {
        let session = &mut self.session;
        if session.opening_abandoned || session.replayed >= self.config.pv_replay_limit {
            return None;
        }

        let rest = self.opening_line.get(session.opening_cursor..)?;
        let offset = rest.iter().position(|ply| ply.player == player)?;
        let ply = rest[offset];
        session.opening_cursor += offset + 1;

        if valid_moves.contains(&ply.square) {
            session.replayed += 1;
            Some(ply.square)
        } else {
            debug!(mv = %ply.square, "opening line no longer legal, abandoning it");
            session.opening_abandoned = true;
            None
        }
    }

    fn alpha_beta(&mut self, board: &Board, player: Disc, deadline: Deadline) -> Option<Square> {
        if !self.config.reuse_transposition_table || self.tt_owner != Some(player) {
            self.tt.clear();
            self.tt_owner = Some(player);
        }

        let search = Search::new(&self.oracle, &self.weights, self.flags);
        let result = search.iterative_deepening::<NonPV>(
            &mut self.tt,
            board,
            player,
            self.config.search_start_depth,
            self.config.max_depth,
            deadline,
        );
        debug!(depth = result.depth, score = result.score, nodes = result.n_nodes, "alpha-beta finished");
        result.best_move
    }
}
