use crate::board::Board;
use crate::disc::Disc;
use crate::error::{GameError, StageError};
use crate::move_list::MoveList;
use crate::oracle::Oracle;
use crate::rules::next_player;
use crate::square::Square;
use crate::stage::StageConfig;

/// A game in progress with its move history.
///
/// Moves are applied through an oracle. Turn order after a move comes from
/// the oracle's `next_to_move` answer when it has one, and from the
/// fewer-pieces flag given at construction otherwise.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Disc,
    fewer_pieces_continue: bool,
    history: Vec<(Option<Square>, Board, Disc)>,
}

impl GameState {
    /// Creates a new game from a stage's initial position with Black to move.
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] if the stage description is invalid.
    pub fn new(stage: &StageConfig, fewer_pieces_continue: bool) -> Result<Self, StageError> {
        Ok(Self::from_board(stage.initial_board()?, Disc::Black, fewer_pieces_continue))
    }

    /// Creates a game state from an arbitrary position.
    pub fn from_board(board: Board, side_to_move: Disc, fewer_pieces_continue: bool) -> Self {
        GameState {
            board,
            side_to_move,
            fewer_pieces_continue,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Disc {
        self.side_to_move
    }

    /// Returns the legal moves of the side to move.
    pub fn valid_moves<O: Oracle + ?Sized>(&self, oracle: &O) -> MoveList {
        oracle.valid_moves(&self.board, self.side_to_move)
    }

    /// Plays a move for the side to move, or passes when `sq` is `None`.
    ///
    /// After a move the turn goes to the player chosen by the turn rule; if
    /// that player has no legal move but the other one does, the turn passes
    /// automatically.
    ///
    /// # Errors
    ///
    /// * [`GameError::GameOver`] if neither player can move.
    /// * [`GameError::IllegalMove`] if the oracle rejects the move.
    /// * [`GameError::IllegalPass`] if passing while legal moves exist.
    pub fn make_move<O: Oracle + ?Sized>(
        &mut self,
        oracle: &O,
        sq: Option<Square>,
    ) -> Result<(), GameError> {
        if self.is_game_over(oracle) {
            return Err(GameError::GameOver);
        }

        let mover = self.side_to_move;
        match sq {
            Some(square) => {
                let next = oracle.simulate_move(&self.board, mover, square).ok_or(
                    GameError::IllegalMove {
                        square,
                        player: mover,
                    },
                )?;
                let prev = std::mem::replace(&mut self.board, next);
                self.history.push((Some(square), prev, mover));

                let proposed = oracle
                    .next_to_move(&self.board, mover)
                    .unwrap_or_else(|| next_player(&self.board, mover, self.fewer_pieces_continue));
                self.side_to_move = proposed;
                if self.valid_moves(oracle).is_empty()
                    && !oracle.valid_moves(&self.board, proposed.opposite()).is_empty()
                {
                    self.side_to_move = proposed.opposite();
                }
            }
            None => {
                if !self.valid_moves(oracle).is_empty() {
                    return Err(GameError::IllegalPass(mover));
                }
                self.history.push((None, self.board.clone(), mover));
                self.side_to_move = mover.opposite();
            }
        }
        Ok(())
    }

    /// Returns `true` when neither player has a legal move.
    pub fn is_game_over<O: Oracle + ?Sized>(&self, oracle: &O) -> bool {
        oracle.valid_moves(&self.board, Disc::Black).is_empty()
            && oracle.valid_moves(&self.board, Disc::White).is_empty()
    }

    /// Returns the disc count for both players.
    ///
    /// # Returns
    ///
    /// A tuple `(black_count, white_count)`.
    pub fn get_score(&self) -> (usize, usize) {
        (
            self.board.disc_count(Disc::Black),
            self.board.disc_count(Disc::White),
        )
    }

    /// Returns the last move played, `None` for a pass or an empty history.
    pub fn last_move(&self) -> Option<Square> {
        self.history.last().and_then(|(sq, _, _)| *sq)
    }

    /// Returns the move history as `(move, board_before, mover)` tuples.
    pub fn move_history(&self) -> &[(Option<Square>, Board, Disc)] {
        &self.history
    }

    /// Undoes the last move.
    ///
    /// # Returns
    ///
    /// `true` if a move was undone, `false` if the history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some((_, prev_board, prev_side)) => {
                self.board = prev_board;
                self.side_to_move = prev_side;
                true
            }
            None => false,
        }
    }
}
