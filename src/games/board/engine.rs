//! Board engine: move validation and outcome tracking.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::position::Position;
use super::rules::{check_winner, is_draw};
use super::types::{Board, BoardOutcome, Mark, Square};

/// Error raised by an illegal move. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("{} is already occupied", _0)]
    SquareOccupied(Position),

    /// Cell index outside 0-8.
    #[display("Cell {} is off the board (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The game already has a determined outcome.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// What the scoring policy needs from a finished board game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardReport {
    /// Terminal outcome (never `Undetermined`).
    pub outcome: BoardOutcome,
    /// Total marks placed by both players.
    pub move_count: u32,
}

/// Complete board game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    board: Board,
    turn: Mark,
    move_count: u32,
    outcome: BoardOutcome,
    history: Vec<Position>,
}

impl BoardState {
    /// Empty board, `A` to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::A,
            move_count: 0,
            outcome: BoardOutcome::Undetermined,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to place next.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Number of marks placed so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Current outcome.
    pub fn outcome(&self) -> BoardOutcome {
        self.outcome
    }

    /// Positions played, in order.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Places the current mark at `cell_index` (0-8).
    ///
    /// After placing, all eight lines are checked; a full board without a
    /// winner is a draw; otherwise the turn passes to the opponent.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the game is over, the index is off the
    /// board, or the square is occupied.
    #[instrument(skip(self), fields(player = %self.turn, moves = self.move_count))]
    pub fn apply_move(&mut self, cell_index: usize) -> Result<BoardOutcome, MoveError> {
        if self.outcome.is_terminal() {
            warn!("Move after game over ignored");
            return Err(MoveError::GameOver);
        }

        let pos = Position::from_index(cell_index).ok_or(MoveError::OutOfBounds(cell_index))?;

        if !self.board.is_empty(pos) {
            debug!(position = %pos, "Square occupied");
            return Err(MoveError::SquareOccupied(pos));
        }

        let mark = self.turn;
        self.board.set(pos, Square::Occupied(mark));
        self.history.push(pos);
        self.move_count += 1;

        if let Some(winner) = check_winner(&self.board) {
            self.outcome = BoardOutcome::Won(winner);
        } else if is_draw(&self.board) {
            self.outcome = BoardOutcome::Draw;
        } else {
            self.turn = mark.opponent();
        }

        if self.outcome.is_terminal() {
            info!(outcome = %self.outcome, moves = self.move_count, "Board game finished");
        } else {
            debug!(position = %pos, next = %self.turn, "Move applied");
        }

        Ok(self.outcome)
    }

    /// Scoring input, once the game is terminal.
    pub fn report(&self) -> Option<BoardReport> {
        self.outcome.is_terminal().then_some(BoardReport {
            outcome: self.outcome,
            move_count: self.move_count,
        })
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
