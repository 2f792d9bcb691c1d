//! Core domain types for the board game.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// A player's mark. `A` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// First mover (roster position 0).
    A,
    /// Second mover (roster position 1).
    B,
}

impl Mark {
    /// Both marks, in turn order.
    pub const ALL: [Mark; 2] = [Mark::A, Mark::B];

    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::A => Mark::B,
            Mark::B => Mark::A,
        }
    }

    /// Roster index of the player holding this mark.
    pub fn roster_index(self) -> usize {
        match self {
            Mark::A => 0,
            Mark::B => 1,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

/// 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Formats the board as text, empty squares numbered 1-9.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a board game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum BoardOutcome {
    /// Game is ongoing.
    Undetermined,
    /// Three in a row for the given mark.
    Won(Mark),
    /// Board filled with no winner.
    Draw,
}

impl BoardOutcome {
    /// Returns true once the game can take no more moves.
    pub fn is_terminal(&self) -> bool {
        !self.is_undetermined()
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            BoardOutcome::Won(mark) => Some(*mark),
            _ => None,
        }
    }
}

impl std::fmt::Display for BoardOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardOutcome::Undetermined => write!(f, "In progress"),
            BoardOutcome::Won(mark) => write!(f, "Player {} wins", mark),
            BoardOutcome::Draw => write!(f, "Draw"),
        }
    }
}
