//! Named squares of the 3x3 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::types::Board;

/// One of the nine squares, numbered 0-8 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// Every square, in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Cell index, 0-8.
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Square at `index`, or `None` past 8.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row, 0-2 from the top.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column, 0-2 from the left.
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// Squares still open on `board`.
    #[instrument(skip(board))]
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .into_iter()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

/// Squares print as their 1-9 keypad number.
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "square {}", self.to_index() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_covers_board() {
        for (i, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(pos.row() * 3 + pos.col(), i);
        }
        assert_eq!(Position::from_index(4), Some(Position::Center));
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_display_uses_keypad_number() {
        assert_eq!(Position::TopLeft.to_string(), "square 1");
        assert_eq!(Position::BottomRight.to_string(), "square 9");
    }
}
