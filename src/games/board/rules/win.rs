//! Win detection.

use super::super::{Board, Mark, Position, Square};
use tracing::instrument;

/// The eight winning triples: rows, columns, diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Mark owning a complete line, scanning [`LINES`] in order.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Square::Occupied(mark) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
            Some(mark)
        }
        _ => None,
    })
}
