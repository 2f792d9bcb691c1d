//! Draw detection.

use super::super::{Board, Square};
use super::win::check_winner;
use tracing::instrument;

/// Checks if every square is occupied.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winner.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::super::super::{Mark, Position};
    use super::*;

    fn fill(board: &mut Board, marks: [Mark; 9]) {
        for (pos, mark) in Position::ALL.into_iter().zip(marks) {
            board.set(pos, Square::Occupied(mark));
        }
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Mark::A));
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        use Mark::{A, B};
        let mut board = Board::new();
        // A B A / B A A / B A B
        fill(&mut board, [A, B, A, B, A, A, B, A, B]);
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        use Mark::{A, B};
        let mut board = Board::new();
        // A A A / B B A / A B B
        fill(&mut board, [A, A, A, B, B, A, A, B, B]);
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
