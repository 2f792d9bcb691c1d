//! Turn-based 3x3 board game.

mod engine;
mod position;
pub mod rules;
mod types;

pub use engine::{BoardReport, BoardState, MoveError};
pub use position::Position;
pub use types::{Board, BoardOutcome, Mark, Square};
