//! Word-placement puzzle.

mod engine;
mod generator;
mod grid;
mod layout;

pub use engine::{PuzzleOutcome, PuzzleReport, PuzzleState, SelectError, SelectionOutcome};
pub use generator::{GeneratedPuzzle, Placement, generate};
pub use grid::{Coord, Direction, Grid};
pub use layout::{PuzzleLayout, PuzzleSettings};
