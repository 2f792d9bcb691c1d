//! Puzzle engine: selection matching, completion and the clock.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::generator::GeneratedPuzzle;
use super::grid::{Coord, Grid};

/// Lifecycle of a puzzle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum PuzzleOutcome {
    /// Being played; the clock runs.
    Active,
    /// Every placed word was found.
    Completed,
    /// The player gave up.
    Abandoned,
}

/// Error raised by a rejected selection. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SelectError {
    /// The puzzle is no longer active.
    #[display("Puzzle is no longer active")]
    NotActive,

    /// The coordinate lies outside the grid.
    #[display("Cell {} is outside the grid", _0)]
    OutOfBounds(Coord),
}

impl std::error::Error for SelectError {}

/// Result of adding a cell to the selection.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SelectionOutcome {
    /// The selection grew and may still match.
    Extended {
        /// Current selection length.
        len: usize,
    },
    /// A word was found and the selection cleared.
    Found {
        /// The word found.
        word: String,
    },
    /// The selection reached the longest word without a match and was cleared.
    Reset,
}

/// What the scoring policy needs from a finished puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleReport {
    /// `Completed` or `Abandoned`.
    pub outcome: PuzzleOutcome,
    /// Seconds on the clock when the puzzle ended.
    pub elapsed_secs: u32,
    /// Words found.
    pub words_found: u32,
    /// Words placed in the grid.
    pub total_words: u32,
}

/// Complete puzzle state.
///
/// Only tracks which words were found, not where they were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    grid: Grid,
    target_words: Vec<String>,
    placed_words: Vec<String>,
    found_words: Vec<String>,
    selection: Vec<Coord>,
    elapsed_secs: u32,
    outcome: PuzzleOutcome,
}

impl PuzzleState {
    /// Starts a puzzle from a generated grid.
    ///
    /// A puzzle in which no word could be placed starts out completed.
    #[instrument(skip(puzzle), fields(placed = puzzle.placements.len()))]
    pub fn new(puzzle: GeneratedPuzzle) -> Self {
        let placed_words: Vec<String> = puzzle.placements.into_iter().map(|p| p.word).collect();
        let outcome = if placed_words.is_empty() {
            warn!("No word could be placed");
            PuzzleOutcome::Completed
        } else {
            PuzzleOutcome::Active
        };
        Self {
            grid: puzzle.grid,
            target_words: puzzle.words,
            placed_words,
            found_words: Vec::new(),
            selection: Vec::new(),
            elapsed_secs: 0,
            outcome,
        }
    }

    /// The letter grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Configured words for this difficulty.
    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    /// Words actually hidden in the grid.
    pub fn placed_words(&self) -> &[String] {
        &self.placed_words
    }

    /// Words found so far, in discovery order.
    pub fn found_words(&self) -> &[String] {
        &self.found_words
    }

    /// Returns true if `word` has been found.
    pub fn is_found(&self, word: &str) -> bool {
        self.found_words.iter().any(|w| w == word)
    }

    /// Cells selected in the current attempt.
    pub fn selection(&self) -> &[Coord] {
        &self.selection
    }

    /// Seconds elapsed while active.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Current outcome.
    pub fn outcome(&self) -> PuzzleOutcome {
        self.outcome
    }

    /// Length of the longest placed word.
    fn max_word_len(&self) -> usize {
        self.placed_words
            .iter()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Adds `coord` to the selection and checks it against unfound words,
    /// forwards or backwards.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError`] when the puzzle is not active or the cell is
    /// outside the grid.
    #[instrument(skip(self), fields(len = self.selection.len()))]
    pub fn select(&mut self, coord: Coord) -> Result<SelectionOutcome, SelectError> {
        if !self.outcome.is_active() {
            return Err(SelectError::NotActive);
        }
        if !self.grid.contains(coord) {
            return Err(SelectError::OutOfBounds(coord));
        }

        self.selection.push(coord);
        let forward = self.grid.read(&self.selection);
        let backward: String = forward.chars().rev().collect();

        let matched = self
            .placed_words
            .iter()
            .find(|w| (**w == forward || **w == backward) && !self.is_found(w))
            .cloned();

        if let Some(word) = matched {
            self.selection.clear();
            self.found_words.push(word.clone());
            info!(
                word = %word,
                found = self.found_words.len(),
                total = self.placed_words.len(),
                "Word found"
            );
            if self.found_words.len() == self.placed_words.len() {
                self.outcome = PuzzleOutcome::Completed;
                info!(elapsed = self.elapsed_secs, "Puzzle completed");
            }
            return Ok(SelectionOutcome::Found { word });
        }

        if self.selection.len() >= self.max_word_len() {
            debug!(letters = %forward, "Selection exhausted without a match");
            self.selection.clear();
            return Ok(SelectionOutcome::Reset);
        }

        Ok(SelectionOutcome::Extended {
            len: self.selection.len(),
        })
    }

    /// Drops the current selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Advances the clock by one second while active.
    pub fn tick(&mut self) {
        if self.outcome.is_active() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    /// Gives up on the puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NotActive`] if the puzzle already ended.
    #[instrument(skip(self), fields(found = self.found_words.len()))]
    pub fn give_up(&mut self) -> Result<(), SelectError> {
        if !self.outcome.is_active() {
            return Err(SelectError::NotActive);
        }
        self.selection.clear();
        self.outcome = PuzzleOutcome::Abandoned;
        info!(elapsed = self.elapsed_secs, "Puzzle abandoned");
        Ok(())
    }

    /// Scoring input, once the puzzle has ended.
    pub fn report(&self) -> Option<PuzzleReport> {
        (!self.outcome.is_active()).then_some(PuzzleReport {
            outcome: self.outcome,
            elapsed_secs: self.elapsed_secs,
            words_found: self.found_words.len() as u32,
            total_words: self.placed_words.len() as u32,
        })
    }
}
