//! Puzzle layouts per difficulty.

use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Grid size and candidate words for one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleLayout {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Words to hide, in listing order.
    pub words: Vec<String>,
}

impl PuzzleLayout {
    fn from_words(grid_size: usize, words: &[&str]) -> Self {
        Self {
            grid_size,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Puzzle generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSettings {
    /// Placement tries per word before it is dropped.
    pub placement_attempts: u32,
    /// Easy layout.
    pub easy: PuzzleLayout,
    /// Medium layout.
    pub medium: PuzzleLayout,
    /// Hard layout.
    pub hard: PuzzleLayout,
}

impl PuzzleSettings {
    /// Layout for the given difficulty.
    pub fn layout(&self, difficulty: Difficulty) -> &PuzzleLayout {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            placement_attempts: 50,
            easy: PuzzleLayout::from_words(8, &["FOCUS", "GOAL", "TEAM", "UNITY", "DRIVE"]),
            medium: PuzzleLayout::from_words(
                10,
                &["SUCCESS", "PROJECT", "LEADER", "VISION", "FUTURE", "CREW"],
            ),
            hard: PuzzleLayout::from_words(
                12,
                &[
                    "INNOVATION",
                    "STRATEGY",
                    "TEAMWORK",
                    "EXCELLENCE",
                    "GROWTH",
                    "PRODUCTIVITY",
                ],
            ),
        }
    }
}
