//! XP scoring policy.
//!
//! Pure mapping from an engine report to an XP award. The policy holds only
//! its immutable settings, so identical inputs always give identical awards.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::games::board::{BoardOutcome, BoardReport};
use crate::games::puzzle::{PuzzleOutcome, PuzzleReport};
use crate::{Difficulty, GameDefinition};

/// Bonus for finishing a board game within `max_moves` total moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTier {
    /// Inclusive upper bound on total moves.
    pub max_moves: u32,
    /// Bonus XP.
    pub bonus: u32,
}

/// Bonus for completing a puzzle in under `under_secs` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTier {
    /// Exclusive upper bound on elapsed seconds.
    pub under_secs: u32,
    /// Bonus XP.
    pub bonus: u32,
}

/// Board game scoring constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardScoring {
    /// Flat award for a draw.
    pub draw_xp: u32,
    /// Speed tiers, checked in order; the first match applies.
    pub speed_tiers: Vec<MoveTier>,
}

impl Default for BoardScoring {
    fn default() -> Self {
        Self {
            draw_xp: 10,
            speed_tiers: vec![
                MoveTier {
                    max_moves: 5,
                    bonus: 15,
                },
                MoveTier {
                    max_moves: 7,
                    bonus: 10,
                },
                MoveTier {
                    max_moves: 9,
                    bonus: 5,
                },
            ],
        }
    }
}

/// Flat bonus per difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyBonus {
    /// Easy bonus.
    pub easy: u32,
    /// Medium bonus.
    pub medium: u32,
    /// Hard bonus.
    pub hard: u32,
}

impl DifficultyBonus {
    /// Bonus for `difficulty`.
    pub fn for_difficulty(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for DifficultyBonus {
    fn default() -> Self {
        Self {
            easy: 0,
            medium: 10,
            hard: 20,
        }
    }
}

/// Puzzle scoring constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleScoring {
    /// XP per word for a completed puzzle.
    pub word_xp: u32,
    /// XP per word for an abandoned puzzle.
    pub abandoned_word_xp: u32,
    /// Time tiers, checked in order; the first match applies.
    pub time_tiers: Vec<TimeTier>,
    /// Difficulty bonus for a completed puzzle.
    pub difficulty_bonus: DifficultyBonus,
}

impl Default for PuzzleScoring {
    fn default() -> Self {
        Self {
            word_xp: 10,
            abandoned_word_xp: 5,
            time_tiers: vec![
                TimeTier {
                    under_secs: 60,
                    bonus: 25,
                },
                TimeTier {
                    under_secs: 120,
                    bonus: 15,
                },
                TimeTier {
                    under_secs: 180,
                    bonus: 10,
                },
            ],
            difficulty_bonus: DifficultyBonus::default(),
        }
    }
}

/// All scoring constants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Board game constants.
    pub board: BoardScoring,
    /// Puzzle constants.
    pub puzzle: PuzzleScoring,
}

/// Scoring input taken from a terminal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub enum EngineReport {
    /// Finished board game.
    Board(BoardReport),
    /// Finished puzzle.
    Puzzle(PuzzleReport),
}

/// An XP award split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XpBreakdown {
    /// Base award: win base, draw consolation, or per-word credit.
    pub base: u32,
    /// Board speed bonus.
    pub speed_bonus: u32,
    /// Puzzle time bonus.
    pub time_bonus: u32,
    /// Puzzle difficulty bonus.
    pub difficulty_bonus: u32,
    /// Bonus for playing with teammates.
    pub multiplayer_bonus: u32,
}

impl XpBreakdown {
    /// Sum of all parts.
    pub fn total(&self) -> u32 {
        self.base
            .saturating_add(self.speed_bonus)
            .saturating_add(self.time_bonus)
            .saturating_add(self.difficulty_bonus)
            .saturating_add(self.multiplayer_bonus)
    }
}

/// Everything the policy looks at for one award.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    /// The game played.
    pub game: &'a GameDefinition,
    /// Engine result.
    pub report: &'a EngineReport,
    /// Number of distinct players on the roster.
    pub distinct_players: usize,
    /// Explicit exit; overrides everything else.
    pub cancelled: bool,
}

/// Converts play outcomes into XP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringPolicy {
    settings: ScoringSettings,
}

impl ScoringPolicy {
    /// Creates a policy from settings.
    pub fn new(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Computes the award for one session.
    #[instrument(skip(self, input), fields(game = %input.game.id(), cancelled = input.cancelled))]
    pub fn score(&self, input: &ScoreInput<'_>) -> XpBreakdown {
        if input.cancelled {
            debug!("Cancelled session earns nothing");
            return XpBreakdown::default();
        }
        let breakdown = match input.report {
            EngineReport::Board(report) => {
                self.score_board(input.game, report, input.distinct_players)
            }
            EngineReport::Puzzle(report) => self.score_puzzle(input.game, report),
        };
        debug!(?breakdown, total = breakdown.total(), "Scored session");
        breakdown
    }

    /// Board award: draw consolation, or base + speed tier + multiplayer bonus.
    pub fn score_board(
        &self,
        game: &GameDefinition,
        report: &BoardReport,
        distinct_players: usize,
    ) -> XpBreakdown {
        let board = &self.settings.board;
        match report.outcome {
            BoardOutcome::Draw => XpBreakdown {
                base: board.draw_xp,
                ..XpBreakdown::default()
            },
            BoardOutcome::Won(_) => XpBreakdown {
                base: *game.base_xp(),
                speed_bonus: board
                    .speed_tiers
                    .iter()
                    .find(|tier| report.move_count <= tier.max_moves)
                    .map_or(0, |tier| tier.bonus),
                multiplayer_bonus: if distinct_players > 1 {
                    *game.bonus_xp()
                } else {
                    0
                },
                ..XpBreakdown::default()
            },
            BoardOutcome::Undetermined => XpBreakdown::default(),
        }
    }

    /// Puzzle award: per-word credit + time tier + difficulty bonus when
    /// completed; reduced per-word credit only when abandoned.
    pub fn score_puzzle(&self, game: &GameDefinition, report: &PuzzleReport) -> XpBreakdown {
        let puzzle = &self.settings.puzzle;
        match report.outcome {
            PuzzleOutcome::Completed if report.words_found > 0 => XpBreakdown {
                base: report.words_found.saturating_mul(puzzle.word_xp),
                time_bonus: puzzle
                    .time_tiers
                    .iter()
                    .find(|tier| report.elapsed_secs < tier.under_secs)
                    .map_or(0, |tier| tier.bonus),
                difficulty_bonus: puzzle.difficulty_bonus.for_difficulty(*game.difficulty()),
                ..XpBreakdown::default()
            },
            PuzzleOutcome::Abandoned => XpBreakdown {
                base: report.words_found.saturating_mul(puzzle.abandoned_word_xp),
                ..XpBreakdown::default()
            },
            PuzzleOutcome::Completed | PuzzleOutcome::Active => XpBreakdown::default(),
        }
    }
}
