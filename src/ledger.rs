//! Profile progression fed by finished sessions.
//!
//! [`ProfileLedger`] is the reference [`CompletionSink`]: it keeps the
//! running XP total, the derived level, per-game tallies and a short
//! achievement history, and persists them as a JSON snapshot.

use std::path::Path;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::session::{CompletionSink, GameResult};

/// Achievements kept in the history.
pub const MAX_ACHIEVEMENTS: usize = 20;

/// XP thresholds; reaching `LEVEL_THRESHOLDS[i]` means level `i + 2`.
const LEVEL_THRESHOLDS: [u32; 4] = [100, 250, 500, 1000];

/// Target shown once the top level is reached.
const TOP_LEVEL_TARGET: u32 = 1500;

/// Level derived from a running XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level, 1 to 5.
    pub level: u32,
    /// XP total targeted by the progress bar.
    pub next_level_xp: u32,
}

impl LevelInfo {
    /// Level for `total_xp`.
    pub fn for_xp(total_xp: u32) -> Self {
        let reached = LEVEL_THRESHOLDS
            .iter()
            .take_while(|threshold| total_xp >= **threshold)
            .count();
        Self {
            level: reached as u32 + 1,
            next_level_xp: LEVEL_THRESHOLDS
                .get(reached)
                .copied()
                .unwrap_or(TOP_LEVEL_TARGET),
        }
    }

    /// Returns true at level 5.
    pub fn is_max(&self) -> bool {
        self.level as usize > LEVEL_THRESHOLDS.len()
    }

    /// XP still missing to reach the target.
    pub fn remaining(&self, total_xp: u32) -> u32 {
        self.next_level_xp.saturating_sub(total_xp)
    }
}

/// One entry of the achievement history.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Achievement {
    /// Session that earned it.
    session_id: String,
    /// Game played.
    game_id: String,
    /// Notification text.
    summary: String,
    /// XP earned.
    xp: u32,
    /// When the session ended.
    earned_at: DateTime<Utc>,
}

/// Plays and XP for one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameTally {
    /// Catalog id.
    game_id: String,
    /// Display name.
    game_name: String,
    /// Credited sessions.
    plays: u32,
    /// XP earned in this game.
    xp: u32,
}

/// Running profile of the signed-in player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLedger {
    /// Total XP earned.
    total_xp: u32,
    /// Credited sessions.
    games_played: u32,
    /// Per-game tallies, in order of first play.
    tallies: Vec<GameTally>,
    /// Most recent first.
    achievements: Vec<Achievement>,
    /// Level reached by the last credited result, until taken.
    #[serde(skip)]
    #[getter(skip)]
    pending_level_up: Option<u32>,
}

impl ProfileLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level.
    pub fn level(&self) -> LevelInfo {
        LevelInfo::for_xp(self.total_xp)
    }

    /// Most played game; the earliest played wins a tie.
    pub fn favourite_game(&self) -> Option<&GameTally> {
        // max_by_key keeps the last maximum, so walk backwards.
        self.tallies.iter().rev().max_by_key(|tally| tally.plays)
    }

    /// Tally for `game_id`.
    pub fn tally(&self, game_id: &str) -> Option<&GameTally> {
        self.tallies.iter().find(|t| t.game_id == game_id)
    }

    /// Returns the level reached since the last call, if any.
    pub fn take_level_up(&mut self) -> Option<u32> {
        self.pending_level_up.take()
    }

    /// Credits one finished session. Returns the new level on a level-up.
    ///
    /// Cancelled sessions are ignored.
    #[instrument(skip(self, result), fields(session_id = %result.session_id(), xp = *result.xp_earned()))]
    pub fn record(&mut self, result: &GameResult) -> Option<u32> {
        if *result.cancelled() {
            debug!("Cancelled session not credited");
            return None;
        }
        let before = self.level().level;
        let xp = *result.xp_earned();

        self.total_xp = self.total_xp.saturating_add(xp);
        self.games_played += 1;

        match self.tallies.iter_mut().find(|t| t.game_id == *result.game_id()) {
            Some(tally) => {
                tally.plays += 1;
                tally.xp = tally.xp.saturating_add(xp);
            }
            None => self.tallies.push(GameTally {
                game_id: result.game_id().clone(),
                game_name: result.game_name().clone(),
                plays: 1,
                xp,
            }),
        }

        self.achievements.insert(
            0,
            Achievement {
                session_id: result.session_id().clone(),
                game_id: result.game_id().clone(),
                summary: result.summary(),
                xp,
                earned_at: *result.finished_at(),
            },
        );
        self.achievements.truncate(MAX_ACHIEVEMENTS);

        let after = self.level().level;
        info!(total_xp = self.total_xp, level = after, "Session credited");
        if after > before {
            info!(level = after, "Level up");
            self.pending_level_up = Some(after);
            return Some(after);
        }
        None
    }

    /// Reads a JSON snapshot.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LedgerError::new(format!("Failed to read ledger: {}", e)))?;
        let ledger: Self = serde_json::from_str(&content)
            .map_err(|e| LedgerError::new(format!("Failed to parse ledger: {}", e)))?;
        debug!(total_xp = ledger.total_xp, "Ledger loaded");
        Ok(ledger)
    }

    /// Reads a JSON snapshot, or starts empty if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!("No ledger file yet, starting empty");
            Ok(Self::default())
        }
    }

    /// Writes a JSON snapshot.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::new(format!("Failed to serialize ledger: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| LedgerError::new(format!("Failed to write ledger: {}", e)))?;
        info!(games_played = self.games_played, "Ledger saved");
        Ok(())
    }
}

impl CompletionSink for ProfileLedger {
    fn on_game_end(&mut self, result: &GameResult) {
        self.record(result);
    }
}

/// Ledger persistence error.
#[derive(Debug, Clone, Display, Error)]
#[display("Ledger error: {} at {}:{}", message, file, line)]
pub struct LedgerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LedgerError {
    /// Creates a new ledger error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
