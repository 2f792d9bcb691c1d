//! Engine configuration, loaded from TOML.
//!
//! Every section is optional; missing values fall back to the built-in
//! catalog, scoring constants and puzzle layouts.

use std::collections::HashSet;
use std::path::Path;

use derive_more::{Display, Error};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::games::puzzle::PuzzleSettings;
use crate::scoring::{ScoringPolicy, ScoringSettings};
use crate::session::{CompletionSink, SessionController};
use crate::{Difficulty, GameCatalog, GameDefinition, Mark, Player};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TEAMQUEST_CONFIG";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed for reproducible puzzles.
    pub seed: Option<u64>,
    /// Signed-in player.
    pub user: Player,
    /// Playable games.
    pub catalog: Vec<GameDefinition>,
    /// Team directory used for invitations.
    pub team: Vec<Player>,
    /// Scoring constants.
    pub scoring: ScoringSettings,
    /// Puzzle generation settings.
    pub puzzle: PuzzleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            user: Player::new("me".to_string(), "You".to_string()),
            catalog: GameCatalog::default().games().to_vec(),
            team: vec![
                Player::new("ana".to_string(), "Ana Souza".to_string()).with_title("Designer"),
                Player::new("bruno".to_string(), "Bruno Lima".to_string()).with_title("Engineer"),
                Player::new("carla".to_string(), "Carla Reis".to_string())
                    .with_title("Product Manager"),
            ],
            scoring: ScoringSettings::default(),
            puzzle: PuzzleSettings::default(),
        }
    }
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!(games = settings.catalog.len(), "Settings loaded");
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads from `path`, else from `$TEAMQUEST_CONFIG`, else defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Checks the invariants the engine relies on.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::new("Catalog has no games".to_string()));
        }
        let mut ids = HashSet::new();
        for game in &self.catalog {
            if !ids.insert(game.id()) {
                return Err(ConfigError::new(format!("Duplicate game id: {}", game.id())));
            }
            if *game.max_players() == 0 {
                return Err(ConfigError::new(format!(
                    "Game {} must allow at least one player",
                    game.id()
                )));
            }
            if game.variant().is_board() && *game.max_players() > Mark::ALL.len() {
                return Err(ConfigError::new(format!(
                    "Board game {} allows at most {} players",
                    game.id(),
                    Mark::ALL.len()
                )));
            }
        }
        for difficulty in Difficulty::iter() {
            let layout = self.puzzle.layout(difficulty);
            if layout.grid_size == 0 {
                return Err(ConfigError::new(format!(
                    "Puzzle grid size for {} must be positive",
                    difficulty
                )));
            }
            if layout.words.iter().all(|w| w.trim().is_empty()) {
                return Err(ConfigError::new(format!(
                    "Puzzle word list for {} is empty",
                    difficulty
                )));
            }
        }
        Ok(())
    }

    /// Builds the catalog.
    pub fn game_catalog(&self) -> GameCatalog {
        GameCatalog::new(self.catalog.clone())
    }

    /// Builds a controller wired to `sink`, seeded from `seed` when set.
    #[instrument(skip(self, sink), fields(seed = ?self.seed))]
    pub fn controller<K: CompletionSink>(&self, sink: K) -> SessionController<K, Pcg64> {
        let rng = match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_os_rng(),
        };
        SessionController::new(self.game_catalog(), self.user.clone(), sink, rng)
            .with_scoring(ScoringPolicy::new(self.scoring.clone()))
            .with_puzzle_settings(self.puzzle.clone())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
