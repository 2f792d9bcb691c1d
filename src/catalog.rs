//! Static registry of playable games.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::games::board::Mark;

/// Difficulty tier of a game.
///
/// Drives puzzle layout (grid size and word list) and the puzzle
/// difficulty bonus.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small grid, short words.
    Easy,
    /// The default tier.
    #[default]
    Medium,
    /// Large grid, long words.
    Hard,
}

/// Which engine a game runs on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    /// Turn-based 3x3 board game.
    Board,
    /// Word-placement puzzle.
    Puzzle,
}

/// Immutable description of a playable game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameDefinition {
    /// Stable identifier (e.g. `tic-tac-toe`).
    id: String,
    /// Display name.
    name: String,
    /// Short description shown in listings.
    #[serde(default)]
    description: String,
    /// Difficulty tier.
    #[serde(default)]
    difficulty: Difficulty,
    /// Base XP awarded for a win.
    base_xp: u32,
    /// Flat bonus XP for playing with teammates.
    bonus_xp: u32,
    /// Maximum roster size, initiator included.
    max_players: usize,
    /// Category label (e.g. `Strategy`).
    #[serde(default)]
    category: String,
    /// Engine the game runs on.
    variant: GameVariant,
}

impl GameDefinition {
    /// Creates a new game definition.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        base_xp: u32,
        bonus_xp: u32,
        max_players: usize,
        category: impl Into<String>,
        variant: GameVariant,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            difficulty,
            base_xp,
            bonus_xp,
            max_players,
            category: category.into(),
            variant,
        }
    }

    /// Returns a copy of this definition at another difficulty tier.
    #[instrument(skip(self), fields(id = %self.id))]
    pub fn with_difficulty(&self, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..self.clone()
        }
    }

    /// Number of co-players that may be invited alongside the initiator.
    ///
    /// Board games seat one player per mark, whatever `max_players` says.
    pub fn invite_capacity(&self) -> usize {
        let seats = match self.variant {
            GameVariant::Board => self.max_players.min(Mark::ALL.len()),
            GameVariant::Puzzle => self.max_players,
        };
        seats.saturating_sub(1)
    }
}

/// Read-only list of game definitions supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCatalog {
    games: Vec<GameDefinition>,
}

impl GameCatalog {
    /// Creates a catalog from the given definitions.
    #[instrument(skip(games), fields(count = games.len()))]
    pub fn new(games: Vec<GameDefinition>) -> Self {
        debug!("Building game catalog");
        Self { games }
    }

    /// Looks up a game by id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<&GameDefinition> {
        let game = self.games.iter().find(|g| g.id == id);
        if game.is_none() {
            debug!(game_id = id, "Game not in catalog");
        }
        game
    }

    /// Returns true if the catalog contains the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.games.iter().any(|g| g.id == id)
    }

    /// All definitions in catalog order.
    pub fn games(&self) -> &[GameDefinition] {
        &self.games
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameCatalog {
    /// The two built-in games.
    fn default() -> Self {
        Self::new(vec![
            GameDefinition::new(
                "tic-tac-toe",
                "Tic-Tac-Toe",
                "Classic 3x3 strategy game",
                Difficulty::Easy,
                25,
                10,
                2,
                "Strategy",
                GameVariant::Board,
            ),
            GameDefinition::new(
                "word-search",
                "Word Search",
                "Find the words hidden in the grid",
                Difficulty::Medium,
                30,
                20,
                4,
                "Words",
                GameVariant::Puzzle,
            ),
        ])
    }
}
