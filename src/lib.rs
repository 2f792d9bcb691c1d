//! TeamQuest games - mini-game engine for team gamification
//!
//! Players pick a game from a catalog, play it alone or with invited
//! teammates, and earn XP when the session ends.
//!
//! # Architecture
//!
//! - **Catalog**: static registry of playable games
//! - **Games**: a 3x3 board game and a word-search puzzle
//! - **Scoring**: pure mapping from a finished game to an XP award
//! - **Invitation**: co-player selection bounded by game capacity
//! - **Session**: single-session state machine that ties them together
//! - **Ledger**: profile progression fed by finished sessions
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_pcg::Pcg64;
//! use teamquest_games::{GameCatalog, GameResult, Player, SessionController, Turn};
//!
//! let me = Player::new("me".to_string(), "Me".to_string());
//! let mut controller = SessionController::new(
//!     GameCatalog::default(),
//!     me,
//!     Vec::<GameResult>::new(),
//!     Pcg64::seed_from_u64(7),
//! );
//! controller.start_solo("tic-tac-toe")?;
//! for cell in [0, 3, 1, 4] {
//!     controller.play_cell(cell)?;
//! }
//! let Turn::Finished(result) = controller.play_cell(2)? else {
//!     unreachable!()
//! };
//! assert_eq!(*result.xp_earned(), 40);
//! # Ok::<(), teamquest_games::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod games;
pub mod invitation;
pub mod ledger;
pub mod player;
pub mod scoring;
pub mod session;

// Crate-level exports - Catalog
pub use catalog::{Difficulty, GameCatalog, GameDefinition, GameVariant};

// Crate-level exports - Players
pub use player::{Player, PlayerId};

// Crate-level exports - Configuration
pub use config::{ConfigError, Settings};

// Crate-level exports - Scoring
pub use scoring::{EngineReport, ScoreInput, ScoringPolicy, ScoringSettings, XpBreakdown};

// Crate-level exports - Invitations
pub use invitation::{Directory, InvitationRequest, InviteError, Toggle};

// Crate-level exports - Sessions
pub use session::{
    CompletionSink, EngineState, GameResult, GameSession, Outcome, RawMetric, SessionController,
    SessionError, SessionId, SessionMode, SessionPhase, Turn,
};

// Crate-level exports - Profile ledger
pub use ledger::{Achievement, GameTally, LedgerError, LevelInfo, ProfileLedger};

// Crate-level exports - Game engines
pub use games::board::{BoardOutcome, BoardReport, BoardState, Mark, MoveError, Position};
pub use games::puzzle::{
    Coord, Grid, PuzzleOutcome, PuzzleReport, PuzzleSettings, PuzzleState, SelectError,
    SelectionOutcome,
};
