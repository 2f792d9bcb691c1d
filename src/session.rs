//! Single-session state machine.
//!
//! The controller owns at most one [`GameSession`]. Solo play goes
//! `Idle → Active → Idle`; multiplayer goes through `InvitePending` first.
//! Starting and terminal phases are transient and only show up in logs.
//! Every state change is a direct response to a call on the controller, and
//! the completion sink hears about each session exactly once.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::games::board::{BoardOutcome, BoardState, Mark, MoveError};
use crate::games::puzzle::{
    Coord, PuzzleOutcome, PuzzleSettings, PuzzleState, SelectError, SelectionOutcome, generate,
};
use crate::invitation::{Directory, InvitationRequest, InviteError, Toggle};
use crate::scoring::{EngineReport, ScoreInput, ScoringPolicy, XpBreakdown};
use crate::{GameCatalog, GameDefinition, GameVariant, Player, PlayerId};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Solo or multiplayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// One player.
    Solo,
    /// Roster finalized through an invitation.
    Multiplayer {
        /// Player who sent the invitation.
        initiator: PlayerId,
    },
}

/// Engine state of a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Board game.
    Board(BoardState),
    /// Word puzzle.
    Puzzle(PuzzleState),
}

impl EngineState {
    /// Variant of this engine.
    pub fn variant(&self) -> GameVariant {
        match self {
            EngineState::Board(_) => GameVariant::Board,
            EngineState::Puzzle(_) => GameVariant::Puzzle,
        }
    }

    /// Scoring input, once the engine is terminal.
    pub fn report(&self) -> Option<EngineReport> {
        match self {
            EngineState::Board(state) => state.report().map(EngineReport::from),
            EngineState::Puzzle(state) => state.report().map(EngineReport::from),
        }
    }

    /// Raw metric as it stands now.
    fn metric(&self) -> RawMetric {
        match self {
            EngineState::Board(state) => RawMetric::Moves(state.move_count()),
            EngineState::Puzzle(state) => RawMetric::Puzzle {
                elapsed_secs: state.elapsed_secs(),
                words_found: state.found_words().len() as u32,
                total_words: state.placed_words().len() as u32,
            },
        }
    }
}

/// A live game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSession {
    /// Session ID.
    id: SessionId,
    /// Game being played.
    game: GameDefinition,
    /// Roster; position 0 is the current user and plays mark `A`.
    players: Vec<Player>,
    /// Solo or multiplayer.
    mode: SessionMode,
    /// Engine state.
    engine: EngineState,
    /// When the session started.
    started_at: DateTime<Utc>,
}

impl GameSession {
    /// Player holding `mark` on the board, if the roster has one.
    pub fn player_for(&self, mark: Mark) -> Option<&Player> {
        self.players.get(mark.roster_index())
    }

    /// Number of distinct players on the roster.
    pub fn distinct_players(&self) -> usize {
        self.players.iter().map(|p| p.id()).collect::<HashSet<_>>().len()
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Board game won by the given mark.
    Winner(Mark),
    /// Board game drawn.
    Draw,
    /// Puzzle solved.
    Completed,
    /// Puzzle given up.
    Abandoned,
}

impl Outcome {
    /// Terminal outcome carried by an engine report.
    pub fn from_report(report: &EngineReport) -> Option<Self> {
        match report {
            EngineReport::Board(r) => match r.outcome {
                BoardOutcome::Won(mark) => Some(Outcome::Winner(mark)),
                BoardOutcome::Draw => Some(Outcome::Draw),
                BoardOutcome::Undetermined => None,
            },
            EngineReport::Puzzle(r) => match r.outcome {
                PuzzleOutcome::Completed => Some(Outcome::Completed),
                PuzzleOutcome::Abandoned => Some(Outcome::Abandoned),
                PuzzleOutcome::Active => None,
            },
        }
    }
}

/// Raw performance numbers of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawMetric {
    /// Board game: total moves.
    Moves(u32),
    /// Puzzle: clock and words.
    Puzzle {
        /// Seconds elapsed.
        elapsed_secs: u32,
        /// Words found.
        words_found: u32,
        /// Words placed.
        total_words: u32,
    },
}

/// Final record of one session, handed to the completion sink.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameResult {
    /// Session ID.
    session_id: SessionId,
    /// Catalog id of the game.
    game_id: String,
    /// Display name of the game.
    game_name: String,
    /// Solo or multiplayer.
    mode: SessionMode,
    /// Final roster.
    players: Vec<Player>,
    /// Terminal outcome; `None` when cancelled mid-game.
    outcome: Option<Outcome>,
    /// Raw performance numbers.
    metric: RawMetric,
    /// Award detail.
    breakdown: XpBreakdown,
    /// Total XP awarded.
    xp_earned: u32,
    /// Ended through an explicit exit.
    cancelled: bool,
    /// When the session ended.
    finished_at: DateTime<Utc>,
}

impl GameResult {
    /// Roster entry of the board winner, if any.
    pub fn winner(&self) -> Option<&Player> {
        match self.outcome {
            Some(Outcome::Winner(mark)) => self.players.get(mark.roster_index()),
            _ => None,
        }
    }

    /// One-line summary for a notification.
    pub fn summary(&self) -> String {
        if self.cancelled {
            return format!("{}: exited, no XP awarded", self.game_name);
        }
        let what = match self.outcome {
            Some(Outcome::Winner(mark)) => match self.winner() {
                Some(player) => format!("{} ({}) wins", player.display_name(), mark),
                None => format!("Player {} wins", mark),
            },
            Some(Outcome::Draw) => "draw".to_string(),
            Some(Outcome::Completed) => "all words found".to_string(),
            Some(Outcome::Abandoned) => "gave up".to_string(),
            None => "ended".to_string(),
        };
        let detail = match self.metric {
            RawMetric::Moves(moves) => format!("{} moves", moves),
            RawMetric::Puzzle {
                elapsed_secs,
                words_found,
                total_words,
            } => format!(
                "{}/{} words in {}:{:02}",
                words_found,
                total_words,
                elapsed_secs / 60,
                elapsed_secs % 60
            ),
        };
        format!(
            "{}: {}, {} (+{} XP)",
            self.game_name, what, detail, self.xp_earned
        )
    }
}

/// Downstream collaborators of the controller.
pub trait CompletionSink {
    /// Called exactly once per session, right after it ends.
    fn on_game_end(&mut self, result: &GameResult);

    /// Called once when an invitation is confirmed, before the session starts.
    fn on_invite(&mut self, _request: &InvitationRequest) {}
}

impl<T: CompletionSink + ?Sized> CompletionSink for &mut T {
    fn on_game_end(&mut self, result: &GameResult) {
        (**self).on_game_end(result);
    }

    fn on_invite(&mut self, request: &InvitationRequest) {
        (**self).on_invite(request);
    }
}

impl CompletionSink for Vec<GameResult> {
    fn on_game_end(&mut self, result: &GameResult) {
        self.push(result.clone());
    }
}

/// Errors raised by controller operations. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum SessionError {
    /// No catalog entry with this id.
    #[display("Unknown game: {}", _0)]
    UnknownGame(String),

    /// A session or invitation is already in progress.
    #[display("A session is already in progress")]
    Busy,

    /// No live session.
    #[display("No active session")]
    NoActiveSession,

    /// No invitation is pending.
    #[display("No pending invitation")]
    NoPendingInvite,

    /// The operation belongs to the other game variant.
    #[display("Active session is not a {} game", expected)]
    WrongVariant {
        /// Variant the operation needs.
        expected: GameVariant,
    },

    /// Illegal board move.
    #[from]
    #[display("Illegal move: {}", _0)]
    Move(MoveError),

    /// Rejected puzzle selection.
    #[from]
    #[display("Rejected selection: {}", _0)]
    Select(SelectError),

    /// Invitation problem.
    #[from]
    #[display("Invitation: {}", _0)]
    Invite(InviteError),

    /// The report does not describe the session's terminal engine.
    #[display("Engine report does not match the session's engine state")]
    ReportMismatch,
}

impl std::error::Error for SessionError {}

/// Outcome of a user event on the active engine.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Turn<T> {
    /// The session goes on.
    Continue(T),
    /// The session ended with this result.
    Finished(GameResult),
}

/// Observable controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, derive_more::IsVariant)]
pub enum SessionPhase {
    /// Nothing going on.
    Idle,
    /// Picking co-players.
    InvitePending,
    /// A session is live.
    Active,
}

#[derive(Debug)]
enum Phase {
    Idle,
    InvitePending(InvitationRequest),
    Active(GameSession),
}

/// Drives sessions from catalog selection to the completion sink.
///
/// `R` is the randomness source for puzzle generation; seed it for
/// reproducible grids.
#[derive(Debug)]
pub struct SessionController<K, R = Pcg64> {
    catalog: GameCatalog,
    policy: ScoringPolicy,
    puzzle: PuzzleSettings,
    current_user: Player,
    sink: K,
    rng: R,
    phase: Phase,
    sessions_started: u64,
}

impl<K: CompletionSink, R: Rng> SessionController<K, R> {
    /// Creates an idle controller with default scoring and puzzle settings.
    #[instrument(skip_all, fields(user = %current_user.id(), games = catalog.len()))]
    pub fn new(catalog: GameCatalog, current_user: Player, sink: K, rng: R) -> Self {
        info!("Creating SessionController");
        Self {
            catalog,
            policy: ScoringPolicy::default(),
            puzzle: PuzzleSettings::default(),
            current_user,
            sink,
            rng,
            phase: Phase::Idle,
            sessions_started: 0,
        }
    }

    /// Replaces the scoring policy.
    pub fn with_scoring(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the puzzle settings.
    pub fn with_puzzle_settings(mut self, puzzle: PuzzleSettings) -> Self {
        self.puzzle = puzzle;
        self
    }

    /// The game catalog.
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// The signed-in player.
    pub fn current_user(&self) -> &Player {
        &self.current_user
    }

    /// The completion sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutable access to the completion sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Consumes the controller, returning the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::Idle => SessionPhase::Idle,
            Phase::InvitePending(_) => SessionPhase::InvitePending,
            Phase::Active(_) => SessionPhase::Active,
        }
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&GameSession> {
        match &self.phase {
            Phase::Active(session) => Some(session),
            _ => None,
        }
    }

    /// The pending invitation, if any.
    pub fn invitation(&self) -> Option<&InvitationRequest> {
        match &self.phase {
            Phase::InvitePending(request) => Some(request),
            _ => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Idle => Ok(()),
            _ => {
                warn!(phase = %self.phase(), "Rejected start while busy");
                Err(SessionError::Busy)
            }
        }
    }

    fn lookup(&self, game_id: &str) -> Result<GameDefinition, SessionError> {
        self.catalog
            .get(game_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownGame(game_id.to_string()))
    }

    /// Starts a solo session of `game_id` for the current user.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] unless idle, [`SessionError::UnknownGame`] if
    /// the game is not in the catalog.
    #[instrument(skip(self))]
    pub fn start_solo(&mut self, game_id: &str) -> Result<SessionId, SessionError> {
        self.ensure_idle()?;
        let game = self.lookup(game_id)?;
        debug!("SoloStarting");
        let players = vec![self.current_user.clone()];
        Ok(self.begin(game, players, SessionMode::Solo))
    }

    /// Opens the invite flow for `game_id`, with candidates from `directory`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] unless idle, [`SessionError::UnknownGame`] if
    /// the game is not in the catalog.
    #[instrument(skip(self, directory))]
    pub fn request_invite<D: Directory + ?Sized>(
        &mut self,
        game_id: &str,
        directory: &D,
    ) -> Result<&InvitationRequest, SessionError> {
        self.ensure_idle()?;
        let game = self.lookup(game_id)?;
        let request = InvitationRequest::open(game, self.current_user.clone(), directory);
        self.phase = Phase::InvitePending(request);
        info!("InvitePending");
        self.invitation().ok_or(SessionError::NoPendingInvite)
    }

    fn pending_mut(&mut self) -> Result<&mut InvitationRequest, SessionError> {
        match &mut self.phase {
            Phase::InvitePending(request) => Ok(request),
            _ => Err(SessionError::NoPendingInvite),
        }
    }

    /// Toggles a candidate in the pending invitation.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPendingInvite`], or an unknown candidate.
    #[instrument(skip(self))]
    pub fn toggle_invitee(&mut self, player_id: &str) -> Result<Toggle, SessionError> {
        Ok(self.pending_mut()?.toggle(player_id)?)
    }

    /// Candidates of the pending invitation matching `term`; empty when no
    /// invitation is pending.
    pub fn invite_search(&self, term: &str) -> Vec<&Player> {
        self.invitation()
            .map(|request| request.search(term))
            .unwrap_or_default()
    }

    /// Returns true if the pending invitation can be confirmed.
    pub fn can_confirm_invite(&self) -> bool {
        self.invitation().is_some_and(InvitationRequest::can_confirm)
    }

    /// Confirms the pending invitation and starts the multiplayer session.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPendingInvite`], or
    /// [`InviteError::EmptySelection`] (the invitation stays pending).
    #[instrument(skip(self))]
    pub fn confirm_invite(&mut self) -> Result<SessionId, SessionError> {
        let roster = self.pending_mut()?.roster()?;
        let Phase::InvitePending(request) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return Err(SessionError::NoPendingInvite);
        };
        info!(players = roster.len(), "Invitation confirmed");
        self.sink.on_invite(&request);
        debug!("MultiplayerStarting");
        let mode = SessionMode::Multiplayer {
            initiator: request.initiator().id().clone(),
        };
        Ok(self.begin(request.game().clone(), roster, mode))
    }

    /// Drops the pending invitation.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPendingInvite`] if none is pending.
    #[instrument(skip(self))]
    pub fn cancel_invite(&mut self) -> Result<(), SessionError> {
        self.pending_mut()?;
        self.phase = Phase::Idle;
        info!("Invitation cancelled");
        Ok(())
    }

    /// Instantiates the engine and makes the session live.
    fn begin(&mut self, game: GameDefinition, players: Vec<Player>, mode: SessionMode) -> SessionId {
        debug_assert!(players.len() <= *game.max_players());
        let engine = match game.variant() {
            GameVariant::Board => EngineState::Board(BoardState::new()),
            GameVariant::Puzzle => {
                let layout = self.puzzle.layout(*game.difficulty());
                let puzzle = generate(
                    &layout.words,
                    layout.grid_size,
                    self.puzzle.placement_attempts,
                    &mut self.rng,
                );
                EngineState::Puzzle(PuzzleState::new(puzzle))
            }
        };

        self.sessions_started += 1;
        let id = format!("{}-{}", game.id(), self.sessions_started);
        info!(
            session_id = %id,
            game = %game.id(),
            players = players.len(),
            multiplayer = mode.is_multiplayer(),
            "Session started"
        );

        let report = engine.report();
        self.phase = Phase::Active(GameSession {
            id: id.clone(),
            game,
            players,
            mode,
            engine,
            started_at: Utc::now(),
        });

        if let Some(report) = report {
            warn!(session_id = %id, "Engine terminal at start");
            if let Err(e) = self.finish(Some(report), false) {
                warn!(session_id = %id, error = %e, "Failed to end session at start");
            }
        }
        id
    }

    fn active_mut(&mut self) -> Result<&mut GameSession, SessionError> {
        match &mut self.phase {
            Phase::Active(session) => Ok(session),
            _ => Err(SessionError::NoActiveSession),
        }
    }

    /// Places the current mark at `cell_index` (0-8).
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`], [`SessionError::WrongVariant`], or
    /// an illegal move; none of them change the board.
    #[instrument(skip(self))]
    pub fn play_cell(&mut self, cell_index: usize) -> Result<Turn<BoardOutcome>, SessionError> {
        let (outcome, report) = match &mut self.active_mut()?.engine {
            EngineState::Board(state) => {
                let outcome = state.apply_move(cell_index)?;
                (outcome, state.report())
            }
            EngineState::Puzzle(_) => {
                return Err(SessionError::WrongVariant {
                    expected: GameVariant::Board,
                });
            }
        };
        match report {
            Some(report) => Ok(Turn::Finished(self.on_engine_terminal(report.into())?)),
            None => Ok(Turn::Continue(outcome)),
        }
    }

    /// Adds a grid cell to the puzzle selection.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`], [`SessionError::WrongVariant`], or
    /// a rejected selection.
    #[instrument(skip(self))]
    pub fn select_cell(&mut self, coord: Coord) -> Result<Turn<SelectionOutcome>, SessionError> {
        let (outcome, report) = match &mut self.active_mut()?.engine {
            EngineState::Puzzle(state) => {
                let outcome = state.select(coord)?;
                (outcome, state.report())
            }
            EngineState::Board(_) => {
                return Err(SessionError::WrongVariant {
                    expected: GameVariant::Puzzle,
                });
            }
        };
        match report {
            Some(report) => Ok(Turn::Finished(self.on_engine_terminal(report.into())?)),
            None => Ok(Turn::Continue(outcome)),
        }
    }

    /// Drops the partial puzzle selection.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`] or [`SessionError::WrongVariant`].
    pub fn clear_selection(&mut self) -> Result<(), SessionError> {
        match &mut self.active_mut()?.engine {
            EngineState::Puzzle(state) => {
                state.clear_selection();
                debug!("Selection cleared");
                Ok(())
            }
            EngineState::Board(_) => Err(SessionError::WrongVariant {
                expected: GameVariant::Puzzle,
            }),
        }
    }

    /// One-second clock tick. Returns true if a puzzle clock advanced.
    pub fn tick(&mut self) -> bool {
        match &mut self.phase {
            Phase::Active(GameSession {
                engine: EngineState::Puzzle(state),
                ..
            }) if state.outcome().is_active() => {
                state.tick();
                true
            }
            _ => false,
        }
    }

    /// Gives up on the active puzzle; partial credit is still awarded.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`] or [`SessionError::WrongVariant`].
    #[instrument(skip(self))]
    pub fn give_up(&mut self) -> Result<GameResult, SessionError> {
        let report = match &mut self.active_mut()?.engine {
            EngineState::Puzzle(state) => {
                state.give_up()?;
                state.report()
            }
            EngineState::Board(_) => {
                return Err(SessionError::WrongVariant {
                    expected: GameVariant::Puzzle,
                });
            }
        };
        let report = report.ok_or(SessionError::Select(SelectError::NotActive))?;
        self.on_engine_terminal(report.into())
    }

    /// Explicit exit: ends the session with no XP.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`] unless a session is live.
    #[instrument(skip(self))]
    pub fn exit(&mut self) -> Result<GameResult, SessionError> {
        info!("Session cancelled by player");
        self.finish(None, true)
    }

    /// Scores a terminal engine report and ends the session.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveSession`] unless active,
    /// [`SessionError::WrongVariant`] if the report belongs to the other
    /// variant, or [`SessionError::ReportMismatch`] unless the report is
    /// exactly the engine's own terminal report. The session stays live on
    /// error.
    #[instrument(skip(self, report))]
    pub fn on_engine_terminal(&mut self, report: EngineReport) -> Result<GameResult, SessionError> {
        let session = self.active_mut()?;
        let expected = session.engine.variant();
        let matches = matches!(
            (&report, expected),
            (EngineReport::Board(_), GameVariant::Board)
                | (EngineReport::Puzzle(_), GameVariant::Puzzle)
        );
        if !matches {
            return Err(SessionError::WrongVariant { expected });
        }
        if session.engine.report() != Some(report) {
            warn!(?report, "Report rejected, engine disagrees");
            return Err(SessionError::ReportMismatch);
        }
        self.finish(Some(report), false)
    }

    /// Terminal phase: score, emit, return to idle.
    fn finish(
        &mut self,
        report: Option<EngineReport>,
        cancelled: bool,
    ) -> Result<GameResult, SessionError> {
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active(session) => session,
            other => {
                self.phase = other;
                return Err(SessionError::NoActiveSession);
            }
        };
        debug!(session_id = %session.id, "Terminal");

        let breakdown = match &report {
            Some(report) => self.policy.score(&ScoreInput {
                game: &session.game,
                report,
                distinct_players: session.distinct_players(),
                cancelled,
            }),
            None => XpBreakdown::default(),
        };
        let outcome = if cancelled {
            None
        } else {
            report.as_ref().and_then(Outcome::from_report)
        };

        let result = GameResult {
            metric: session.engine.metric(),
            session_id: session.id,
            game_id: session.game.id().clone(),
            game_name: session.game.name().clone(),
            mode: session.mode,
            players: session.players,
            outcome,
            breakdown,
            xp_earned: breakdown.total(),
            cancelled,
            finished_at: Utc::now(),
        };

        info!(
            session_id = %result.session_id,
            outcome = ?result.outcome,
            xp = result.xp_earned,
            cancelled,
            "Session ended"
        );
        self.sink.on_game_end(&result);
        Ok(result)
    }
}
