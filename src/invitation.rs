//! Picking co-players for a multiplayer session.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{GameDefinition, Player};

/// Source of eligible co-players (the team directory).
pub trait Directory {
    /// Current roster of teammates. May include the initiator.
    fn roster(&self) -> Vec<Player>;
}

impl Directory for Vec<Player> {
    fn roster(&self) -> Vec<Player> {
        self.clone()
    }
}

impl Directory for [Player] {
    fn roster(&self) -> Vec<Player> {
        self.to_vec()
    }
}

/// Error raised when confirming an invitation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum InviteError {
    /// No co-player selected.
    #[display("Select at least one teammate to invite")]
    EmptySelection,

    /// The player is not among the invitable candidates.
    #[display("Player {} is not an invitable teammate", _0)]
    UnknownCandidate(String),

    /// More co-players selected than the game has room for.
    #[display("{} teammates selected, the game has room for {}", selected, capacity)]
    OverCapacity {
        /// Co-players the game allows.
        capacity: usize,
        /// Co-players selected.
        selected: usize,
    },

    /// The selection names the initiator or the same player twice.
    #[display("Player {} cannot be invited here", _0)]
    InvalidInvitee(String),
}

impl std::error::Error for InviteError {}

/// Effect of toggling a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Toggle {
    /// Player added to the selection.
    Added,
    /// Player removed from the selection.
    Removed,
    /// Selection already full; unchanged.
    CapacityExceeded,
}

/// Co-player selection for one game.
///
/// Selection order is kept so the confirmed roster lists invitees in the
/// order they were picked.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct InvitationRequest {
    /// Game being set up.
    game: GameDefinition,
    /// Player opening the invite flow.
    initiator: Player,
    /// Invitable teammates, initiator excluded.
    candidates: Vec<Player>,
    /// Teammates picked so far.
    selected: Vec<Player>,
}

impl InvitationRequest {
    /// Opens an invitation for `game`, drawing candidates from `directory`.
    #[instrument(skip_all, fields(game = %game.id(), initiator = %initiator.id()))]
    pub fn open<D: Directory + ?Sized>(
        game: GameDefinition,
        initiator: Player,
        directory: &D,
    ) -> Self {
        let candidates = selectable(directory.roster(), &initiator);
        info!(candidates = candidates.len(), "Invitation opened");
        Self {
            game,
            initiator,
            candidates,
            selected: Vec::new(),
        }
    }

    /// Toggles the candidate with id `player_id`.
    ///
    /// # Errors
    ///
    /// Returns [`InviteError::UnknownCandidate`] if no candidate has that id.
    #[instrument(skip(self), fields(selected = self.selected.len()))]
    pub fn toggle(&mut self, player_id: &str) -> Result<Toggle, InviteError> {
        let player = self
            .candidates
            .iter()
            .find(|p| p.id() == player_id)
            .ok_or_else(|| InviteError::UnknownCandidate(player_id.to_string()))?;
        Ok(toggle(&mut self.selected, player, &self.game))
    }

    /// Candidates matching `term` by name or title.
    pub fn search(&self, term: &str) -> Vec<&Player> {
        search(&self.candidates, term)
    }

    /// Returns true when confirmation is allowed.
    pub fn can_confirm(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Finalized roster: initiator first, then the selection.
    ///
    /// # Errors
    ///
    /// Returns [`InviteError::EmptySelection`] if nobody was selected.
    pub fn roster(&self) -> Result<Vec<Player>, InviteError> {
        confirm(&self.game, &self.initiator, &self.selected)
    }
}

/// Candidates minus the initiator, order kept, duplicate ids dropped.
#[instrument(skip_all, fields(initiator = %initiator.id()))]
pub fn selectable(candidates: Vec<Player>, initiator: &Player) -> Vec<Player> {
    let mut out: Vec<Player> = Vec::with_capacity(candidates.len());
    for player in candidates {
        if player.id() == initiator.id() || out.iter().any(|p| p.id() == player.id()) {
            continue;
        }
        out.push(player);
    }
    debug!(count = out.len(), "Selectable candidates");
    out
}

/// Case-insensitive match on display name or title; empty term matches all.
pub fn search<'a>(candidates: &'a [Player], term: &str) -> Vec<&'a Player> {
    let term = term.trim().to_lowercase();
    candidates
        .iter()
        .filter(|p| {
            term.is_empty()
                || p.display_name().to_lowercase().contains(&term)
                || p.title()
                    .as_ref()
                    .is_some_and(|t| t.to_lowercase().contains(&term))
        })
        .collect()
}

/// Removes `player` if selected, adds it if there is room, otherwise
/// leaves the selection alone.
#[instrument(skip_all, fields(player = %player.id(), max_players = *game.max_players()))]
pub fn toggle(selection: &mut Vec<Player>, player: &Player, game: &GameDefinition) -> Toggle {
    if let Some(idx) = selection.iter().position(|p| p.id() == player.id()) {
        selection.remove(idx);
        debug!("Player deselected");
        return Toggle::Removed;
    }
    if selection.len() >= game.invite_capacity() {
        debug!(capacity = game.invite_capacity(), "Selection full, toggle ignored");
        return Toggle::CapacityExceeded;
    }
    selection.push(player.clone());
    debug!("Player selected");
    Toggle::Added
}

/// Builds the roster `[initiator, ...selection]`, never larger than
/// `game.max_players`.
///
/// # Errors
///
/// Returns [`InviteError::EmptySelection`] if `selection` is empty,
/// [`InviteError::OverCapacity`] if it exceeds the game's invite capacity,
/// and [`InviteError::InvalidInvitee`] if it contains the initiator or a
/// repeated player.
#[instrument(skip_all, fields(game = %game.id(), selected = selection.len()))]
pub fn confirm(
    game: &GameDefinition,
    initiator: &Player,
    selection: &[Player],
) -> Result<Vec<Player>, InviteError> {
    if selection.is_empty() {
        warn!("Invitation confirmed with nobody selected");
        return Err(InviteError::EmptySelection);
    }
    let capacity = game.invite_capacity();
    if selection.len() > capacity {
        warn!(capacity, "Selection exceeds the game's capacity");
        return Err(InviteError::OverCapacity {
            capacity,
            selected: selection.len(),
        });
    }
    for (idx, player) in selection.iter().enumerate() {
        if player.id() == initiator.id() || selection[..idx].iter().any(|p| p.id() == player.id())
        {
            warn!(player = %player.id(), "Invalid invitee");
            return Err(InviteError::InvalidInvitee(player.id().clone()));
        }
    }
    let mut roster = Vec::with_capacity(selection.len() + 1);
    roster.push(initiator.clone());
    roster.extend(selection.iter().cloned());
    Ok(roster)
}
