//! Player references.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Unique identifier for a player.
pub type PlayerId = String;

/// Read-only reference to an identity owned by the profile collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, new)]
pub struct Player {
    /// Player's unique ID.
    id: PlayerId,
    /// Name shown on rosters.
    display_name: String,
    /// Avatar reference (URL or asset key).
    #[serde(default)]
    #[new(default)]
    avatar: Option<String>,
    /// Job title, matched by the invite search.
    #[serde(default)]
    #[new(default)]
    title: Option<String>,
}

impl Player {
    /// Sets the avatar reference.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Sets the job title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
