/// Per-page session state, passed explicitly into every operation that reads
/// or changes who we are.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::protocol::PlayerType;

/// How the client names its player on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A fresh random identity, used when the player did not pick one
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Server-side id of the match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameRef(String);

impl GameRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    game: GameRef,
    player_type: PlayerType,
    player_index: Option<usize>,
    spectating: bool,
}

impl Session {
    /// A human player about to join `game` as `identity`
    pub fn new(identity: Identity, game: GameRef) -> Self {
        Self {
            identity: Some(identity),
            game,
            player_type: PlayerType::Human,
            player_index: None,
            spectating: false,
        }
    }

    /// Watch `game` without taking a seat
    pub fn spectator(game: GameRef) -> Self {
        Self {
            identity: None,
            game,
            player_type: PlayerType::Human,
            player_index: None,
            spectating: true,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Forget the identity so the next join starts fresh
    pub fn clear_identity(&mut self) {
        self.identity = None;
        self.player_index = None;
    }

    /// Whether `other` names this session's player
    pub fn is_me(&self, other: Option<&Identity>) -> bool {
        match (&self.identity, other) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    pub fn game(&self) -> &GameRef {
        &self.game
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    pub fn player_index(&self) -> Option<usize> {
        self.player_index
    }

    pub fn set_player_index(&mut self, index: Option<usize>) {
        self.player_index = index;
    }

    pub fn is_spectating(&self) -> bool {
        self.spectating
    }
}
