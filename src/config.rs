use std::path::PathBuf;

use crate::core::protocol::IdentityScheme;
use crate::core::session::{GameRef, Identity, Session};

/// Everything the client needs to connect and take part in one game
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub game: GameRef,
    pub identity: Identity,
    pub scheme: IdentityScheme,
    pub spectate: bool,
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn session(&self) -> Session {
        if self.spectate {
            Session::spectator(self.game.clone())
        } else {
            Session::new(self.identity.clone(), self.game.clone())
        }
    }

    /// Page location the game is played at
    pub fn location(&self) -> String {
        format!("/play/{}", self.game)
    }
}
