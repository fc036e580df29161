use std::path::PathBuf;

use clap::Parser;

use crate::config::ClientConfig;
use crate::core::protocol::IdentityScheme;
use crate::core::session::{GameRef, Identity};

#[derive(Parser, Debug)]
#[command(name = "lineup")]
#[command(about = "Terminal client for Line 'Em Up games")]
#[command(version)]
pub struct Cli {
    /// Game server URL (http://, https://, ws:// or wss://)
    #[arg(short, long, env = "LINEUP_URL", default_value = "http://127.0.0.1:5000")]
    pub url: String,

    /// Game to join
    #[arg(short, long)]
    pub game: String,

    /// Player identity; a fresh UUID when omitted
    #[arg(short, long)]
    pub name: Option<String>,

    /// Wire names used for the identity and game fields
    #[arg(long, value_enum, default_value_t = IdentityScheme::PlayerUuid)]
    pub scheme: IdentityScheme,

    /// Watch the game instead of joining it
    #[arg(long)]
    pub spectate: bool,

    /// Write logs to this file (the terminal belongs to the board)
    #[arg(long, env = "LINEUP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> ClientConfig {
        ClientConfig {
            url: self.url,
            game: GameRef::new(self.game),
            identity: self.name.map(Identity::new).unwrap_or_else(Identity::generate),
            scheme: self.scheme,
            spectate: self.spectate,
            log_file: self.log_file,
        }
    }
}
