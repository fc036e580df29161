/// Event names, payload shapes and error kinds spoken with the game server.
///
/// The server has shipped three naming conventions for the identity and game
/// fields; [`IdentityScheme`] picks one and everything else is shared.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::page::Coord;
use crate::core::session::{GameRef, Identity};

pub mod events {
    pub const PARAMETERS: &str = "parameters";
    pub const VIEW: &str = "view";
    pub const JOIN: &str = "join";
    pub const PLAY: &str = "play";
    pub const WIN: &str = "win";
    pub const ERROR: &str = "error";
}

/// Error text the server sends when a join is rejected
pub const JOIN_REFUSED: &str = "Could not join game.";

/// Where the client goes when its game does not exist
pub const ROOT_LOCATION: &str = "/";

pub type Board = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScheme {
    /// `player_name` + `game_id`; play events carry no identity
    PlayerName,
    /// `player_id` + `game_uuid`
    PlayerId,
    /// `player_uuid` + `game_uuid`
    #[default]
    PlayerUuid,
}

impl IdentityScheme {
    pub fn identity_field(self) -> &'static str {
        match self {
            IdentityScheme::PlayerName => "player_name",
            IdentityScheme::PlayerId => "player_id",
            IdentityScheme::PlayerUuid => "player_uuid",
        }
    }

    pub fn game_field(self) -> &'static str {
        match self {
            IdentityScheme::PlayerName => "game_id",
            IdentityScheme::PlayerId | IdentityScheme::PlayerUuid => "game_uuid",
        }
    }

    /// Error text for a game reference the server does not know
    pub fn missing_game_error(self) -> &'static str {
        match self {
            IdentityScheme::PlayerName => "No game with game_id.",
            IdentityScheme::PlayerId | IdentityScheme::PlayerUuid => "No game with game_uuid.",
        }
    }

    /// The name scheme relies on the server binding identity to the socket
    pub fn play_carries_identity(self) -> bool {
        !matches!(self, IdentityScheme::PlayerName)
    }

    pub fn join_payload(self, identity: &Identity, player_type: PlayerType, game: &GameRef) -> Value {
        let mut map = Map::new();
        map.insert(self.identity_field().into(), identity.as_str().into());
        map.insert("player_type".into(), player_type.as_str().into());
        map.insert(self.game_field().into(), game.as_str().into());
        Value::Object(map)
    }

    pub fn play_payload(self, identity: Option<&Identity>, mv: Coord) -> Value {
        let mut map = Map::new();
        if self.play_carries_identity() {
            if let Some(identity) = identity {
                map.insert(self.identity_field().into(), identity.as_str().into());
            }
        }
        map.insert("move".into(), move_value(mv));
        Value::Object(map)
    }

    /// Payload for `parameters` and `view`, which only name the game
    pub fn game_payload(self, game: &GameRef) -> Value {
        let mut map = Map::new();
        map.insert(self.game_field().into(), game.as_str().into());
        Value::Object(map)
    }
}

/// Moves go out as `[x, y]`; the server indexes boards as `board[y][x]`
pub fn move_value(mv: Coord) -> Value {
    Value::Array(vec![mv.col.into(), mv.row.into()])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    #[default]
    Human,
    Ai,
}

impl PlayerType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerType::Human => "human",
            PlayerType::Ai => "ai",
        }
    }
}

/// Closed set of server errors the client reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    NoSuchGame,
    JoinRefused,
    Other(String),
}

impl ServerError {
    pub fn classify(scheme: IdentityScheme, text: &str) -> Self {
        if text == scheme.missing_game_error() {
            ServerError::NoSuchGame
        } else if text == JOIN_REFUSED {
            ServerError::JoinRefused
        } else {
            ServerError::Other(text.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Game settings, as answered to a `parameters` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub board_size: usize,
    #[serde(default)]
    pub block_count: Option<usize>,
    #[serde(default)]
    pub line_up_size: Option<usize>,
    #[serde(default)]
    pub max_time: Option<f64>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinNotice {
    pub identity: Option<Identity>,
    pub player_type: Option<PlayerType>,
    pub player_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayUpdate {
    /// Player whose turn it is, absent once nobody is to move
    pub to_move: Option<Identity>,
    pub board: Board,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinNotice {
    /// `None` on a tie
    pub winner: Option<Identity>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Parameters(Parameters),
    Joined(JoinNotice),
    Play(PlayUpdate),
    Win(WinNotice),
    Error(ErrorPayload),
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("`{event}` payload is not an object")]
    NotAnObject { event: String },
    #[error("`{event}` payload is missing `{field}`")]
    MissingField { event: String, field: &'static str },
    #[error("malformed `{event}` payload: {source}")]
    Malformed {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServerEvent {
    /// Decode one inbound event. Any payload carrying an `error` string is an
    /// error, whatever event it arrived on.
    pub fn decode(scheme: IdentityScheme, name: &str, payload: &Value) -> Result<Self, ProtocolError> {
        if let Some(error) = payload.get("error").and_then(Value::as_str) {
            return Ok(ServerEvent::Error(ErrorPayload::new(error)));
        }

        let known = [events::PARAMETERS, events::JOIN, events::PLAY, events::WIN];
        if !known.contains(&name) {
            return Ok(ServerEvent::Unknown(name.to_string()));
        }

        let Some(fields) = payload.as_object() else {
            return Err(ProtocolError::NotAnObject { event: name.to_string() });
        };
        let identity_at = |field: &str| {
            fields.get(field).and_then(Value::as_str).map(Identity::new)
        };
        let malformed = |source: serde_json::Error| ProtocolError::Malformed {
            event: name.to_string(),
            source,
        };

        let event = match name {
            events::PARAMETERS => {
                ServerEvent::Parameters(serde_json::from_value(payload.clone()).map_err(malformed)?)
            }
            events::JOIN => ServerEvent::Joined(JoinNotice {
                identity: identity_at(scheme.identity_field()),
                player_type: fields
                    .get("player_type")
                    .and_then(|v| serde_json::from_value(v.clone()).ok()),
                player_index: fields
                    .get("player_index")
                    .and_then(Value::as_u64)
                    .map(|i| i as usize),
            }),
            events::PLAY => {
                let board = fields.get("emoji_board").ok_or_else(|| ProtocolError::MissingField {
                    event: name.to_string(),
                    field: "emoji_board",
                })?;
                ServerEvent::Play(PlayUpdate {
                    to_move: identity_at(scheme.identity_field()),
                    board: serde_json::from_value(board.clone()).map_err(malformed)?,
                })
            }
            _ => ServerEvent::Win(WinNotice {
                winner: identity_at(scheme.identity_field()),
            }),
        };

        Ok(event)
    }
}
