#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use lineup::core::board_client::BoardClient;
use lineup::core::page::{ClickHandler, Coord, Page};
use lineup::core::protocol::IdentityScheme;
use lineup::core::session::{GameRef, Identity, Session};
use lineup::core::socket::{Socket, SocketError};
use serde_json::Value;

pub const GAME: &str = "g-1";
pub const ME: &str = "p1";
pub const OPPONENT: &str = "p2";

/// Socket that keeps every emitted event for inspection
#[derive(Debug, Default)]
pub struct RecordingSocket {
    pub emitted: Vec<(String, Value)>,
    pub closed: bool,
}

impl RecordingSocket {
    pub fn events(&self) -> Vec<&str> {
        self.emitted.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn last(&self) -> Option<&(String, Value)> {
        self.emitted.last()
    }
}

impl Socket for RecordingSocket {
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SocketError> {
        if self.closed {
            return Err(SocketError::Closed);
        }
        self.emitted.push((event.to_string(), payload));
        Ok(())
    }
}

pub fn client(scheme: IdentityScheme) -> BoardClient<Page, RecordingSocket> {
    BoardClient::new(Page::new(format!("/play/{GAME}")), RecordingSocket::default(), scheme)
}

/// Client with an empty `size` x `size` board already mounted
pub fn mounted_client(size: usize) -> BoardClient<Page, RecordingSocket> {
    let mut client = client(IdentityScheme::PlayerUuid);
    client.mount_board(size).unwrap();
    client
}

pub fn player_session() -> Session {
    Session::new(Identity::new(ME), GameRef::new(GAME))
}

/// Click handler that records the coordinates it was called with
pub fn click_recorder() -> (ClickHandler, Arc<Mutex<Vec<Coord>>>) {
    let clicked = Arc::new(Mutex::new(Vec::new()));
    let sink = clicked.clone();
    let handler: ClickHandler = Arc::new(move |c| sink.lock().unwrap().push(c));
    (handler, clicked)
}

pub fn board(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}
