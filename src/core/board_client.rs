/// Board client: renders boards and status text into a document and forwards
/// player actions over the socket. Holds no game state of its own; who the
/// player is lives in the `Session` each call is given.
use thiserror::Error;
use tracing::{debug, info};

use crate::core::page::{
    ClickHandler, Coord, Document, PageError, CELL_PREFIX, MESSAGE_ID, POINTER_CLASS,
};
use crate::core::protocol::{
    events, ErrorPayload, IdentityScheme, ProtocolError, ServerError, ROOT_LOCATION,
};
use crate::core::session::Session;
use crate::core::socket::{Socket, SocketError};

/// Smallest and largest board the server will create
pub const BOARD_SIZES: std::ops::RangeInclusive<usize> = 3..=10;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("emit failed: {0}")]
    Socket(#[from] SocketError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("session has no player identity")]
    NoIdentity,
}

/// What `handle_error` did besides showing the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorAction {
    Navigate(String),
    ResetIdentity,
    Display,
}

pub struct BoardClient<D, S> {
    document: D,
    socket: S,
    scheme: IdentityScheme,
}

impl<D: Document, S: Socket> BoardClient<D, S> {
    pub fn new(document: D, socket: S, scheme: IdentityScheme) -> Self {
        Self {
            document,
            socket,
            scheme,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    pub fn scheme(&self) -> IdentityScheme {
        self.scheme
    }

    /// Write every cell of `board` into its `game_board_<row>_<col>` node.
    /// Stops at the first cell with no node; cells before it stay written.
    pub fn render_board(&mut self, board: &[Vec<String>]) -> Result<(), PageError> {
        for (row, cells) in board.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                let id = Coord::new(row, col).cell_id();
                match self.document.get_element_by_id(&id) {
                    Some(node) => node.set_inner_html(value),
                    None => return Err(PageError::MissingNode(id)),
                }
            }
        }
        Ok(())
    }

    pub fn set_message(&mut self, text: &str) -> Result<(), PageError> {
        let node = self
            .document
            .get_element_by_id(MESSAGE_ID)
            .ok_or_else(|| PageError::MissingNode(MESSAGE_ID.to_string()))?;
        node.set_inner_text(text);
        Ok(())
    }

    /// React to a server-reported error, then show its text
    pub fn handle_error(&mut self, session: &mut Session, payload: &ErrorPayload) -> Result<ErrorAction, PageError> {
        let action = match ServerError::classify(self.scheme, &payload.error) {
            ServerError::NoSuchGame => {
                info!(game = %session.game(), "game does not exist; leaving page");
                self.document.replace_location(ROOT_LOCATION);
                ErrorAction::Navigate(ROOT_LOCATION.to_string())
            }
            ServerError::JoinRefused => {
                info!(identity = ?session.identity(), "join refused; dropping identity");
                session.clear_identity();
                ErrorAction::ResetIdentity
            }
            ServerError::Other(_) => ErrorAction::Display,
        };

        self.set_message(&payload.error)?;
        Ok(action)
    }

    pub fn join(&mut self, session: &Session) -> Result<(), ClientError> {
        let identity = session.identity().ok_or(ClientError::NoIdentity)?;
        let payload = self
            .scheme
            .join_payload(identity, session.player_type(), session.game());
        debug!(%payload, "emit join");
        self.socket.emit(events::JOIN, payload)?;
        Ok(())
    }

    /// Send a move. Schemes that name the mover refuse to send it anonymously.
    pub fn play(&mut self, session: &Session, mv: Coord) -> Result<(), ClientError> {
        if self.scheme.play_carries_identity() && session.identity().is_none() {
            return Err(ClientError::NoIdentity);
        }
        let payload = self.scheme.play_payload(session.identity(), mv);
        debug!(%payload, "emit play");
        self.socket.emit(events::PLAY, payload)?;
        Ok(())
    }

    /// Ask for the game's settings; the answer mounts the board
    pub fn request_parameters(&mut self, session: &Session) -> Result<(), ClientError> {
        self.socket
            .emit(events::PARAMETERS, self.scheme.game_payload(session.game()))?;
        Ok(())
    }

    /// Subscribe to a game's updates without taking a seat
    pub fn view(&mut self, session: &Session) -> Result<(), ClientError> {
        self.socket.emit(events::VIEW, self.scheme.game_payload(session.game()))?;
        Ok(())
    }

    /// Lay out an empty `size` x `size` board
    pub fn mount_board(&mut self, size: usize) -> Result<(), PageError> {
        if !BOARD_SIZES.contains(&size) {
            return Err(PageError::InvalidBoardSize(size));
        }
        self.document.mount_board(size, size);
        Ok(())
    }

    pub fn enable_board_input(&mut self, handler: ClickHandler) {
        self.document.for_each_with_prefix(CELL_PREFIX, &mut |node| {
            node.set_onclick(Some(handler.clone()));
            node.add_class(POINTER_CLASS);
        });
    }

    pub fn disable_board_input(&mut self) {
        self.document.for_each_with_prefix(CELL_PREFIX, &mut |node| {
            node.set_onclick(None);
            node.remove_class(POINTER_CLASS);
        });
    }
}
