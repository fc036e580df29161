/// Game page controller: owns the session and turns each decoded server event
/// into board client calls.
use tracing::{debug, info, warn};

use crate::core::board_client::{BoardClient, ClientError, ErrorAction};
use crate::core::page::{ClickHandler, Coord, Document};
use crate::core::protocol::{JoinNotice, Parameters, PlayUpdate, ServerEvent, WinNotice};
use crate::core::session::{Identity, Session};
use crate::core::socket::Socket;

pub const MSG_JOINED: &str = "Joined game.";
pub const MSG_OPPONENT_JOINED: &str = "Opponent joined.";
pub const MSG_YOUR_TURN: &str = "Your turn.";
pub const MSG_OPPONENT_TURN: &str = "Opponent's turn.";
pub const MSG_SPECTATING: &str = "Spectating.";
pub const MSG_TIE: &str = "Tie!";
pub const MSG_WIN: &str = "You win!";
pub const MSG_LOSE: &str = "You lose!";

pub struct GameController<D, S> {
    client: BoardClient<D, S>,
    session: Session,
    on_click: ClickHandler,
}

impl<D: Document, S: Socket> GameController<D, S> {
    /// `on_click` is attached to the cells whenever it is our turn
    pub fn new(client: BoardClient<D, S>, session: Session, on_click: ClickHandler) -> Self {
        Self {
            client,
            session,
            on_click,
        }
    }

    pub fn client(&self) -> &BoardClient<D, S> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut BoardClient<D, S> {
        &mut self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The socket is up: ask for the game's parameters
    pub fn connected(&mut self) -> Result<(), ClientError> {
        info!(game = %self.session.game(), "connected; requesting parameters");
        self.client.request_parameters(&self.session)
    }

    /// Send a move for the clicked cell
    pub fn play(&mut self, mv: Coord) -> Result<(), ClientError> {
        debug!(%mv, "cell clicked");
        self.client.play(&self.session, mv)
    }

    /// A seated player whose join was refused may try again
    pub fn can_rejoin(&self) -> bool {
        !self.session.is_spectating() && self.session.identity().is_none()
    }

    /// Join again under `identity` after a refusal
    pub fn rejoin(&mut self, identity: Identity) -> Result<(), ClientError> {
        if !self.can_rejoin() {
            return Ok(());
        }
        info!(%identity, "rejoining");
        self.session.set_identity(identity);
        self.client.join(&self.session)
    }

    /// Decode and react to one inbound event
    pub fn dispatch(&mut self, event: ServerEvent) -> Result<(), ClientError> {
        match event {
            ServerEvent::Parameters(params) => self.on_parameters(params),
            ServerEvent::Joined(notice) => self.on_joined(notice),
            ServerEvent::Play(update) => self.on_play(update),
            ServerEvent::Win(notice) => self.on_win(notice),
            ServerEvent::Error(payload) => {
                let action = self.client.handle_error(&mut self.session, &payload)?;
                if action == ErrorAction::ResetIdentity {
                    self.client.disable_board_input();
                }
                if action != ErrorAction::Display {
                    warn!(error = %payload.error, ?action, "server error handled");
                }
                Ok(())
            }
            ServerEvent::Unknown(name) => {
                debug!(event = %name, "ignoring unhandled event");
                Ok(())
            }
        }
    }

    fn on_parameters(&mut self, params: Parameters) -> Result<(), ClientError> {
        self.client.mount_board(params.board_size)?;
        if self.session.is_spectating() {
            self.client.set_message(MSG_SPECTATING)?;
            self.client.view(&self.session)
        } else {
            self.client.join(&self.session)
        }
    }

    fn on_joined(&mut self, notice: JoinNotice) -> Result<(), ClientError> {
        if self.session.is_me(notice.identity.as_ref()) {
            self.session.set_player_index(notice.player_index);
            self.client.set_message(MSG_JOINED)?;
        } else {
            self.client.set_message(MSG_OPPONENT_JOINED)?;
        }
        Ok(())
    }

    fn on_play(&mut self, update: PlayUpdate) -> Result<(), ClientError> {
        self.client.render_board(&update.board)?;

        if self.session.is_spectating() {
            self.client.set_message(MSG_SPECTATING)?;
        } else if self.session.is_me(update.to_move.as_ref()) {
            self.client.set_message(MSG_YOUR_TURN)?;
            self.client.enable_board_input(self.on_click.clone());
            return Ok(());
        } else {
            self.client.set_message(MSG_OPPONENT_TURN)?;
        }

        self.client.disable_board_input();
        Ok(())
    }

    fn on_win(&mut self, notice: WinNotice) -> Result<(), ClientError> {
        let text = match &notice.winner {
            None => MSG_TIE.to_string(),
            Some(winner) if self.session.is_spectating() => format!("{winner} wins!"),
            Some(_) if self.session.is_me(notice.winner.as_ref()) => MSG_WIN.to_string(),
            Some(_) => MSG_LOSE.to_string(),
        };
        info!(winner = ?notice.winner, "game over");
        self.client.disable_board_input();
        self.client.set_message(&text)?;
        Ok(())
    }
}
