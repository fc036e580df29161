/// Terminal host for one game page: socket events in, keys in, frames out
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::websocket_client::{self, ChannelSocket, Inbound};
use crate::config::ClientConfig;
use crate::core::board_client::BoardClient;
use crate::core::controller::GameController;
use crate::core::page::{ClickHandler, Coord, Document, Page};
use crate::core::protocol::ServerEvent;
use crate::core::renderer::BoardRenderer;
use crate::core::session::{Identity, Session};
use crate::core::terminal::{BoardCursor, KeyAction};

const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub const MSG_CONNECTING: &str = "Connecting...";
pub const MSG_DISCONNECTED: &str = "Disconnected.";

type Controller = GameController<Page, ChannelSocket>;

/// How the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// The page was sent elsewhere, e.g. back to `/` when the game is gone
    Navigated(String),
}

pub async fn run(config: ClientConfig) -> Result<()> {
    let (socket, mut inbound_rx) = websocket_client::connect(&config.url).await?;

    let start = config.location();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Coord>();
    let on_click: ClickHandler = Arc::new(move |coord| {
        let _ = cmd_tx.send(coord);
    });

    let client = BoardClient::new(Page::new(start.clone()), socket, config.scheme);
    let mut controller = GameController::new(client, config.session(), on_click);
    controller.client_mut().set_message(MSG_CONNECTING)?;

    let mut terminal = ratatui::init();
    let mut cursor = BoardCursor::default();
    let mut render_timer = tokio::time::interval(RENDER_INTERVAL);

    let result: Result<Exit> = async {
        loop {
            // Non-blocking check for keyboard input
            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    let dims = controller.client().document().dimensions();
                    match cursor.handle_key(key, dims) {
                        KeyAction::Quit => break Ok(Exit::Quit),
                        KeyAction::Click(coord) => {
                            // Cells without a handler ignore the click
                            controller.client().document().click(&coord.cell_id());
                        }
                        KeyAction::Rejoin if controller.can_rejoin() => {
                            if let Err(e) = controller.rejoin(Identity::generate()) {
                                warn!(error = %e, "failed to rejoin");
                            }
                        }
                        KeyAction::Rejoin | KeyAction::Moved | KeyAction::Ignored => {}
                    }
                }
            }

            tokio::select! {
                Some(inbound) = inbound_rx.recv() => on_inbound(&mut controller, inbound),
                Some(coord) = cmd_rx.recv() => {
                    if let Err(e) = controller.play(coord) {
                        warn!(error = %e, %coord, "failed to send move");
                    }
                }
                _ = render_timer.tick() => {
                    let title = header(controller.session());
                    let page = controller.client().document();
                    terminal.draw(|f| BoardRenderer::render(f, page, cursor.position(), &title))?;
                }
            }

            let location = controller.client().document().location();
            if location != start {
                break Ok(Exit::Navigated(location.to_string()));
            }
        }
    }
    .await;

    ratatui::restore();

    let exit = result?;
    info!(?exit, "game loop finished");
    if let Some(message) = controller.client().document().message() {
        println!("{message}");
    }
    if let Exit::Navigated(location) = exit {
        println!("Left the game page for {location}");
    }
    Ok(())
}

/// Title line: game, who we are and which seat we hold
pub fn header(session: &Session) -> String {
    let game = session.game();
    if session.is_spectating() {
        return format!("Line 'Em Up: {game} (spectating)");
    }
    match (session.identity(), session.player_index()) {
        (Some(me), Some(index)) => format!("Line 'Em Up: {game} as {me} (player {})", index + 1),
        (Some(me), None) => format!("Line 'Em Up: {game} as {me}"),
        (None, _) => format!("Line 'Em Up: {game} (not joined, press J)"),
    }
}

fn on_inbound(controller: &mut Controller, inbound: Inbound) {
    let outcome = match inbound {
        Inbound::Connected => controller.connected(),
        Inbound::Event { name, payload } => {
            match ServerEvent::decode(controller.client().scheme(), &name, &payload) {
                Ok(event) => controller.dispatch(event),
                Err(e) => {
                    warn!(error = %e, event = %name, "dropping undecodable event");
                    Ok(())
                }
            }
        }
        Inbound::Disconnected(reason) => {
            warn!(?reason, "socket disconnected");
            controller.client_mut().disable_board_input();
            controller.client_mut().set_message(MSG_DISCONNECTED).map_err(Into::into)
        }
    };

    if let Err(e) = outcome {
        warn!(error = %e, "failed to apply server event");
    }
}
