/// WebSocket transport for the game server's Socket.IO endpoint
use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

use crate::client::socketio::{socket_url, EnginePacket, FrameError, SocketPacket};
use crate::core::socket::{Socket, SocketError};

/// What the reader task hands to the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Namespace connect acknowledged; events may flow
    Connected,
    Event { name: String, payload: Value },
    /// Socket gone, with the reason when one is known
    Disconnected(Option<String>),
}

/// Emits by queueing frames for the writer task
#[derive(Debug, Clone)]
pub struct ChannelSocket {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSocket {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Socket for ChannelSocket {
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SocketError> {
        let frame = EnginePacket::Message(SocketPacket::event(event, payload)).encode();
        self.tx.send(frame).map_err(|_| SocketError::Closed)
    }
}

/// Frame to send back and event to surface for one decoded packet
#[derive(Debug, Default, PartialEq)]
pub struct Step {
    pub reply: Option<String>,
    pub inbound: Option<Inbound>,
}

/// Protocol bookkeeping for one packet: answer opens and pings, surface the rest
pub fn react(packet: EnginePacket) -> Step {
    match packet {
        EnginePacket::Open(handshake) => {
            debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "engine.io open");
            Step {
                reply: Some(EnginePacket::Message(SocketPacket::connect()).encode()),
                inbound: None,
            }
        }
        EnginePacket::Ping(data) => Step {
            reply: Some(EnginePacket::Pong(data).encode()),
            inbound: None,
        },
        EnginePacket::Close => Step {
            reply: None,
            inbound: Some(Inbound::Disconnected(Some("server closed the session".into()))),
        },
        EnginePacket::Message(SocketPacket::Connect { .. }) => Step {
            reply: None,
            inbound: Some(Inbound::Connected),
        },
        EnginePacket::Message(SocketPacket::Event { name, payload, .. }) => Step {
            reply: None,
            inbound: Some(Inbound::Event { name, payload }),
        },
        EnginePacket::Message(SocketPacket::Disconnect { .. }) => Step {
            reply: None,
            inbound: Some(Inbound::Disconnected(Some("server disconnected the namespace".into()))),
        },
        EnginePacket::Message(SocketPacket::ConnectError { data, .. }) => Step {
            reply: None,
            inbound: Some(Inbound::Disconnected(Some(format!("connect refused: {data}")))),
        },
        EnginePacket::Message(SocketPacket::Ack { id, .. }) => {
            trace!(id, "ignoring ack");
            Step::default()
        }
        EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Step::default(),
    }
}

/// Connect to `url` and start the reader and writer tasks.
///
/// Returns the emitting half and the stream of inbound events. There is no
/// reconnect: once `Disconnected` arrives the receiver is done.
pub async fn connect(url: &str) -> anyhow::Result<(ChannelSocket, mpsc::UnboundedReceiver<Inbound>)> {
    let endpoint = socket_url(url);
    info!(%endpoint, "connecting");
    let (ws_stream, _) = connect_async(endpoint.as_str()).await?;
    let (mut ws_sender, ws_receiver) = ws_stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<Inbound>();

    tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            trace!(%frame, "send");
            if let Err(e) = ws_sender.send(Message::Text(frame)).await {
                warn!(error = %e, "websocket send failed");
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    tokio::spawn(read_loop(ws_receiver, out_tx.clone(), in_tx));

    Ok((ChannelSocket::new(out_tx), in_rx))
}

async fn read_loop<R>(mut ws_receiver: R, replies: mpsc::UnboundedSender<String>, inbound: mpsc::UnboundedSender<Inbound>)
where
    R: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let reason = loop {
        match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                trace!(frame = %text, "recv");
                match decode_frame(&text) {
                    Ok(step) => {
                        if let Some(reply) = step.reply {
                            let _ = replies.send(reply);
                        }
                        match step.inbound {
                            Some(Inbound::Disconnected(reason)) => break reason,
                            Some(event) => {
                                if inbound.send(event).is_err() {
                                    // Game loop is gone; nobody left to read for
                                    return;
                                }
                            }
                            None => {}
                        }
                    }
                    Err(e) => warn!(error = %e, frame = %text, "dropping undecodable frame"),
                }
            }
            Some(Ok(Message::Close(frame))) => break frame.map(|f| f.reason.to_string()),
            Some(Ok(_)) => {}
            Some(Err(e)) => break Some(e.to_string()),
            None => break None,
        }
    };

    info!(?reason, "socket closed");
    let _ = inbound.send(Inbound::Disconnected(reason));
}

fn decode_frame(text: &str) -> Result<Step, FrameError> {
    Ok(react(EnginePacket::decode(text)?))
}
