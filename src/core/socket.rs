/// Outbound half of the realtime connection, as the board client sees it.
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SocketError {
    #[error("socket is closed")]
    Closed,
}

/// Fire-and-forget event emitter. Implementations queue the event and return;
/// delivery and any answer happen later, off this call.
pub trait Socket {
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SocketError>;
}
