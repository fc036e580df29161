pub mod core {
	pub mod markup;
	pub mod page;
	pub mod session;
	pub mod protocol;
	pub mod socket;
	pub mod board_client;
	pub mod controller;
	pub mod renderer;
	pub mod terminal;
}

pub mod client {
	pub mod socketio;
	pub mod websocket_client;
}

pub mod cli;
pub mod config;
pub mod game_runner;
pub mod logging;

// Re-export for convenience
pub use crate::core::board_client::{BoardClient, ClientError, ErrorAction};
pub use crate::core::page::{Coord, Document, Page};
pub use crate::core::session::Session;
pub use crate::core::socket::Socket;
