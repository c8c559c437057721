//! Bidding tic-tac-toe server.
//!
//! Hosts any number of two-player games over websockets. The game rules
//! live in [`bid_tictactoe`]; this crate adds everything around them.
//!
//! # Architecture
//!
//! - **Passcodes**: six-digit game ids and per-seat secrets
//! - **Session registry**: routes moves to games, authenticated by passcode
//! - **Gateway**: fans each new state out to both seats
//! - **Protocol**: the JSON frames exchanged with clients
//! - **Server**: the axum websocket transport
//!
//! # Example
//!
//! ```no_run
//! use bid_server::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_overrides(None, None, Some(8080))?;
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod gateway;
mod passcode;
mod protocol;
mod server;
mod session;

pub use config::{ConfigError, ServerConfig};
pub use gateway::{Connection, ConnectionId, DeliveryError, Recipient, broadcast};
pub use passcode::{GameId, Passcode};
pub use protocol::{ClientMessage, MoveBody, MoveRequest, NumericInput, ServerMessage};
pub use server::{AppState, handle_frame, router, serve, spawn_reaper};
pub use session::{RegistryError, SessionRegistry};
