//! Delivery of frames to connected players.
//!
//! The registry never touches sockets. It hands frames to a
//! [`Connection`], whose [`Recipient`] is whatever the transport plugged
//! in (an mpsc outbox in production, a recording stub in tests).

use crate::protocol::ServerMessage;
use bid_tictactoe::{GameState, Seat};
use derive_more::{Display, Error};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Process-unique id of a transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, derive_new::new)]
#[display("conn-{}", _0)]
pub struct ConnectionId(u64);

/// Why a frame could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DeliveryError {
    /// The connection has gone away.
    #[display("connection closed")]
    Closed,
    /// The frame could not be serialized.
    #[display("failed to encode frame: {}", _0)]
    Encode(#[error(not(source))] String),
}

/// Something that accepts serialized frames for one client.
///
/// Implementations must not block.
pub trait Recipient: Send + Sync + fmt::Debug {
    /// Queues a frame for delivery.
    fn deliver(&self, frame: String) -> Result<(), DeliveryError>;
}

impl Recipient for mpsc::UnboundedSender<String> {
    fn deliver(&self, frame: String) -> Result<(), DeliveryError> {
        self.send(frame).map_err(|_| DeliveryError::Closed)
    }
}

/// Handle on a client connection, owned by the transport and shared with the registry.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    recipient: Arc<dyn Recipient>,
}

impl Connection {
    /// Wraps a recipient under the given id.
    pub fn new(id: ConnectionId, recipient: Arc<dyn Recipient>) -> Self {
        Self { id, recipient }
    }

    /// Returns the connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Serializes and queues a message.
    #[instrument(skip(self, message), fields(connection = %self.id))]
    pub fn send(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        let frame =
            serde_json::to_string(message).map_err(|e| DeliveryError::Encode(e.to_string()))?;
        self.recipient.deliver(frame)
    }
}

/// Sends every seated, connected player the current state with their own index.
///
/// The state is serialized once. A failure for one seat is logged and
/// does not stop delivery to the other. Returns the number of frames
/// delivered.
#[instrument(skip_all, fields(phase = %state.phase()))]
pub fn broadcast(state: &GameState, connections: [Option<&Connection>; 2]) -> usize {
    let game_state = match serde_json::value::to_raw_value(state) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Failed to serialize game state");
            return 0;
        }
    };

    let mut delivered = 0;
    for (seat, connection) in Seat::BOTH.into_iter().zip(connections) {
        let Some(connection) = connection else {
            debug!(?seat, "Seat has no live connection, skipping");
            continue;
        };
        let message = ServerMessage::GameState {
            game_state: game_state.clone(),
            player_index: seat.index(),
        };
        match connection.send(&message) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(?seat, connection = %connection.id(), error = %e, "Delivery failed"),
        }
    }
    delivered
}
