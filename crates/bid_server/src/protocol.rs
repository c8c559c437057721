//! JSON wire protocol between clients and the server.
//!
//! Every frame is a JSON object with a `type` discriminator. Moves carry a
//! second discriminator, `moveType`, alongside their payload.

use crate::passcode::{GameId, Passcode};
use bid_tictactoe::{Bid, Move, MoveError, Target};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::instrument;

/// Frames sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Open a new game and take the first seat.
    CreateGame,
    /// Take the second seat of an existing game.
    JoinGame {
        /// Game to join.
        game_id: GameId,
    },
    /// Act in a game the sender is seated in.
    MakeMove(MoveRequest),
}

/// An authenticated move request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Game the move is for.
    pub game_id: GameId,
    /// Passcode issued to the sender on create or join.
    pub passcode: Passcode,
    /// The move itself.
    #[serde(flatten)]
    pub body: MoveBody,
}

/// Move kinds as they appear on the wire, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "moveType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveBody {
    /// Stage a bid for mark X.
    InitialBid {
        /// Bid amount.
        #[serde(default)]
        bid: Option<NumericInput>,
    },
    /// Confirm the opening bid.
    SubmitInitialBid,
    /// Stage a bid for the current placement.
    PlacementBid {
        /// Bid amount.
        #[serde(default)]
        bid: Option<NumericInput>,
    },
    /// Stage a target cell (1-9) or 10 for off-board.
    PlacementPosition {
        /// Target number.
        #[serde(default)]
        position: Option<NumericInput>,
    },
    /// Resolve the placement round.
    SubmitPlacement,
}

/// A number typed into a form field; clients send either JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON number.
    Number(serde_json::Number),
    /// A JSON string, possibly empty.
    Text(String),
}

impl NumericInput {
    fn text(input: &Option<Self>) -> String {
        match input {
            Some(NumericInput::Number(n)) => n.to_string(),
            Some(NumericInput::Text(s)) => s.clone(),
            None => String::new(),
        }
    }
}

impl MoveBody {
    /// Validates the payload into an engine move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidInput`] for malformed bids or positions.
    #[instrument]
    pub fn into_move(self) -> Result<Move, MoveError> {
        Ok(match self {
            MoveBody::InitialBid { bid } => Move::InitialBid(Bid::parse(&NumericInput::text(&bid))?),
            MoveBody::SubmitInitialBid => Move::SubmitInitialBid,
            MoveBody::PlacementBid { bid } => {
                Move::PlacementBid(Bid::parse(&NumericInput::text(&bid))?)
            }
            MoveBody::PlacementPosition { position } => {
                Move::PlacementPosition(Target::parse(&NumericInput::text(&position))?)
            }
            MoveBody::SubmitPlacement => Move::SubmitPlacement,
        })
    }
}

/// Frames sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Reply to `CREATE_GAME`.
    GameCreated {
        /// New game's id, to share with the opponent.
        game_id: GameId,
        /// The creator's passcode.
        passcode: Passcode,
    },
    /// Reply to a successful `JOIN_GAME`.
    GameJoined {
        /// The joiner's passcode.
        passcode: Passcode,
    },
    /// Full authoritative state plus the recipient's own seat index.
    GameState {
        /// Serialized [`bid_tictactoe::GameState`].
        game_state: Box<RawValue>,
        /// 0 for the creator, 1 for the joiner.
        player_index: usize,
    },
    /// A request was rejected.
    Error {
        /// Human-readable reason.
        message: String,
    },
}
