//! Player actions and the errors they can raise.
//!
//! Each move kind a client can send is a variant of [`Move`], so the state
//! machine can match on `(phase, move)` exhaustively instead of branching
//! on strings.

use crate::bid::Bid;
use crate::phases::Phase;
use crate::position::Target;

/// A move submitted by a seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    /// Stage (or clear) a bid for mark X.
    InitialBid(Option<Bid>),
    /// Confirm the opening bid. Carries no state change of its own.
    SubmitInitialBid,
    /// Stage (or clear) a bid for the current placement round.
    PlacementBid(Option<Bid>),
    /// Stage (or clear) where the mark should go if this player wins.
    PlacementPosition(Option<Target>),
    /// Resolve the placement round from both players' staged values.
    SubmitPlacement,
}

impl Move {
    /// Wire name of this move kind.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The move is not accepted in the current phase.
    #[display("{} is not allowed while {}", kind, phase)]
    WrongPhase {
        /// Phase the game was in.
        phase: Phase,
        /// Wire name of the rejected move.
        kind: &'static str,
    },

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// A bid or position could not be understood.
    #[display("Invalid input: {}", _0)]
    InvalidInput(#[error(not(source))] String),

    /// The bid exceeds the bidder's remaining funds.
    #[display("Bid of {} exceeds remaining funds of {}", bid, funds)]
    InsufficientFunds {
        /// Amount bid.
        bid: u32,
        /// Funds the bidder has left.
        funds: u32,
    },

    /// A placement was submitted before both players staged a bid and a position.
    #[display("Both players must stage a bid and a position before submitting")]
    Incomplete,
}
