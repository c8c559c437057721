//! Game phases and outcomes.

use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// Phase of a game. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Phase {
    /// Created, second seat still open.
    WaitingForPlayer,
    /// Both seats taken; players are bidding for mark X.
    InitialBidding,
    /// Marks assigned; players bid for each placement.
    Playing,
    /// Terminal.
    GameOver,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// The board filled with no line completed.
    Tie,
}

impl Outcome {
    /// Returns the winning mark if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::X => Some(Mark::X),
            Outcome::O => Some(Mark::O),
            Outcome::Tie => None,
        }
    }
}

impl From<Mark> for Outcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Outcome::X,
            Mark::O => Outcome::O,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winner() {
            Some(mark) => write!(f, "{} wins!", mark),
            None => write!(f, "It's a tie!"),
        }
    }
}
