//! Bid amounts and input parsing.

use crate::action::MoveError;
use crate::position::Target;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A sealed bid, in whole units of funds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Bid(u32);

impl Bid {
    /// Creates a bid of the given amount.
    pub fn new(amount: u32) -> Self {
        Self(amount)
    }

    /// The raw amount; this is what a winning bidder pays.
    pub fn amount(self) -> u32 {
        self.0
    }

    /// Strength of the bid in a placement round.
    ///
    /// Declining to place on the board halves the bid, rounding down.
    pub fn effective(self, target: Target) -> u32 {
        match target {
            Target::OffBoard => self.0 / 2,
            Target::Cell(_) => self.0,
        }
    }

    /// Parses staged bid input. Blank input clears the stage.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidInput`] for anything but a non-negative
    /// integer.
    #[instrument]
    pub fn parse(input: &str) -> Result<Option<Self>, MoveError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        input
            .parse::<u32>()
            .map(|amount| Some(Self(amount)))
            .map_err(|_| MoveError::InvalidInput(format!("bid must be a whole number, got {input:?}")))
    }
}

impl Target {
    /// Parses staged position input. Blank input clears the stage.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidInput`] unless the input is a number 1-10.
    #[instrument]
    pub fn parse(input: &str) -> Result<Option<Self>, MoveError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        input
            .parse::<u8>()
            .ok()
            .and_then(Target::from_number)
            .map(Some)
            .ok_or_else(|| {
                MoveError::InvalidInput(format!("position must be 1-10, got {input:?}"))
            })
    }
}
