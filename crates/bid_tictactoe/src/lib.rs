//! Bidding tic-tac-toe game logic.
//!
//! Two players share a board but not a turn order. Mark X is auctioned
//! off at the start, and every placement afterwards is won with a sealed
//! bid against each player's funds. This crate holds the rules and the
//! per-game state machine; it performs no I/O.
//!
//! # Example
//!
//! ```
//! use bid_tictactoe::{Bid, GameState, Mark, Move, Phase, Seat};
//!
//! let mut rng = rand::rng();
//! let mut game = GameState::new();
//! game.seat_second_player().unwrap();
//! game.apply(Seat::First, Move::InitialBid(Some(Bid::new(7))), &mut rng).unwrap();
//! game.apply(Seat::Second, Move::InitialBid(Some(Bid::new(3))), &mut rng).unwrap();
//!
//! assert_eq!(game.phase(), Phase::Playing);
//! assert_eq!(game.player(Seat::First).mark(), Some(Mark::X));
//! assert_eq!(game.player(Seat::First).funds(), 93);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod bid;
mod phases;
mod position;
pub mod rules;
mod state;
mod types;
mod wire;

pub use action::{Move, MoveError};
pub use bid::Bid;
pub use phases::{Outcome, Phase};
pub use position::{OFF_BOARD, Position, Target};
pub use state::{GameState, Placement, PlayerState, STARTING_FUNDS, Seat, Staged, Transition};
pub use types::{Board, Mark, Square};
