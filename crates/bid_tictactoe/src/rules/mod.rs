//! Board rules for bidding tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board), kept apart from the
//! auction so the state machine can compose them after each placement.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;
