//! The authoritative state of one bidding match.
//!
//! A game moves through [`Phase`]s in one direction only:
//!
//! - `WaitingForPlayer` until the second seat is filled
//! - `InitialBidding` until both players have staged a bid for mark X
//! - `Playing` for as many placement rounds as it takes
//! - `GameOver` once a line is completed or the board fills
//!
//! During play the *mover* seat (`current_player`) alternates every round.
//! The mover decides which mark goes down, while the round's bid winner
//! decides where it goes. A player can therefore win a round and place
//! their opponent's mark.

use crate::action::{Move, MoveError};
use crate::bid::Bid;
use crate::phases::{Outcome, Phase};
use crate::position::{Position, Target};
use crate::rules::{check_winner, is_full};
use crate::types::{Board, Mark};
use crate::wire::serialize_blank;
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, instrument, warn};

/// Funds each player starts with unless configured otherwise.
pub const STARTING_FUNDS: u32 = 100;

/// One of the two seats at a game, in join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Seat {
    /// The player who created the game (index 0).
    First,
    /// The player who joined it (index 1).
    Second,
}

impl Seat {
    /// Both seats in index order.
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    /// Index of this seat (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// The opposite seat.
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.index() as u8
    }
}

/// Per-player bookkeeping visible to both clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    funds: u32,
    #[serde(serialize_with = "serialize_blank")]
    mark: Option<Mark>,
    name: String,
}

impl PlayerState {
    fn new(seat: Seat, funds: u32) -> Self {
        Self {
            funds,
            mark: None,
            name: format!("Player {}", seat.index() + 1),
        }
    }

    /// Remaining funds.
    pub fn funds(&self) -> u32 {
        self.funds
    }

    /// Assigned mark, once the opening auction is resolved.
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    /// Display name ("Player 1" or "Player 2").
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A pair of per-seat values staged ahead of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staged<T> {
    values: [Option<T>; 2],
}

impl<T: Copy> Staged<T> {
    fn empty() -> Self {
        Self {
            values: [None, None],
        }
    }

    /// Value staged by a seat, if any.
    pub fn get(&self, seat: Seat) -> Option<T> {
        self.values[seat.index()]
    }

    fn set(&mut self, seat: Seat, value: Option<T>) {
        self.values[seat.index()] = value;
    }

    /// Both values, once both seats have staged.
    pub fn both(&self) -> Option<(T, T)> {
        Some((self.values[0]?, self.values[1]?))
    }

    fn clear(&mut self) {
        self.values = [None, None];
    }
}

/// What happened to the round's mark when a placement resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The mover's mark went onto an empty cell.
    Marked(Position, Mark),
    /// The winner chose not to place on the board.
    OffBoard,
    /// The winner picked a cell that was already taken.
    Occupied(Position),
}

/// Result of successfully applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Accepted with no change to the state.
    Acknowledged,
    /// A bid or position was staged or cleared.
    Staged,
    /// The opening auction resolved.
    MarksAssigned {
        /// Seat that received mark X.
        x: Seat,
        /// True if equal bids forced a coin flip.
        coin_flip: bool,
    },
    /// A placement round resolved.
    Placed {
        /// Seat that won the round's bid.
        winner: Seat,
        /// Effect on the board.
        placement: Placement,
    },
}

impl Transition {
    /// Whether clients need to see the new state.
    pub fn changed_state(&self) -> bool {
        !matches!(self, Transition::Acknowledged)
    }
}

/// Complete state of one game, shaped the way clients consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    players: [PlayerState; 2],
    current_player: Seat,
    game_phase: Phase,
    bids: Staged<Bid>,
    positions: Staged<Target>,
    winner: Option<Outcome>,
    message: String,
}

impl GameState {
    /// Creates a game waiting for its second player, with default funds.
    pub fn new() -> Self {
        Self::with_funds(STARTING_FUNDS)
    }

    /// Creates a game waiting for its second player.
    #[instrument]
    pub fn with_funds(funds: u32) -> Self {
        Self {
            board: Board::new(),
            players: [
                PlayerState::new(Seat::First, funds),
                PlayerState::new(Seat::Second, funds),
            ],
            current_player: Seat::First,
            game_phase: Phase::WaitingForPlayer,
            bids: Staged::empty(),
            positions: Staged::empty(),
            winner: None,
            message: String::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player in a seat.
    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat.index()]
    }

    /// Returns the seat whose mark goes down next.
    pub fn current_player(&self) -> Seat {
        self.current_player
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.game_phase
    }

    /// Returns the staged bids.
    pub fn bids(&self) -> &Staged<Bid> {
        &self.bids
    }

    /// Returns the staged positions.
    pub fn positions(&self) -> &Staged<Target> {
        &self.positions
    }

    /// Returns the outcome once the game is over.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Returns the narration of the latest resolution.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Seats the second player and opens the auction for mark X.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::WrongPhase`] unless the game was waiting for a player.
    #[instrument(skip(self), fields(phase = %self.game_phase))]
    pub fn seat_second_player(&mut self) -> Result<(), MoveError> {
        if self.game_phase != Phase::WaitingForPlayer {
            return Err(MoveError::WrongPhase {
                phase: self.game_phase,
                kind: "JOIN_GAME",
            });
        }
        self.game_phase = Phase::InitialBidding;
        info!("Second player seated, bidding for X is open");
        Ok(())
    }

    /// Applies a move from a seated player.
    ///
    /// The state is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`MoveError::WrongPhase`] / [`MoveError::GameOver`] for moves the
    ///   current phase does not accept
    /// - [`MoveError::InsufficientFunds`] for a bid above the player's funds
    /// - [`MoveError::Incomplete`] when a placement is submitted early
    #[instrument(skip(self, rng), fields(phase = %self.game_phase, kind = action.kind()))]
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        seat: Seat,
        action: Move,
        rng: &mut R,
    ) -> Result<Transition, MoveError> {
        match (self.game_phase, action) {
            (Phase::GameOver, _) => {
                warn!("Move rejected, game is over");
                Err(MoveError::GameOver)
            }
            (Phase::InitialBidding, Move::InitialBid(bid)) => {
                self.stage_bid(seat, bid)?;
                match self.bids.both() {
                    Some((first, second)) => Ok(self.resolve_initial(first, second, rng)),
                    None => Ok(Transition::Staged),
                }
            }
            // The auction resolves on the second bid, so a late submit is still fine.
            (Phase::InitialBidding | Phase::Playing, Move::SubmitInitialBid) => {
                Ok(Transition::Acknowledged)
            }
            (Phase::Playing, Move::PlacementBid(bid)) => {
                self.stage_bid(seat, bid)?;
                Ok(Transition::Staged)
            }
            (Phase::Playing, Move::PlacementPosition(target)) => {
                debug!(?seat, ?target, "Staging position");
                self.positions.set(seat, target);
                Ok(Transition::Staged)
            }
            (Phase::Playing, Move::SubmitPlacement) => self.resolve_placement(),
            (
                phase @ (Phase::WaitingForPlayer | Phase::InitialBidding | Phase::Playing),
                Move::InitialBid(_)
                | Move::SubmitInitialBid
                | Move::PlacementBid(_)
                | Move::PlacementPosition(_)
                | Move::SubmitPlacement,
            ) => {
                warn!(?seat, "Move not allowed in this phase");
                Err(MoveError::WrongPhase {
                    phase,
                    kind: action.kind(),
                })
            }
        }
    }

    fn stage_bid(&mut self, seat: Seat, bid: Option<Bid>) -> Result<(), MoveError> {
        let funds = self.player(seat).funds;
        if let Some(bid) = bid
            && bid.amount() > funds
        {
            warn!(?seat, %bid, funds, "Bid exceeds funds");
            return Err(MoveError::InsufficientFunds {
                bid: bid.amount(),
                funds,
            });
        }
        debug!(?seat, ?bid, "Staging bid");
        self.bids.set(seat, bid);
        Ok(())
    }

    fn resolve_initial<R: Rng + ?Sized>(&mut self, first: Bid, second: Bid, rng: &mut R) -> Transition {
        let (x, coin_flip) = match first.cmp(&second) {
            Ordering::Greater => (Seat::First, false),
            Ordering::Less => (Seat::Second, false),
            Ordering::Equal => {
                let seat = if rng.random_bool(0.5) {
                    Seat::First
                } else {
                    Seat::Second
                };
                (seat, true)
            }
        };

        if !coin_flip {
            let paid = if x == Seat::First { first } else { second };
            self.players[x.index()].funds -= paid.amount();
        }
        self.players[x.index()].mark = Some(Mark::X);
        self.players[x.other().index()].mark = Some(Mark::O);

        self.game_phase = Phase::Playing;
        self.message = format!("{} won the bid for X.", self.player(x).name);
        self.bids.clear();

        info!(?x, %first, %second, coin_flip, "Opening auction resolved");
        Transition::MarksAssigned { x, coin_flip }
    }

    fn resolve_placement(&mut self) -> Result<Transition, MoveError> {
        let (Some((bid1, bid2)), Some((pos1, pos2))) = (self.bids.both(), self.positions.both())
        else {
            warn!("Placement submitted before both players staged");
            return Err(MoveError::Incomplete);
        };
        let Some(mover_mark) = self.player(self.current_player).mark else {
            return Err(MoveError::WrongPhase {
                phase: self.game_phase,
                kind: Move::SubmitPlacement.kind(),
            });
        };

        let (effective1, effective2) = (bid1.effective(pos1), bid2.effective(pos2));
        // Equal bids go to whoever holds the mark being placed this round.
        let winner = match effective1.cmp(&effective2) {
            Ordering::Greater => Seat::First,
            Ordering::Less => Seat::Second,
            Ordering::Equal if self.player(Seat::First).mark == Some(mover_mark) => Seat::First,
            Ordering::Equal => Seat::Second,
        };
        let (bid, target) = match winner {
            Seat::First => (bid1, pos1),
            Seat::Second => (bid2, pos2),
        };

        let player = &mut self.players[winner.index()];
        player.funds = player
            .funds
            .checked_sub(bid.amount())
            .ok_or(MoveError::InsufficientFunds {
                bid: bid.amount(),
                funds: player.funds,
            })?;
        let name = player.name.clone();

        let placement = match target {
            Target::Cell(pos) if self.board.is_empty(pos) => {
                self.board.set(pos, mover_mark);
                self.message = format!("{} placed {} at {}.", name, mover_mark, pos.label());
                if let Some(mark) = check_winner(&self.board) {
                    self.finish(Outcome::from(mark));
                } else if is_full(&self.board) {
                    self.finish(Outcome::Tie);
                }
                Placement::Marked(pos, mover_mark)
            }
            Target::Cell(pos) => {
                self.message = format!(
                    "The chosen position is already occupied. {} loses their bid.",
                    name
                );
                Placement::Occupied(pos)
            }
            Target::OffBoard => {
                self.message = format!("{} placed the mark off-board.", name);
                Placement::OffBoard
            }
        };

        self.current_player = self.current_player.other();
        self.bids.clear();
        self.positions.clear();

        info!(
            ?winner,
            effective1,
            effective2,
            paid = bid.amount(),
            ?placement,
            phase = %self.game_phase,
            "Placement resolved"
        );
        Ok(Transition::Placed { winner, placement })
    }

    fn finish(&mut self, outcome: Outcome) {
        self.winner = Some(outcome);
        self.game_phase = Phase::GameOver;
        self.message = outcome.to_string();
        info!(?outcome, "Game over");
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bid(n: u32) -> Option<Bid> {
        Some(Bid::new(n))
    }

    fn at(n: u8) -> Option<Target> {
        Target::from_number(n)
    }

    fn playing(first: u32, second: u32) -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = GameState::new();
        game.seat_second_player().unwrap();
        game.apply(Seat::First, Move::InitialBid(bid(first)), &mut rng)
            .unwrap();
        game.apply(Seat::Second, Move::InitialBid(bid(second)), &mut rng)
            .unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        (game, rng)
    }

    fn round(game: &mut GameState, rng: &mut StdRng, first: (u32, u8), second: (u32, u8)) -> Transition {
        game.apply(Seat::First, Move::PlacementBid(bid(first.0)), rng).unwrap();
        game.apply(Seat::First, Move::PlacementPosition(at(first.1)), rng).unwrap();
        game.apply(Seat::Second, Move::PlacementBid(bid(second.0)), rng).unwrap();
        game.apply(Seat::Second, Move::PlacementPosition(at(second.1)), rng).unwrap();
        game.apply(Seat::First, Move::SubmitPlacement, rng).unwrap()
    }

    #[test]
    fn test_moves_rejected_while_waiting() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = GameState::new();
        let err = game
            .apply(Seat::First, Move::InitialBid(bid(5)), &mut rng)
            .unwrap_err();
        assert!(matches!(err, MoveError::WrongPhase { phase: Phase::WaitingForPlayer, .. }));
        assert_eq!(game, GameState::new());
    }

    #[test]
    fn test_second_seat_only_once() {
        let mut game = GameState::new();
        game.seat_second_player().unwrap();
        assert!(game.seat_second_player().is_err());
        assert_eq!(game.phase(), Phase::InitialBidding);
    }

    #[test]
    fn test_higher_opening_bid_wins_x_and_pays() {
        let (game, _) = playing(7, 3);
        assert_eq!(game.player(Seat::First).mark(), Some(Mark::X));
        assert_eq!(game.player(Seat::First).funds(), 93);
        assert_eq!(game.player(Seat::Second).mark(), Some(Mark::O));
        assert_eq!(game.player(Seat::Second).funds(), 100);
        assert_eq!(game.message(), "Player 1 won the bid for X.");
        assert_eq!(game.bids().both(), None);
        assert_eq!(game.bids().get(Seat::First), None);
    }

    #[test]
    fn test_tied_opening_bid_is_free_coin_flip() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = GameState::new();
            game.seat_second_player().unwrap();
            game.apply(Seat::First, Move::InitialBid(bid(5)), &mut rng).unwrap();
            let transition = game
                .apply(Seat::Second, Move::InitialBid(bid(5)), &mut rng)
                .unwrap();
            assert!(matches!(transition, Transition::MarksAssigned { coin_flip: true, .. }));
            let marks = [
                game.player(Seat::First).mark().unwrap(),
                game.player(Seat::Second).mark().unwrap(),
            ];
            assert_ne!(marks[0], marks[1]);
            assert_eq!(game.player(Seat::First).funds(), 100);
            assert_eq!(game.player(Seat::Second).funds(), 100);
        }
    }

    #[test]
    fn test_restaging_opening_bid_before_opponent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = GameState::new();
        game.seat_second_player().unwrap();
        game.apply(Seat::First, Move::InitialBid(bid(1)), &mut rng).unwrap();
        game.apply(Seat::First, Move::InitialBid(bid(9)), &mut rng).unwrap();
        assert_eq!(game.bids().get(Seat::First), Some(Bid::new(9)));
        game.apply(Seat::First, Move::InitialBid(None), &mut rng).unwrap();
        assert_eq!(game.bids().get(Seat::First), None);
        assert_eq!(game.phase(), Phase::InitialBidding);
    }

    #[test]
    fn test_submit_initial_bid_is_acknowledged_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = GameState::new();
        game.seat_second_player().unwrap();
        let before = game.clone();
        let transition = game.apply(Seat::Second, Move::SubmitInitialBid, &mut rng).unwrap();
        assert!(!transition.changed_state());
        assert_eq!(game, before);
    }

    #[test]
    fn test_submit_initial_bid_after_auction_resolved() {
        let (mut game, mut rng) = playing(12, 4);
        let before = game.clone();
        let transition = game.apply(Seat::First, Move::SubmitInitialBid, &mut rng).unwrap();
        assert_eq!(transition, Transition::Acknowledged);
        assert_eq!(game, before);
    }

    #[test]
    fn test_placement_bid_above_remaining_funds_rejected() {
        let (mut game, mut rng) = playing(60, 3);
        game.apply(Seat::First, Move::PlacementBid(bid(30)), &mut rng).unwrap();
        let before = game.clone();

        let err = game
            .apply(Seat::First, Move::PlacementBid(bid(41)), &mut rng)
            .unwrap_err();
        assert_eq!(err, MoveError::InsufficientFunds { bid: 41, funds: 40 });
        assert_eq!(game, before);
        assert_eq!(game.bids().get(Seat::First), Some(Bid::new(30)));

        game.apply(Seat::First, Move::PlacementBid(bid(40)), &mut rng).unwrap();
    }

    #[test]
    fn test_bid_above_funds_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = GameState::new();
        game.seat_second_player().unwrap();
        let err = game
            .apply(Seat::First, Move::InitialBid(bid(101)), &mut rng)
            .unwrap_err();
        assert_eq!(err, MoveError::InsufficientFunds { bid: 101, funds: 100 });
        assert_eq!(game.bids().get(Seat::First), None);
    }

    #[test]
    fn test_off_board_bid_is_halved_but_paid_in_full() {
        let (mut game, mut rng) = playing(7, 3);
        let transition = round(&mut game, &mut rng, (6, 10), (2, 3));
        assert_eq!(
            transition,
            Transition::Placed { winner: Seat::First, placement: Placement::OffBoard }
        );
        assert_eq!(game.player(Seat::First).funds(), 93 - 6);
        assert_eq!(game.player(Seat::Second).funds(), 100);
        assert!(game.board().is_empty(Position::TopRight));
        assert_eq!(game.message(), "Player 1 placed the mark off-board.");
        assert_eq!(game.current_player(), Seat::Second);
        assert_eq!(game.bids().both(), None);
        assert_eq!(game.positions().both(), None);
    }

    #[test]
    fn test_halving_can_flip_the_round() {
        let (mut game, mut rng) = playing(7, 3);
        // 9 off-board is worth 4, beating 5 on a cell.
        let transition = round(&mut game, &mut rng, (9, 10), (5, 1));
        assert!(matches!(transition, Transition::Placed { winner: Seat::Second, .. }));
        // Mover is seat 0 (X), so X lands where seat 1 asked.
        assert_eq!(game.board().get(Position::TopLeft), crate::Square::Occupied(Mark::X));
        assert_eq!(game.player(Seat::Second).funds(), 95);
    }

    #[test]
    fn test_tie_goes_to_holder_of_movers_mark() {
        // Seat 1 holds X; seat 0 is mover in round one, so O is placed and
        // ties favour seat 0.
        let (mut game, mut rng) = playing(3, 7);
        let transition = round(&mut game, &mut rng, (4, 1), (4, 2));
        assert!(matches!(transition, Transition::Placed { winner: Seat::First, .. }));
        assert_eq!(game.board().get(Position::TopLeft), crate::Square::Occupied(Mark::O));

        // Now seat 1 is mover and holds X: ties favour the X holder.
        let transition = round(&mut game, &mut rng, (4, 5), (4, 9));
        assert!(matches!(transition, Transition::Placed { winner: Seat::Second, .. }));
        assert_eq!(game.board().get(Position::BottomRight), crate::Square::Occupied(Mark::X));
    }

    #[test]
    fn test_occupied_cell_forfeits_bid() {
        let (mut game, mut rng) = playing(7, 3);
        round(&mut game, &mut rng, (1, 5), (0, 1));
        let board_before = game.board().clone();
        let transition = round(&mut game, &mut rng, (0, 1), (2, 5));
        assert_eq!(
            transition,
            Transition::Placed {
                winner: Seat::Second,
                placement: Placement::Occupied(Position::Center),
            }
        );
        assert_eq!(game.board(), &board_before);
        assert_eq!(game.player(Seat::Second).funds(), 98);
        assert_eq!(game.current_player(), Seat::First);
        assert_eq!(
            game.message(),
            "The chosen position is already occupied. Player 2 loses their bid."
        );
    }

    #[test]
    fn test_submit_before_staging_is_incomplete() {
        let (mut game, mut rng) = playing(7, 3);
        game.apply(Seat::First, Move::PlacementBid(bid(1)), &mut rng).unwrap();
        game.apply(Seat::First, Move::PlacementPosition(at(1)), &mut rng).unwrap();
        game.apply(Seat::Second, Move::PlacementBid(bid(1)), &mut rng).unwrap();
        let before = game.clone();
        let err = game.apply(Seat::Second, Move::SubmitPlacement, &mut rng).unwrap_err();
        assert_eq!(err, MoveError::Incomplete);
        assert_eq!(game, before);
    }

    #[test]
    fn test_line_ends_game() {
        let (mut game, mut rng) = playing(7, 3);
        // Seat 0 wins every round; mover alternates X and O.
        round(&mut game, &mut rng, (0, 1), (0, 9)); // X at 1
        round(&mut game, &mut rng, (1, 4), (0, 9)); // O at 4
        round(&mut game, &mut rng, (0, 2), (0, 9)); // X at 2
        round(&mut game, &mut rng, (1, 5), (0, 9)); // O at 5
        round(&mut game, &mut rng, (0, 3), (0, 8)); // X at 3
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.winner(), Some(Outcome::X));
        assert_eq!(game.message(), "X wins!");

        let err = game.apply(Seat::First, Move::SubmitPlacement, &mut rng).unwrap_err();
        assert_eq!(err, MoveError::GameOver);
    }

    #[test]
    fn test_opening_moves_rejected_during_play() {
        let (mut game, mut rng) = playing(7, 3);
        let err = game
            .apply(Seat::First, Move::InitialBid(bid(1)), &mut rng)
            .unwrap_err();
        assert!(matches!(err, MoveError::WrongPhase { phase: Phase::Playing, kind: "INITIAL_BID" }));
    }

    #[test]
    fn test_serialized_shape() {
        let (game, _) = playing(7, 3);
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["gamePhase"], "playing");
        assert_eq!(json["currentPlayer"], 0);
        assert_eq!(json["players"][0]["mark"], "X");
        assert_eq!(json["players"][0]["funds"], 93);
        assert_eq!(json["players"][1]["name"], "Player 2");
        assert_eq!(json["bids"]["player1"], "");
        assert_eq!(json["positions"]["player2"], "");
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["board"].as_array().unwrap().len(), 9);

        let fresh = serde_json::to_value(GameState::new()).unwrap();
        assert_eq!(fresh["players"][0]["mark"], "");
        assert_eq!(fresh["gamePhase"], "waitingForPlayer");
    }
}
