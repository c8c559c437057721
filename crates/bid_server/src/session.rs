//! Game session registry.
//!
//! Maps game ids to live games and authenticates moves by passcode. Each
//! game sits behind its own mutex, so staging and resolving a round for
//! one game is atomic while other games proceed in parallel.

use crate::gateway::{self, Connection, ConnectionId};
use crate::passcode::{GameId, Passcode};
use crate::protocol::ServerMessage;
use bid_tictactoe::{GameState, Move, MoveError, Phase, STARTING_FUNDS, Seat, Transition};
use derive_more::{Display, Error};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Why the registry refused a request.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// No game with that id.
    #[display("Game not found")]
    NotFound,
    /// Both seats are already taken.
    #[display("Game is already full")]
    AlreadyFull,
    /// Unknown game, or the passcode matches no seat in it.
    #[display("Invalid game or passcode")]
    InvalidGameOrPasscode,
    /// No unused game id or passcode turned up within the draw limit.
    #[display("No game codes available, try again later")]
    CodesExhausted,
    /// The game rejected the move.
    #[display("{}", _0)]
    Move(MoveError),
}

/// Draws per game id or passcode before giving up.
const MAX_DRAWS: usize = 64;

impl From<MoveError> for RegistryError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

/// A seated player: their secret and, while connected, their connection.
#[derive(Debug, Clone)]
pub struct PlayerSeat {
    passcode: Passcode,
    connection: Option<Connection>,
}

impl PlayerSeat {
    fn new(passcode: Passcode, connection: Connection) -> Self {
        Self {
            passcode,
            connection: Some(connection),
        }
    }
}

/// One game: its seats and its authoritative state.
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    seats: [Option<PlayerSeat>; 2],
    state: GameState,
    finished_at: Option<Instant>,
}

impl GameSession {
    fn new(id: GameId, creator: PlayerSeat, funds: u32) -> Self {
        Self {
            id,
            seats: [Some(creator), None],
            state: GameState::with_funds(funds),
            finished_at: None,
        }
    }

    #[instrument(skip_all, fields(game_id = %self.id))]
    fn seat_of(&self, passcode: &Passcode) -> Option<Seat> {
        Seat::BOTH.into_iter().find(|seat| {
            self.seats[seat.index()]
                .as_ref()
                .is_some_and(|s| &s.passcode == passcode)
        })
    }

    fn passcodes(&self) -> impl Iterator<Item = &Passcode> {
        self.seats.iter().flatten().map(|s| &s.passcode)
    }

    fn connection(&self, seat: Seat) -> Option<&Connection> {
        self.seats[seat.index()].as_ref()?.connection.as_ref()
    }

    fn broadcast(&self) -> usize {
        gateway::broadcast(&self.state, Seat::BOTH.map(|seat| self.connection(seat)))
    }
}

type SharedSession = Arc<Mutex<GameSession>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // `apply` validates before it mutates, so a poisoned game is still consistent.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of all live games.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    games: Arc<RwLock<HashMap<GameId, SharedSession>>>,
    passcodes: Arc<Mutex<HashSet<Passcode>>>,
    starting_funds: u32,
}

impl SessionRegistry {
    /// Creates an empty registry with default starting funds.
    pub fn new() -> Self {
        Self::with_starting_funds(STARTING_FUNDS)
    }

    /// Creates an empty registry whose games start with the given funds.
    #[instrument]
    pub fn with_starting_funds(starting_funds: u32) -> Self {
        info!("Creating session registry");
        Self {
            games: Arc::default(),
            passcodes: Arc::default(),
            starting_funds,
        }
    }

    fn issue_passcode<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Passcode, RegistryError> {
        let mut issued = lock(&self.passcodes);
        for _ in 0..MAX_DRAWS {
            let passcode = Passcode::generate(rng);
            if issued.insert(passcode.clone()) {
                return Ok(passcode);
            }
            debug!("Passcode collision, drawing again");
        }
        warn!(live = issued.len(), "No free passcode within draw limit");
        Err(RegistryError::CodesExhausted)
    }

    fn release_passcode(&self, passcode: &Passcode) {
        lock(&self.passcodes).remove(passcode);
    }

    fn session(&self, game_id: &GameId) -> Option<SharedSession> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(game_id)
            .cloned()
    }

    /// Opens a new game with the caller in the first seat.
    ///
    /// Replies `GAME_CREATED` to the creator and returns the new id and
    /// the creator's passcode.
    ///
    /// # Errors
    ///
    /// [`RegistryError::CodesExhausted`] if no unused id or passcode could
    /// be drawn. Nothing is registered in that case.
    #[instrument(skip_all, fields(connection = %creator.id()))]
    pub fn create_game(&self, creator: Connection) -> Result<(GameId, Passcode), RegistryError> {
        self.create_game_with(creator, &mut rand::rng())
    }

    fn create_game_with<R: Rng + ?Sized>(
        &self,
        creator: Connection,
        rng: &mut R,
    ) -> Result<(GameId, Passcode), RegistryError> {
        let passcode = self.issue_passcode(rng)?;
        let reply_to = creator.clone();

        let game_id = {
            let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
            let Some(game_id) = (0..MAX_DRAWS)
                .map(|_| GameId::generate(rng))
                .find(|candidate| !games.contains_key(candidate))
            else {
                warn!(live = games.len(), "No free game id within draw limit");
                self.release_passcode(&passcode);
                return Err(RegistryError::CodesExhausted);
            };
            let session = GameSession::new(
                game_id.clone(),
                PlayerSeat::new(passcode.clone(), creator),
                self.starting_funds,
            );
            games.insert(game_id.clone(), Arc::new(Mutex::new(session)));
            game_id
        };

        info!(game_id = %game_id, "Game created");
        let reply = ServerMessage::GameCreated {
            game_id: game_id.clone(),
            passcode: passcode.clone(),
        };
        if let Err(e) = reply_to.send(&reply) {
            warn!(game_id = %game_id, error = %e, "Could not confirm game creation");
        }
        Ok((game_id, passcode))
    }

    /// Seats a second player and opens bidding.
    ///
    /// Replies `GAME_JOINED` to the joiner, then broadcasts the new state
    /// to both players.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for an unknown id,
    /// [`RegistryError::AlreadyFull`] if both seats are taken, and
    /// [`RegistryError::CodesExhausted`] if no passcode could be drawn.
    #[instrument(skip(self, joiner), fields(connection = %joiner.id()))]
    pub fn join_game(&self, game_id: &GameId, joiner: Connection) -> Result<Passcode, RegistryError> {
        let session = self.session(game_id).ok_or_else(|| {
            warn!("Join for unknown game");
            RegistryError::NotFound
        })?;
        let mut session = lock(&session);

        if session.seats[Seat::Second.index()].is_some() {
            warn!("Join for full game");
            return Err(RegistryError::AlreadyFull);
        }
        let passcode = self.issue_passcode(&mut rand::rng())?;
        if let Err(e) = session.state.seat_second_player() {
            self.release_passcode(&passcode);
            return Err(e.into());
        }

        let reply_to = joiner.clone();
        session.seats[Seat::Second.index()] = Some(PlayerSeat::new(passcode.clone(), joiner));
        info!("Second player joined");

        if let Err(e) = reply_to.send(&ServerMessage::GameJoined {
            passcode: passcode.clone(),
        }) {
            warn!(error = %e, "Could not confirm join");
        }
        session.broadcast();
        Ok(passcode)
    }

    /// Authenticates a move by passcode and applies it.
    ///
    /// Broadcasts the new state when the move changed it.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidGameOrPasscode`] if the game is unknown or
    /// no seat holds the passcode; [`RegistryError::Move`] if the game
    /// rejects the move. Nothing is mutated or broadcast on error.
    #[instrument(skip(self, passcode))]
    pub fn submit_move(
        &self,
        game_id: &GameId,
        passcode: &Passcode,
        action: Move,
    ) -> Result<Transition, RegistryError> {
        let session = self.session(game_id).ok_or_else(|| {
            warn!("Move for unknown game");
            RegistryError::InvalidGameOrPasscode
        })?;
        let mut session = lock(&session);
        let seat = session.seat_of(passcode).ok_or_else(|| {
            warn!("Move with unrecognised passcode");
            RegistryError::InvalidGameOrPasscode
        })?;

        let transition = session.state.apply(seat, action, &mut rand::rng())?;
        if session.state.phase() == Phase::GameOver && session.finished_at.is_none() {
            session.finished_at = Some(Instant::now());
        }
        if transition.changed_state() {
            session.broadcast();
        }
        debug!(?seat, ?transition, "Move applied");
        Ok(transition)
    }

    /// Forgets a closed connection. The seat and the game stay open.
    #[instrument(skip(self))]
    pub fn detach(&self, game_id: &GameId, connection: ConnectionId) {
        let Some(session) = self.session(game_id) else {
            return;
        };
        let mut session = lock(&session);
        for seat in session.seats.iter_mut().flatten() {
            if seat.connection.as_ref().is_some_and(|c| c.id() == connection) {
                seat.connection = None;
                info!("Player disconnected");
            }
        }
    }

    /// Removes games that have been over for at least `grace`, returning
    /// their passcodes to the pool. Returns the ids removed.
    #[instrument(skip(self))]
    pub fn reap_finished(&self, now: Instant, grace: Duration) -> Vec<GameId> {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let mut released = Vec::new();
        let mut reaped = Vec::new();

        games.retain(|id, session| {
            let session = lock(session);
            let expired = session
                .finished_at
                .is_some_and(|at| now.saturating_duration_since(at) >= grace);
            if expired {
                released.extend(session.passcodes().cloned());
                reaped.push(id.clone());
            }
            !expired
        });

        if !released.is_empty() {
            let mut issued = lock(&self.passcodes);
            for passcode in &released {
                issued.remove(passcode);
            }
        }
        if !reaped.is_empty() {
            info!(count = reaped.len(), remaining = games.len(), "Reaped finished games");
        }
        reaped
    }

    /// Returns a copy of a game's current state.
    pub fn snapshot(&self, game_id: &GameId) -> Option<GameState> {
        self.session(game_id).map(|s| lock(&s).state.clone())
    }

}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
