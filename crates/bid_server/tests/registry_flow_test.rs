//! Full games driven through client frames, as the websocket layer sees them.

use bid_server::{Connection, ConnectionId, GameId, SessionRegistry, handle_frame, spawn_reaper};
use bid_tictactoe::{Outcome, Phase, Seat};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

struct Client {
    connection: Connection,
    inbox: mpsc::UnboundedReceiver<String>,
    passcode: String,
}

impl Client {
    fn new(id: u64) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        Self {
            connection: Connection::new(ConnectionId::new(id), Arc::new(tx)),
            inbox,
            passcode: String::new(),
        }
    }

    fn send(&self, registry: &SessionRegistry, frame: Value) -> Option<GameId> {
        handle_frame(registry, &self.connection, &frame.to_string())
    }

    fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.inbox.try_recv() {
            frames.push(serde_json::from_str(&frame).expect("valid json frame"));
        }
        frames
    }

    fn make_move(&self, registry: &SessionRegistry, game_id: &GameId, mut payload: Value) {
        payload["type"] = json!("MAKE_MOVE");
        payload["gameId"] = json!(game_id.as_str());
        payload["passcode"] = json!(self.passcode);
        self.send(registry, payload);
    }
}

/// Creates a game, joins it, and returns both clients with their passcodes.
fn seated_pair(registry: &SessionRegistry) -> (GameId, Client, Client) {
    let mut creator = Client::new(1);
    let game_id = creator
        .send(registry, json!({"type": "CREATE_GAME"}))
        .expect("game created");
    let created = creator.drain();
    assert_eq!(created[0]["type"], "GAME_CREATED");
    assert_eq!(created[0]["gameId"], game_id.as_str());
    creator.passcode = created[0]["passcode"].as_str().unwrap().to_string();

    let mut joiner = Client::new(2);
    joiner.send(registry, json!({"type": "JOIN_GAME", "gameId": game_id.as_str()}));
    let joined = joiner.drain();
    assert_eq!(joined[0]["type"], "GAME_JOINED");
    joiner.passcode = joined[0]["passcode"].as_str().unwrap().to_string();

    (game_id, creator, joiner)
}

#[test]
fn test_create_join_bid_and_fill_board_to_tie() {
    let registry = SessionRegistry::new();
    let (game_id, mut creator, mut joiner) = seated_pair(&registry);

    let state = &creator.drain()[0];
    assert_eq!(state["type"], "GAME_STATE");
    assert_eq!(state["playerIndex"], 0);
    assert_eq!(state["gameState"]["gamePhase"], "initialBidding");

    // Strings, as form inputs send them.
    creator.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": "12"}));
    joiner.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": "4"}));
    creator.make_move(&registry, &game_id, json!({"moveType": "SUBMIT_INITIAL_BID"}));

    let last = joiner.drain().pop().expect("state after auction");
    assert_eq!(last["playerIndex"], 1);
    assert_eq!(last["gameState"]["gamePhase"], "playing");
    assert_eq!(last["gameState"]["players"][0]["mark"], "X");
    assert_eq!(last["gameState"]["players"][0]["funds"], 88);
    assert_eq!(last["gameState"]["players"][1]["mark"], "O");

    // Uncontested rounds leave X X O / O O X / X O X.
    for cell in [1, 3, 2, 4, 6, 5, 7, 8, 9] {
        for client in [&creator, &joiner] {
            client.make_move(&registry, &game_id, json!({"moveType": "PLACEMENT_BID", "bid": 0}));
            client.make_move(&registry, &game_id, json!({"moveType": "PLACEMENT_POSITION", "position": cell}));
        }
        joiner.make_move(&registry, &game_id, json!({"moveType": "SUBMIT_PLACEMENT"}));
    }

    let errors: Vec<_> = creator
        .drain()
        .into_iter()
        .chain(joiner.drain())
        .filter(|f| f["type"] == "ERROR")
        .collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let state = registry.snapshot(&game_id).expect("game still registered");
    assert_eq!(state.phase(), Phase::GameOver);
    assert_eq!(state.winner(), Some(Outcome::Tie));
    assert_eq!(state.player(Seat::First).funds(), 88);

    // Terminal: further moves are refused to the sender only.
    creator.make_move(&registry, &game_id, json!({"moveType": "SUBMIT_PLACEMENT"}));
    assert_eq!(creator.drain()[0]["type"], "ERROR");
    assert!(joiner.drain().is_empty());
}

#[test]
fn test_third_player_and_bad_passcode_rejected() {
    let registry = SessionRegistry::new();
    let (game_id, mut creator, mut joiner) = seated_pair(&registry);
    creator.drain();
    joiner.drain();

    let mut third = Client::new(3);
    third.send(&registry, json!({"type": "JOIN_GAME", "gameId": game_id.as_str()}));
    let frames = third.drain();
    assert_eq!(frames, vec![json!({"type": "ERROR", "message": "Game is already full"})]);

    third.passcode = "not-a-code".into();
    third.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": 5}));
    assert_eq!(third.drain()[0]["message"], "Invalid game or passcode");
    assert!(creator.drain().is_empty());
    assert!(joiner.drain().is_empty());
}

#[test]
fn test_passcode_only_valid_in_its_own_game() {
    let registry = SessionRegistry::new();
    let (first_game, mut creator, _) = seated_pair(&registry);
    let (second_game, _, _) = seated_pair(&registry);
    assert_ne!(first_game, second_game);
    creator.drain();

    creator.make_move(&registry, &second_game, json!({"moveType": "INITIAL_BID", "bid": 5}));
    assert_eq!(creator.drain()[0]["message"], "Invalid game or passcode");
}

#[test]
fn test_bid_above_funds_reported() {
    let registry = SessionRegistry::new();
    let (game_id, mut creator, _) = seated_pair(&registry);
    creator.drain();

    creator.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": 150}));
    let frames = creator.drain();
    assert_eq!(frames[0]["type"], "ERROR");
    assert_eq!(frames[0]["message"], "Bid of 150 exceeds remaining funds of 100");
}

#[test]
fn test_game_state_frames_repeat_byte_identical() {
    let registry = SessionRegistry::new();
    let (game_id, mut creator, _) = seated_pair(&registry);
    creator.drain();

    // Staging then clearing the same slot returns to the same state.
    creator.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": ""}));
    creator.make_move(&registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": ""}));
    let frames: Vec<_> = creator.drain().into_iter().map(|f| f.to_string()).collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], frames[1]);
}

fn finish_quickly(registry: &SessionRegistry) -> GameId {
    let (game_id, creator, joiner) = seated_pair(registry);
    creator.make_move(registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": 1}));
    joiner.make_move(registry, &game_id, json!({"moveType": "INITIAL_BID", "bid": 0}));
    // Creator holds X and wins every uncontested X round; joiner the O rounds.
    for cell in [1, 4, 2, 5, 3] {
        for client in [&creator, &joiner] {
            client.make_move(registry, &game_id, json!({"moveType": "PLACEMENT_BID", "bid": 0}));
            client.make_move(registry, &game_id, json!({"moveType": "PLACEMENT_POSITION", "position": cell}));
        }
        creator.make_move(registry, &game_id, json!({"moveType": "SUBMIT_PLACEMENT"}));
    }
    let state = registry.snapshot(&game_id).expect("registered");
    assert_eq!(state.winner(), Some(Outcome::X));
    game_id
}

#[test]
fn test_finished_games_reaped_after_grace() {
    let registry = SessionRegistry::new();
    let finished = finish_quickly(&registry);
    let (open, _, _) = seated_pair(&registry);

    let grace = Duration::from_secs(30);
    assert!(registry.reap_finished(Instant::now(), grace).is_empty());

    let later = Instant::now() + Duration::from_secs(31);
    assert_eq!(registry.reap_finished(later, grace), vec![finished.clone()]);
    assert!(registry.snapshot(&finished).is_none());
    assert!(registry.snapshot(&open).is_some());

    let mut late = Client::new(9);
    late.send(&registry, json!({"type": "JOIN_GAME", "gameId": finished.as_str()}));
    assert_eq!(late.drain()[0]["message"], "Game not found");
}

#[tokio::test]
async fn test_reaper_task_removes_finished_games() {
    let registry = SessionRegistry::new();
    let finished = finish_quickly(&registry);

    let reaper = spawn_reaper(registry.clone(), Duration::ZERO, Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    reaper.abort();

    assert!(registry.snapshot(&finished).is_none());
}
