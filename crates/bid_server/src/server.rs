//! Websocket transport.
//!
//! Accepts connections at `/` and `/ws`, decodes client frames, routes them
//! through the [`SessionRegistry`], and drains each connection's outbox
//! back onto its socket.

use crate::config::ServerConfig;
use crate::gateway::{Connection, ConnectionId};
use crate::passcode::GameId;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{RegistryError, SessionRegistry};
use axum::body::Body;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::Request;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: SessionRegistry,
    next_connection: Arc<AtomicU64>,
}

impl AppState {
    /// Wraps a registry.
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            registry,
            next_connection: Arc::new(AtomicU64::new(1)),
        }
    }

    fn connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_connection.fetch_add(1, Ordering::Relaxed))
    }
}

/// Builds the application router.
pub fn router(registry: SessionRegistry) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(AppState::new(registry))
}

async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

#[instrument(skip_all, fields(connection = tracing::field::Empty))]
async fn handle_socket(state: AppState, socket: WebSocket) {
    let id = state.connection_id();
    tracing::Span::current().record("connection", tracing::field::display(id));
    info!("Client connected");

    let (mut sink, mut stream) = socket.split();
    let (outbox, mut pending) = mpsc::unbounded_channel::<String>();
    let connection = Connection::new(id, Arc::new(outbox));

    let writer = tokio::spawn(async move {
        while let Some(frame) = pending.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let mut seated = Vec::new();
    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                if let Some(game_id) = handle_frame(&state.registry, &connection, text.as_str()) {
                    seated.push(game_id);
                }
            }
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    for game_id in &seated {
        state.registry.detach(game_id, id);
    }
    writer.abort();
    info!(games = seated.len(), "Client disconnected");
}

/// Handles one text frame from a client.
///
/// Errors are reported to the sending connection only. Returns the game
/// the connection took a seat in, if the frame created or joined one.
#[instrument(skip_all, fields(connection = %connection.id()))]
pub fn handle_frame(
    registry: &SessionRegistry,
    connection: &Connection,
    frame: &str,
) -> Option<GameId> {
    let message = match serde_json::from_str::<ClientMessage>(frame) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Malformed client frame");
            reply_error(connection, format!("Malformed message: {}", e));
            return None;
        }
    };
    debug!(?message, "Client frame");

    match message {
        ClientMessage::CreateGame => match registry.create_game(connection.clone()) {
            Ok((game_id, _)) => Some(game_id),
            Err(e) => {
                reply_error(connection, e.to_string());
                None
            }
        },
        ClientMessage::JoinGame { game_id } => {
            match registry.join_game(&game_id, connection.clone()) {
                Ok(_) => Some(game_id),
                Err(e) => {
                    reply_error(connection, e.to_string());
                    None
                }
            }
        }
        ClientMessage::MakeMove(request) => {
            let result = request
                .body
                .into_move()
                .map_err(RegistryError::from)
                .and_then(|action| registry.submit_move(&request.game_id, &request.passcode, action));
            if let Err(e) = result {
                reply_error(connection, e.to_string());
            }
            None
        }
    }
}

fn reply_error(connection: &Connection, message: String) {
    if let Err(e) = connection.send(&ServerMessage::Error { message }) {
        warn!(error = %e, "Could not deliver error reply");
    }
}

/// Periodically removes finished games older than `grace`.
pub fn spawn_reaper(registry: SessionRegistry, grace: Duration, every: Duration) -> JoinHandle<()> {
    info!(?grace, ?every, "Starting reaper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            registry.reap_finished(Instant::now(), grace);
        }
    })
}

/// Binds the configured address and serves until the listener fails.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let registry = SessionRegistry::with_starting_funds(*config.starting_funds());

    let reaper = config
        .reap_after()
        .map(|grace| spawn_reaper(registry.clone(), grace, config.reap_interval()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at ws://{}:{}/ws", config.host(), config.port());

    let result = axum::serve(listener, router(registry)).await;
    if let Some(reaper) = reaper {
        reaper.abort();
    }
    result?;
    Ok(())
}
