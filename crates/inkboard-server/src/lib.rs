//! Inkboard WebSocket Relay Server
//!
//! A single shared board: every text frame a client sends is forwarded,
//! unchanged, to every other connected client. The server never parses or
//! stores the payload, so clients own the `{"type":"sync","elements":[...]}`
//! protocol entirely.
//!
//! Routes:
//! - `GET /ws` WebSocket relay
//! - `GET /api/health` returns `{"status":"ok"}`
//! - anything else is served from the static directory, if configured,
//!   falling back to `index.html` for client-side routes

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Frames buffered per receiver before a slow client starts lagging.
const CHANNEL_CAPACITY: usize = 256;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid INKBOARD_ADDR {value:?}: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Built client assets to serve next to the relay.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read `INKBOARD_ADDR` and `INKBOARD_STATIC_DIR` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = lookup("INKBOARD_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = value
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value, source })?;
        let static_dir = lookup("INKBOARD_STATIC_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        Ok(Self { addr, static_dir })
    }
}

/// A frame on its way to every peer except `from`.
#[derive(Debug, Clone)]
struct Relayed {
    from: Uuid,
    text: Utf8Bytes,
}

/// Shared application state
pub struct AppState {
    tx: broadcast::Sender<Relayed>,
    peers: AtomicUsize,
}

impl AppState {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: AtomicUsize::new(0),
        }
    }

    /// Currently connected clients.
    pub fn peer_count(&self) -> usize {
        self.peers.load(Ordering::Relaxed)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Assemble the router.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/health", get(health))
        .with_state(state);

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive())
}

/// Health check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Subscribe before the upgrade completes so frames sent by others right
    // after the handshake are not missed.
    let rx = state.tx.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, state, rx))
}

/// Relay frames between one client and the shared channel.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut rx: broadcast::Receiver<Relayed>) {
    let peer_id = Uuid::new_v4();
    let peers = state.peers.fetch_add(1, Ordering::Relaxed) + 1;
    info!("New connection: {} ({} connected)", peer_id, peers);

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Relaying {} bytes from {}", text.len(), peer_id);
                        // No receivers besides ourselves is not an error.
                        let _ = state.tx.send(Relayed { from: peer_id, text });
                    }
                    Some(Ok(Message::Binary(data))) => {
                        debug!("Ignoring {} byte binary frame from {}", data.len(), peer_id);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ping/pong handled by axum
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer_id, e);
                        break;
                    }
                }
            }

            relayed = rx.recv() => {
                match relayed {
                    Ok(Relayed { from, text }) => {
                        // Don't echo back to sender
                        if from != peer_id && sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Peer {} lagged, {} frames dropped", peer_id, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    let peers = state.peers.fetch_sub(1, Ordering::Relaxed) - 1;
    info!("Connection closed: {} ({} connected)", peer_id, peers);
}
