//! Message channel to the collaboration endpoint.
//!
//! Every client sends its whole element list as `{"type":"sync","elements":[...]}`
//! and receives the same shape from peers. Transports only move text; the
//! [`SyncClient`](crate::collaboration::SyncClient) decides what to do with it.

mod loopback;

pub use loopback::{LoopbackHub, LoopbackTransport};

use crate::elements::Element;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Messages exchanged between clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncMessage {
    /// Full element list of the sender.
    Sync { elements: Vec<Element> },
}

impl SyncMessage {
    pub fn sync(elements: &[Element]) -> Self {
        SyncMessage::Sync {
            elements: elements.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why an inbound payload was dropped.
#[derive(Debug, Error)]
pub enum InboundError {
    #[error("payload is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),
    #[error("unsupported message type: {0}")]
    UnknownType(String),
    #[error("sync message has no elements array")]
    MissingElements,
    #[error("invalid element in sync message: {0}")]
    InvalidElement(#[source] serde_json::Error),
}

/// Decode an inbound text frame into the element list it carries.
pub fn decode_inbound(text: &str) -> Result<Vec<Element>, InboundError> {
    let mut value: Value = serde_json::from_str(text).map_err(InboundError::NotJson)?;
    match value.get("type").and_then(Value::as_str) {
        Some("sync") => {}
        Some(other) => return Err(InboundError::UnknownType(other.to_string())),
        None => return Err(InboundError::UnknownType(String::from("<missing>"))),
    }
    let elements = match value.get_mut("elements").map(Value::take) {
        Some(elements @ Value::Array(_)) => elements,
        _ => return Err(InboundError::MissingElements),
    };
    serde_json::from_value(elements).map_err(InboundError::InvalidElement)
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events from a transport
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Channel is open.
    Connected,
    /// Channel closed.
    Disconnected,
    /// A text frame from a peer.
    Message(String),
    /// Error occurred
    Error { message: String },
}

/// Transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("already connected")]
    AlreadyConnected,
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("not connected")]
    NotConnected,
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// A reliable, ordered text channel.
pub trait Transport {
    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Send one text frame.
    fn send(&mut self, text: &str) -> Result<(), TransportError>;

    /// Drain pending events (non-blocking).
    fn poll_events(&mut self) -> Vec<SyncEvent>;

    /// Whether sends can currently go out.
    fn is_open(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Collaboration endpoint for a page served from `host`: `wss://host/ws`
/// when the page itself is secure, `ws://host/ws` otherwise.
pub fn endpoint_url(secure: bool, host: &str) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}/ws")
}

// ============================================================================
// WASM WebSocket Client
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_client;

#[cfg(target_arch = "wasm32")]
pub use wasm_client::WasmWebSocket;

// ============================================================================
// Native WebSocket Client
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_client;

#[cfg(not(target_arch = "wasm32"))]
pub use native_client::NativeWebSocket;

/// Platform-specific WebSocket client type.
#[cfg(target_arch = "wasm32")]
pub type PlatformWebSocket = WasmWebSocket;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformWebSocket = NativeWebSocket;
