//! Blocking tungstenite socket driven from a background thread.

use super::{ConnectionState, SyncEvent, Transport, TransportError};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tungstenite::{Message, connect};
use url::Url;

/// Commands sent to the WebSocket thread.
enum WsCommand {
    Send(String),
    Close,
}

/// WebSocket client for native platforms.
///
/// Uses a background thread for non-blocking operation. State changes are
/// observed through [`Transport::poll_events`].
pub struct NativeWebSocket {
    state: ConnectionState,
    events: Vec<SyncEvent>,
    /// Channel to send commands to the WebSocket thread.
    cmd_tx: Option<Sender<WsCommand>>,
    /// Channel to receive events from the WebSocket thread.
    event_rx: Option<Receiver<SyncEvent>>,
    _thread: Option<JoinHandle<()>>,
}

impl NativeWebSocket {
    /// Create a new disconnected WebSocket client.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            events: Vec::new(),
            cmd_tx: None,
            event_rx: None,
            _thread: None,
        }
    }

    /// Connect to the collaboration endpoint.
    pub fn connect(&mut self, url: &str) -> Result<(), TransportError> {
        if self.cmd_tx.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let parsed_url = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        if parsed_url.scheme() != "ws" && parsed_url.scheme() != "wss" {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed_url.scheme()
            )));
        }

        self.state = ConnectionState::Connecting;

        let (cmd_tx, cmd_rx) = channel::<WsCommand>();
        let (event_tx, event_rx) = channel::<SyncEvent>();
        let url = url.to_string();

        let handle = thread::spawn(move || {
            log::info!("WebSocket thread: connecting to {}", url);

            let (mut socket, response) = match connect(&url) {
                Ok(connected) => connected,
                Err(e) => {
                    log::error!("WebSocket connection failed: {}", e);
                    let _ = event_tx.send(SyncEvent::Error {
                        message: format!("Connection failed: {}", e),
                    });
                    return;
                }
            };
            log::info!("WebSocket connected, status: {}", response.status());
            let _ = event_tx.send(SyncEvent::Connected);

            // Short read timeout so the loop can service outgoing commands.
            match socket.get_mut() {
                tungstenite::stream::MaybeTlsStream::Plain(tcp) => {
                    let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
                    let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
                }
                #[allow(unreachable_patterns)]
                _ => log::debug!("TLS or other stream - using default timeout handling"),
            }

            loop {
                match cmd_rx.try_recv() {
                    Ok(WsCommand::Send(msg)) => {
                        log::debug!("WebSocket sending {} bytes", msg.len());
                        if let Err(e) = socket.send(Message::Text(msg)) {
                            log::error!("WebSocket send error: {}", e);
                            break;
                        }
                    }
                    Ok(WsCommand::Close) => {
                        log::info!("WebSocket close requested");
                        let _ = socket.close(None);
                        break;
                    }
                    Err(TryRecvError::Disconnected) => {
                        log::info!("WebSocket command channel disconnected");
                        break;
                    }
                    Err(TryRecvError::Empty) => {}
                }

                match socket.read() {
                    Ok(Message::Text(txt)) => {
                        log::debug!("WebSocket received {} bytes", txt.len());
                        let _ = event_tx.send(SyncEvent::Message(txt));
                    }
                    Ok(Message::Ping(data)) => {
                        let _ = socket.send(Message::Pong(data));
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("WebSocket received close frame");
                        break;
                    }
                    Ok(_) => {}
                    Err(tungstenite::Error::Io(ref e))
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut =>
                    {
                        continue;
                    }
                    Err(e) => {
                        log::error!("WebSocket read error: {}", e);
                        break;
                    }
                }
            }

            log::info!("WebSocket thread exiting");
            let _ = event_tx.send(SyncEvent::Disconnected);
        });

        self.cmd_tx = Some(cmd_tx);
        self.event_rx = Some(event_rx);
        self._thread = Some(handle);

        Ok(())
    }

    /// Disconnect from the server.
    pub fn disconnect(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(WsCommand::Close);
        }
        self.event_rx = None;
        self._thread = None;
        self.state = ConnectionState::Disconnected;
    }
}

impl Transport for NativeWebSocket {
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let Some(tx) = &self.cmd_tx else {
            return Err(TransportError::NotConnected);
        };
        tx.send(WsCommand::Send(text.to_string()))
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn poll_events(&mut self) -> Vec<SyncEvent> {
        if let Some(rx) = &self.event_rx {
            while let Ok(event) = rx.try_recv() {
                match &event {
                    SyncEvent::Connected => self.state = ConnectionState::Connected,
                    SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                    SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                    SyncEvent::Message(_) => {}
                }
                self.events.push(event);
            }
        }
        std::mem::take(&mut self.events)
    }
}

impl Default for NativeWebSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NativeWebSocket {
    fn drop(&mut self) {
        self.disconnect();
    }
}
