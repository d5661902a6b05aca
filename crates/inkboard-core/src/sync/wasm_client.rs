//! Browser WebSocket with callbacks queued into a shared event list.

use super::{ConnectionState, SyncEvent, Transport, TransportError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

/// WebSocket client for WASM.
///
/// Events are collected and must be polled via `poll_events()`.
pub struct WasmWebSocket {
    ws: Option<WebSocket>,
    state: ConnectionState,
    events: Rc<RefCell<Vec<SyncEvent>>>,
    // Closures must outlive the socket callbacks.
    _on_open: Option<Closure<dyn Fn()>>,
    _on_message: Option<Closure<dyn Fn(MessageEvent)>>,
    _on_close: Option<Closure<dyn Fn(CloseEvent)>>,
    _on_error: Option<Closure<dyn Fn(ErrorEvent)>>,
}

impl WasmWebSocket {
    /// Create a new disconnected WebSocket client.
    pub fn new() -> Self {
        Self {
            ws: None,
            state: ConnectionState::Disconnected,
            events: Rc::new(RefCell::new(Vec::new())),
            _on_open: None,
            _on_message: None,
            _on_close: None,
            _on_error: None,
        }
    }

    /// Connect to the endpoint of the page that loaded us.
    pub fn connect_to_origin(&mut self) -> Result<(), TransportError> {
        let location = web_sys::window()
            .ok_or_else(|| TransportError::InvalidUrl("no window".to_string()))?
            .location();
        let protocol = location
            .protocol()
            .map_err(|e| TransportError::InvalidUrl(format!("{:?}", e)))?;
        let host = location
            .host()
            .map_err(|e| TransportError::InvalidUrl(format!("{:?}", e)))?;
        self.connect(&super::endpoint_url(protocol == "https:", &host))
    }

    /// Connect to a WebSocket server.
    pub fn connect(&mut self, url: &str) -> Result<(), TransportError> {
        if self.ws.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let ws = WebSocket::new(url).map_err(|e| TransportError::InvalidUrl(format!("{:?}", e)))?;
        ws.set_binary_type(web_sys::BinaryType::Arraybuffer);

        self.state = ConnectionState::Connecting;
        let events = self.events.clone();

        let events_open = events.clone();
        let on_open = Closure::wrap(Box::new(move || {
            events_open.borrow_mut().push(SyncEvent::Connected);
        }) as Box<dyn Fn()>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let events_msg = events.clone();
        let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
            if let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() {
                events_msg.borrow_mut().push(SyncEvent::Message(txt.into()));
            }
        }) as Box<dyn Fn(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let events_close = events.clone();
        let on_close = Closure::wrap(Box::new(move |_e: CloseEvent| {
            events_close.borrow_mut().push(SyncEvent::Disconnected);
        }) as Box<dyn Fn(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let events_err = events;
        let on_error = Closure::wrap(Box::new(move |_e: ErrorEvent| {
            events_err.borrow_mut().push(SyncEvent::Error {
                message: "WebSocket error".to_string(),
            });
        }) as Box<dyn Fn(ErrorEvent)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        self.ws = Some(ws);
        self._on_open = Some(on_open);
        self._on_message = Some(on_message);
        self._on_close = Some(on_close);
        self._on_error = Some(on_error);

        Ok(())
    }

    /// Disconnect from the server.
    pub fn disconnect(&mut self) {
        if let Some(ws) = self.ws.take() {
            let _ = ws.close();
        }
        self.state = ConnectionState::Disconnected;
        self._on_open = None;
        self._on_message = None;
        self._on_close = None;
        self._on_error = None;
    }
}

impl Transport for WasmWebSocket {
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let Some(ws) = &self.ws else {
            return Err(TransportError::NotConnected);
        };
        ws.send_with_str(text)
            .map_err(|e| TransportError::SendFailed(format!("{:?}", e)))
    }

    fn poll_events(&mut self) -> Vec<SyncEvent> {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        for event in &events {
            match event {
                SyncEvent::Connected => self.state = ConnectionState::Connected,
                SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                SyncEvent::Message(_) => {}
            }
        }
        events
    }
}

impl Default for WasmWebSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WasmWebSocket {
    fn drop(&mut self) {
        self.disconnect();
    }
}
