//! In-process relay used by tests and offline hosts.
//!
//! Behaves like the relay server: every frame a peer sends is delivered,
//! in send order, to every other connected peer and never back to the
//! sender.

use super::{ConnectionState, SyncEvent, Transport, TransportError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Peer {
    open: bool,
    inbox: VecDeque<SyncEvent>,
}

#[derive(Debug, Default)]
struct HubInner {
    peers: Vec<Peer>,
}

/// Shared relay; clone to hand to more owners.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHub {
    inner: Rc<RefCell<HubInner>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new peer. Its first poll reports [`SyncEvent::Connected`].
    pub fn connect(&self) -> LoopbackTransport {
        let mut inner = self.inner.borrow_mut();
        let mut inbox = VecDeque::new();
        inbox.push_back(SyncEvent::Connected);
        inner.peers.push(Peer { open: true, inbox });
        LoopbackTransport {
            hub: self.clone(),
            peer: inner.peers.len() - 1,
            state: ConnectionState::Connecting,
        }
    }

    /// Number of connected peers.
    pub fn peer_count(&self) -> usize {
        self.inner.borrow().peers.iter().filter(|p| p.open).count()
    }

    fn relay(&self, from: usize, text: &str) {
        let mut inner = self.inner.borrow_mut();
        for (index, peer) in inner.peers.iter_mut().enumerate() {
            if index != from && peer.open {
                peer.inbox.push_back(SyncEvent::Message(text.to_string()));
            }
        }
    }
}

/// One peer's end of a [`LoopbackHub`].
#[derive(Debug)]
pub struct LoopbackTransport {
    hub: LoopbackHub,
    peer: usize,
    state: ConnectionState,
}

impl LoopbackTransport {
    /// Drop off the hub. Frames relayed afterwards are not delivered.
    pub fn disconnect(&mut self) {
        let mut inner = self.hub.inner.borrow_mut();
        if let Some(peer) = inner.peers.get_mut(self.peer) {
            peer.open = false;
            peer.inbox.clear();
            peer.inbox.push_back(SyncEvent::Disconnected);
        }
    }
}

impl Transport for LoopbackTransport {
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if self.state != ConnectionState::Connected {
            return Err(TransportError::NotConnected);
        }
        self.hub.relay(self.peer, text);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SyncEvent> {
        let events: Vec<SyncEvent> = {
            let mut inner = self.hub.inner.borrow_mut();
            match inner.peers.get_mut(self.peer) {
                Some(peer) => peer.inbox.drain(..).collect(),
                None => Vec::new(),
            }
        };
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_skips_sender() {
        let hub = LoopbackHub::new();
        let mut a = hub.connect();
        let mut b = hub.connect();
        assert_eq!(a.poll_events(), vec![SyncEvent::Connected]);
        assert_eq!(b.poll_events(), vec![SyncEvent::Connected]);

        a.send("one").unwrap();
        a.send("two").unwrap();

        assert!(a.poll_events().is_empty());
        assert_eq!(
            b.poll_events(),
            vec![SyncEvent::Message("one".into()), SyncEvent::Message("two".into())]
        );
    }

    #[test]
    fn test_send_requires_open_channel() {
        let hub = LoopbackHub::new();
        let mut a = hub.connect();
        assert!(matches!(a.send("early"), Err(TransportError::NotConnected)));

        a.poll_events();
        a.disconnect();
        a.poll_events();
        assert_eq!(a.state(), ConnectionState::Disconnected);
        assert!(a.send("late").is_err());
        assert_eq!(hub.peer_count(), 0);
    }
}
