//! Full-state synchronization between clients.
//!
//! After every committed local change the client broadcasts its whole element
//! list. Inbound lists replace the local one wholesale, so the last message
//! applied wins. There is no merging and no versioning; two clients editing at
//! once can overwrite each other.

use crate::elements::Element;
use crate::scene::Scene;
use crate::sync::{ConnectionState, SyncEvent, SyncMessage, Transport, decode_inbound};

/// Bridges a [`Transport`] and the local scene.
pub struct SyncClient<T: Transport> {
    transport: T,
    /// Frames sent since creation.
    sent: usize,
    /// Inbound lists applied since creation.
    applied: usize,
}

impl<T: Transport> SyncClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            applied: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
    }

    pub fn applied_count(&self) -> usize {
        self.applied
    }

    /// Send the full element list to peers.
    ///
    /// Skipped (not queued) while the channel is not open. Returns whether a
    /// frame went out.
    pub fn broadcast(&mut self, elements: &[Element]) -> bool {
        if !self.transport.is_open() {
            log::debug!("Channel not open, dropping broadcast of {} elements", elements.len());
            return false;
        }
        let json = match SyncMessage::sync(elements).to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode sync message: {}", e);
                return false;
            }
        };
        match self.transport.send(&json) {
            Ok(()) => {
                self.sent += 1;
                true
            }
            Err(e) => {
                log::warn!("Broadcast failed: {}", e);
                false
            }
        }
    }

    /// Drain transport events and apply inbound lists in arrival order.
    ///
    /// Malformed payloads are logged and dropped without touching the scene.
    /// Returns how many lists were applied.
    pub fn poll(&mut self, scene: &mut Scene) -> usize {
        let mut applied = 0;
        for event in self.transport.poll_events() {
            match event {
                SyncEvent::Connected => log::info!("Collaboration channel open"),
                SyncEvent::Disconnected => log::info!("Collaboration channel closed"),
                SyncEvent::Error { message } => log::error!("Collaboration channel error: {}", message),
                SyncEvent::Message(text) => match decode_inbound(&text) {
                    Ok(elements) => {
                        log::debug!("Applying remote scene with {} elements", elements.len());
                        scene.set_elements(elements);
                        applied += 1;
                    }
                    Err(e) => log::warn!("Dropping inbound message: {}", e),
                },
            }
        }
        self.applied += applied;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, DEFAULT_STROKE, ElementId, ElementKind};
    use crate::sync::{LoopbackHub, LoopbackTransport};

    fn rect(id: &str, x: f64) -> Element {
        Element::with_id(
            ElementId::from(id),
            ElementKind::Rectangle(BoxSize::new(10.0, 10.0)),
            x,
            0.0,
            DEFAULT_STROKE,
        )
    }

    fn connected(hub: &LoopbackHub) -> (SyncClient<LoopbackTransport>, Scene) {
        let mut client = SyncClient::new(hub.connect());
        let mut scene = Scene::new();
        client.poll(&mut scene);
        (client, scene)
    }

    #[test]
    fn test_broadcast_skipped_until_open() {
        let hub = LoopbackHub::new();
        let mut client = SyncClient::new(hub.connect());
        assert!(!client.broadcast(&[rect("a", 0.0)]));
        assert_eq!(client.sent_count(), 0);

        client.poll(&mut Scene::new());
        assert!(client.is_open());
        assert!(client.broadcast(&[rect("a", 0.0)]));
        assert_eq!(client.sent_count(), 1);
    }

    #[test]
    fn test_remote_list_replaces_local() {
        let hub = LoopbackHub::new();
        let (mut a, _) = connected(&hub);
        let (mut b, mut scene_b) = connected(&hub);
        scene_b.add_element(rect("local", 0.0));

        a.broadcast(&[rect("x", 1.0), rect("y", 2.0)]);
        assert_eq!(b.poll(&mut scene_b), 1);

        let ids: Vec<&str> = scene_b.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn test_malformed_messages_leave_scene_alone() {
        let hub = LoopbackHub::new();
        let (mut raw, _) = connected(&hub);
        let (mut client, mut scene) = connected(&hub);
        scene.add_element(rect("keep", 0.0));

        for text in [
            "garbage",
            r#"{"type":"cursor","x":1}"#,
            r#"{"type":"sync","elements":"nope"}"#,
            r#"{"type":"sync","elements":[{"id":"q","type":"hexagon_star","x":0,"y":0}]}"#,
        ] {
            raw.transport_mut().send(text).unwrap();
        }

        assert_eq!(client.poll(&mut scene), 0);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.elements()[0].id.as_str(), "keep");
    }

    #[test]
    fn test_last_message_wins() {
        let hub = LoopbackHub::new();
        let (mut a, mut scene_a) = connected(&hub);
        let (mut b, mut scene_b) = connected(&hub);
        let (mut observer, mut scene_c) = connected(&hub);

        scene_a.add_element(rect("e1", 0.0));
        a.broadcast(scene_a.elements());
        scene_b.add_element(rect("e2", 0.0));
        b.broadcast(scene_b.elements());

        assert_eq!(observer.poll(&mut scene_c), 2);
        let ids: Vec<&str> = scene_c.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e2"]);
    }
}
