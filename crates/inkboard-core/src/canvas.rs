//! Whiteboard state for one client.
//!
//! [`Canvas`] wires the scene store, history, interaction controller and sync
//! client together. Hosts feed it input events, network polls and frame ticks
//! from a single run loop and read the scene back for rendering.

use crate::camera::Camera;
use crate::collaboration::SyncClient;
use crate::config::EngineConfig;
use crate::document::{self, DocumentResult};
use crate::elements::{Element, IconKind};
use crate::history::History;
use crate::input::{KeyEvent, PointerEvent, Shortcut};
use crate::interaction::{Effect, Gesture, InteractionController};
use crate::laser::{FrameTick, LaserTrail};
use crate::scene::Scene;
use crate::selection::{Handle, handles_for};
use crate::sync::Transport;
use crate::tools::ToolKind;
use kurbo::Point;

/// One client's whiteboard.
pub struct Canvas<T: Transport> {
    scene: Scene,
    history: History,
    controller: InteractionController,
    sync: SyncClient<T>,
    /// Set whenever the element list may have changed; cleared by the host.
    changed: bool,
}

impl<T: Transport> Canvas<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, EngineConfig::default())
    }

    pub fn with_config(transport: T, config: EngineConfig) -> Self {
        let scene = Scene::with_camera(Camera::with_limits(config.min_zoom, config.max_zoom));
        Self {
            scene,
            history: History::new(),
            controller: InteractionController::new(config),
            sync: SyncClient::new(transport),
            changed: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn elements(&self) -> &[Element] {
        self.scene.elements()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        self.controller.config()
    }

    pub fn gesture(&self) -> &Gesture {
        self.controller.gesture()
    }

    pub fn laser(&self) -> &LaserTrail {
        self.controller.laser()
    }

    pub fn sync(&self) -> &SyncClient<T> {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut SyncClient<T> {
        &mut self.sync
    }

    /// Resize handles of the selected element, for the renderer.
    pub fn selection_handles(&self) -> Vec<Handle> {
        self.scene.selected_element().map(handles_for).unwrap_or_default()
    }

    /// Whether the element list changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Handle a pointer, touch or wheel event.
    ///
    /// Broadcasts are performed here; the returned effect is whatever the
    /// host still has to act on.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Effect> {
        let was_mutating = self.controller.gesture().mutates_scene();
        let effect = self
            .controller
            .handle_pointer(event, &mut self.scene, &mut self.history);
        if was_mutating || self.controller.gesture().mutates_scene() {
            self.changed = true;
        }
        self.apply(effect)
    }

    /// Handle a key press. Returns whether the key was consumed; delete keys
    /// are only consumed when there is a selection to remove.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match Shortcut::from_key(event) {
            Some(Shortcut::Undo) => {
                self.undo();
                true
            }
            Some(Shortcut::Redo) => {
                self.redo();
                true
            }
            Some(Shortcut::DeleteSelection) => self.delete_selected(),
            None => false,
        }
    }

    /// World position of an open text entry.
    pub fn pending_text_entry(&self) -> Option<Point> {
        self.controller.pending_text()
    }

    pub fn commit_text(&mut self, text: &str) {
        let effect = self.controller.commit_text(text, &mut self.scene, &mut self.history);
        self.apply(effect);
    }

    pub fn cancel_text(&mut self) {
        self.controller.cancel_text();
    }

    /// Drop a library icon at a screen position.
    pub fn drop_icon(&mut self, icon: IconKind, position: Point) {
        let effect = self
            .controller
            .drop_icon(icon, position, &mut self.scene, &mut self.history);
        self.apply(effect);
    }

    /// Undo locally. Peers are not told.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.scene);
        self.changed |= undone;
        undone
    }

    /// Redo locally. Peers are not told.
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.scene);
        self.changed |= redone;
        redone
    }

    /// Remove the selected element and tell peers.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.scene.selection().cloned() else {
            return false;
        };
        if self.scene.get(&id).is_none() {
            self.scene.select_element(None);
            return false;
        }
        self.history.save_snapshot(&self.scene);
        self.scene.remove_element(&id);
        self.scene.select_element(None);
        self.apply(Some(Effect::Broadcast));
        true
    }

    /// Remove every element and tell peers. No-op on an empty scene.
    pub fn clear(&mut self) -> bool {
        if self.scene.is_empty() {
            return false;
        }
        self.history.save_snapshot(&self.scene);
        self.scene.set_elements(Vec::new());
        self.scene.select_element(None);
        self.apply(Some(Effect::Broadcast));
        true
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.scene.set_tool(tool);
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.scene.set_stroke_color(color);
    }

    pub fn zoom_in(&mut self) {
        let step = self.controller.config().wheel_zoom_step;
        self.scene.camera_mut().zoom_in(step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.controller.config().wheel_zoom_step;
        self.scene.camera_mut().zoom_out(step);
    }

    /// Replace the scene with an imported document.
    ///
    /// The previous scene stays reachable through undo. Peers are not told.
    pub fn import_document(&mut self, name: &str, media_type: Option<&str>, contents: &str) -> DocumentResult<()> {
        let elements = document::import_file(name, media_type, contents)?;
        log::info!("Imported {} elements from {}", elements.len(), name);
        self.history.save_snapshot(&self.scene);
        self.scene.set_elements(elements);
        self.scene.select_element(None);
        self.changed = true;
        Ok(())
    }

    /// Serialize the scene as a portable document.
    pub fn export_document(&self) -> DocumentResult<String> {
        document::export_elements(self.scene.elements())
    }

    /// Install the scene restored from storage at startup.
    pub fn restore(&mut self, elements: Vec<Element>) {
        self.scene.set_elements(elements);
    }

    /// Apply inbound sync messages. Returns how many were applied.
    pub fn poll_network(&mut self) -> usize {
        let applied = self.sync.poll(&mut self.scene);
        if applied > 0 {
            self.changed = true;
        }
        applied
    }

    /// Advance the laser fade by one animation frame.
    pub fn tick_frame(&mut self) -> FrameTick {
        self.controller.tick_laser()
    }

    /// Cancel scheduled work before the view is dropped.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }

    fn apply(&mut self, effect: Option<Effect>) -> Option<Effect> {
        match effect {
            Some(Effect::Broadcast) => {
                self.changed = true;
                self.sync.broadcast(self.scene.elements());
                None
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, ElementKind};
    use crate::input::{Modifiers, MouseButton};
    use crate::sync::{LoopbackHub, LoopbackTransport, SyncEvent, Transport, decode_inbound};
    use kurbo::Vec2;

    fn connected(hub: &LoopbackHub) -> Canvas<LoopbackTransport> {
        let mut canvas = Canvas::new(hub.connect());
        canvas.poll_network();
        canvas
    }

    /// A bare peer that records what the canvas broadcasts.
    fn observer(hub: &LoopbackHub) -> LoopbackTransport {
        let mut peer = hub.connect();
        peer.poll_events();
        peer
    }

    fn received(peer: &mut LoopbackTransport) -> Vec<Vec<Element>> {
        peer.poll_events()
            .into_iter()
            .filter_map(|event| match event {
                SyncEvent::Message(text) => decode_inbound(&text).ok(),
                _ => None,
            })
            .collect()
    }

    fn gesture(canvas: &mut Canvas<LoopbackTransport>, from: (f64, f64), to: (f64, f64)) {
        canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(from.0, from.1),
            button: MouseButton::Left,
        });
        canvas.handle_pointer(&PointerEvent::Move {
            position: Point::new(to.0, to.1),
            movement: None,
        });
        canvas.handle_pointer(&PointerEvent::Up {
            position: Point::new(to.0, to.1),
        });
    }

    fn ctrl(key: &str) -> KeyEvent {
        KeyEvent::new(key, Modifiers { ctrl: true, ..Default::default() })
    }

    #[test]
    fn test_draw_broadcasts_exactly_the_new_element() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        let mut peer = observer(&hub);

        canvas.set_tool(ToolKind::Rectangle);
        gesture(&mut canvas, (0.0, 0.0), (100.0, 80.0));

        assert_eq!(canvas.elements().len(), 1);
        let messages = received(&mut peer);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], canvas.elements());
        assert_eq!(messages[0][0].type_name(), "rectangle");
        assert_eq!(messages[0][0].size(), Some(BoxSize::new(100.0, 80.0)));
        assert!(canvas.take_changed());
        assert!(!canvas.take_changed());
    }

    #[test]
    fn test_drag_then_undo_is_one_step() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        canvas.set_tool(ToolKind::Rectangle);
        gesture(&mut canvas, (0.0, 0.0), (100.0, 80.0));

        canvas.set_tool(ToolKind::Selection);
        gesture(&mut canvas, (50.0, 40.0), (150.0, 140.0));
        assert_eq!(canvas.elements()[0].origin(), Point::new(100.0, 100.0));

        assert!(canvas.handle_key(&ctrl("z")));
        assert_eq!(canvas.elements()[0].origin(), Point::ZERO);
        assert!(canvas.handle_key(&ctrl("y")));
        assert_eq!(canvas.elements()[0].origin(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_clear_then_undo_restores() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        let mut peer = observer(&hub);
        canvas.set_tool(ToolKind::Circle);
        gesture(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        gesture(&mut canvas, (20.0, 20.0), (30.0, 30.0));
        let before = canvas.elements().to_vec();
        received(&mut peer);

        assert!(canvas.clear());
        assert!(canvas.elements().is_empty());
        assert_eq!(received(&mut peer), vec![Vec::<Element>::new()]);

        assert!(canvas.undo());
        assert_eq!(canvas.elements(), before.as_slice());
        // Undo stays local.
        assert!(received(&mut peer).is_empty());

        assert!(!Canvas::new(hub.connect()).clear());
    }

    #[test]
    fn test_delete_selected() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        let mut peer = observer(&hub);
        canvas.set_tool(ToolKind::Rectangle);
        gesture(&mut canvas, (0.0, 0.0), (50.0, 50.0));
        canvas.set_tool(ToolKind::Selection);
        canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        canvas.handle_pointer(&PointerEvent::Up {
            position: Point::new(10.0, 10.0),
        });
        assert_eq!(canvas.selection_handles().len(), 2);
        received(&mut peer);

        let mut in_field = KeyEvent::new("Delete", Modifiers::default());
        in_field.in_text_field = true;
        assert!(!canvas.handle_key(&in_field));
        assert_eq!(canvas.elements().len(), 1);

        assert!(canvas.handle_key(&KeyEvent::new("Delete", Modifiers::default())));
        assert!(canvas.elements().is_empty());
        assert!(canvas.scene().selection().is_none());
        assert_eq!(received(&mut peer), vec![Vec::<Element>::new()]);
        assert!(!canvas.delete_selected());
        let depth = canvas.history().undo_depth();
        assert!(!canvas.handle_key(&KeyEvent::new("Backspace", Modifiers::default())));
        assert_eq!(canvas.history().undo_depth(), depth);
    }

    #[test]
    fn test_text_entry_flow() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        let mut peer = observer(&hub);
        canvas.set_tool(ToolKind::Text);
        canvas.set_stroke_color("#e03131");

        let effect = canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Left,
        });
        assert!(matches!(effect, Some(Effect::OpenTextEntry { .. })));
        assert_eq!(canvas.pending_text_entry(), Some(Point::new(5.0, 5.0)));

        canvas.commit_text("hi");
        let element = &canvas.elements()[0];
        assert_eq!(element.stroke, "#e03131");
        assert_eq!(received(&mut peer).len(), 1);
    }

    #[test]
    fn test_import_replaces_without_broadcast() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        let mut peer = observer(&hub);
        canvas.drop_icon(IconKind::Cloud, Point::new(0.0, 0.0));
        received(&mut peer);

        let bad = canvas.import_document("x.inkboard", None, r#"{"not":"a list"}"#);
        assert!(bad.is_err());
        assert_eq!(canvas.elements().len(), 1);

        let exported = canvas.export_document().unwrap();
        canvas
            .import_document("board.inkboard", None, r##"[{"id":"r","type":"rectangle","x":1,"y":2,"width":3,"height":4,"stroke":"#000"}]"##)
            .unwrap();
        assert_eq!(canvas.elements()[0].id.as_str(), "r");
        assert!(received(&mut peer).is_empty());

        assert!(canvas.undo());
        assert_eq!(canvas.export_document().unwrap(), exported);
    }

    #[test]
    fn test_zoom_buttons_clamp() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        for _ in 0..100 {
            canvas.zoom_in();
        }
        assert!((canvas.scene().camera().zoom - 5.0).abs() < f64::EPSILON);
        for _ in 0..100 {
            canvas.zoom_out();
        }
        assert!((canvas.scene().camera().zoom - 0.1).abs() < f64::EPSILON);
        assert_eq!(canvas.scene().camera().offset, Vec2::ZERO);
    }

    #[test]
    fn test_offline_edits_are_not_queued() {
        let hub = LoopbackHub::new();
        let mut canvas = Canvas::new(hub.connect());
        let mut peer = observer(&hub);

        // Channel still connecting: the edit is applied locally only.
        canvas.set_tool(ToolKind::Rectangle);
        gesture(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(canvas.sync().sent_count(), 0);

        canvas.poll_network();
        gesture(&mut canvas, (20.0, 20.0), (30.0, 30.0));
        let messages = received(&mut peer);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].len(), 2);
    }

    #[test]
    fn test_three_clients_last_write_wins() {
        let hub = LoopbackHub::new();
        let mut a = connected(&hub);
        let mut b = connected(&hub);
        let mut c = connected(&hub);
        a.set_tool(ToolKind::Rectangle);
        b.set_tool(ToolKind::Circle);

        gesture(&mut a, (0.0, 0.0), (10.0, 10.0));
        gesture(&mut b, (50.0, 50.0), (60.0, 60.0));

        assert_eq!(c.poll_network(), 2);
        assert_eq!(c.elements(), b.elements());
        assert!(matches!(c.elements()[0].kind, ElementKind::Circle(_)));
    }

    #[test]
    fn test_remote_scene_mid_gesture_does_not_corrupt() {
        let hub = LoopbackHub::new();
        let mut a = connected(&hub);
        let mut b = connected(&hub);
        b.set_tool(ToolKind::Circle);
        gesture(&mut b, (100.0, 100.0), (120.0, 120.0));

        a.set_tool(ToolKind::Rectangle);
        a.handle_pointer(&PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Left,
        });
        a.poll_network();
        a.handle_pointer(&PointerEvent::Move {
            position: Point::new(40.0, 40.0),
            movement: None,
        });

        assert_eq!(a.elements(), b.elements());
        assert_eq!(a.elements()[0].size(), Some(BoxSize::new(20.0, 20.0)));
    }

    #[test]
    fn test_teardown_stops_laser() {
        let hub = LoopbackHub::new();
        let mut canvas = connected(&hub);
        canvas.set_tool(ToolKind::Laser);
        gesture(&mut canvas, (0.0, 0.0), (5.0, 5.0));
        assert_eq!(canvas.tick_frame(), FrameTick::Continue);
        canvas.teardown();
        assert_eq!(canvas.tick_frame(), FrameTick::Done);
        assert!(!canvas.laser().is_empty());
        assert!(canvas.sync().transport().is_open());
    }
}
