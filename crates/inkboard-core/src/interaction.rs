//! Pointer gesture state machine.
//!
//! The controller turns pointer, touch and wheel input into scene edits. It
//! owns only per-gesture state; the scene and history are passed in on every
//! call so the same controller can drive any store.

use crate::config::EngineConfig;
use crate::elements::{BoxSize, Element, ElementId, ElementKind, IconKind, TextBlock};
use crate::history::History;
use crate::input::{MouseButton, PointerEvent};
use crate::laser::{FrameTick, LaserTrail};
use crate::scene::Scene;
use crate::selection::{HandleKind, apply_resize, handle_at};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// Horizontal space one character of committed text takes.
const TEXT_CHAR_WIDTH: f64 = 15.0;
/// Height of a committed text box.
const TEXT_LINE_HEIGHT: f64 = 30.0;

/// What the current gesture is doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Stretching a freshly appended element.
    Drawing { element: ElementId },
    Panning,
    /// Moving an element; `offset` is pointer minus element origin at press.
    Dragging { element: ElementId, offset: Vec2 },
    Resizing { element: ElementId, handle: HandleKind },
    LaserDrawing,
}

impl Gesture {
    /// Whether finishing this gesture leaves the element list changed.
    pub fn mutates_scene(&self) -> bool {
        matches!(
            self,
            Gesture::Drawing { .. } | Gesture::Dragging { .. } | Gesture::Resizing { .. }
        )
    }
}

/// Follow-up the host has to perform after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The element list changed; send it to peers.
    Broadcast,
    /// Show a text field for a new text element at this world position.
    OpenTextEntry { position: Point },
    /// The laser trail started fading; tick it every animation frame.
    LaserFadeStarted,
}

/// Drives gestures against a [`Scene`] and [`History`].
#[derive(Debug)]
pub struct InteractionController {
    config: EngineConfig,
    gesture: Gesture,
    laser: LaserTrail,
    /// Screen position of the previous pointer event of this gesture.
    last_position: Option<Point>,
    /// Finger distance of the previous pinch event.
    last_pinch_distance: Option<f64>,
    /// World position waiting for the text entry to commit.
    pending_text: Option<Point>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            gesture: Gesture::Idle,
            laser: LaserTrail::new(),
            last_position: None,
            last_pinch_distance: None,
            pending_text: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn laser(&self) -> &LaserTrail {
        &self.laser
    }

    /// World position of an open text entry.
    pub fn pending_text(&self) -> Option<Point> {
        self.pending_text
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent, scene: &mut Scene, history: &mut History) -> Option<Effect> {
        match *event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, scene, history),
            PointerEvent::Move { position, movement } => {
                self.pointer_move(position, movement, scene);
                None
            }
            PointerEvent::Up { .. } => self.pointer_up(scene),
            PointerEvent::Pinch { first, second } => {
                self.pinch(first, second, scene);
                None
            }
            PointerEvent::Wheel { position, delta } => {
                scene
                    .camera_mut()
                    .wheel_zoom(position, delta.y, self.config.wheel_zoom_step);
                None
            }
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: MouseButton,
        scene: &mut Scene,
        history: &mut History,
    ) -> Option<Effect> {
        let world = scene.camera().screen_to_world(position);
        self.last_position = Some(position);

        if button == MouseButton::Middle {
            self.gesture = Gesture::Panning;
            return None;
        }

        match scene.tool() {
            ToolKind::Selection => {
                self.gesture = self.begin_selection_gesture(world, scene, history);
                None
            }
            ToolKind::Laser => {
                self.laser.begin(world);
                self.gesture = Gesture::LaserDrawing;
                None
            }
            ToolKind::Text => {
                scene.select_element(None);
                self.pending_text = Some(world);
                Some(Effect::OpenTextEntry { position: world })
            }
            tool => {
                let Some(kind) = tool.draws() else {
                    return None;
                };
                scene.select_element(None);
                history.save_snapshot(scene);
                let element = Element::new(kind, world.x, world.y, scene.stroke_color());
                let id = element.id.clone();
                scene.add_element(element);
                self.gesture = Gesture::Drawing { element: id };
                None
            }
        }
    }

    /// Resize the selection, grab an element, or fall back to panning.
    fn begin_selection_gesture(&self, world: Point, scene: &mut Scene, history: &mut History) -> Gesture {
        if let Some(selected) = scene.selected_element() {
            if let Some(handle) = handle_at(selected, world, self.config.handle_radius) {
                let element = selected.id.clone();
                history.save_snapshot(scene);
                return Gesture::Resizing { element, handle };
            }
        }

        if let Some(hit) = scene.element_at(world, self.config.line_hit_tolerance) {
            let element = hit.id.clone();
            let offset = world - hit.origin();
            scene.select_element(Some(element.clone()));
            history.save_snapshot(scene);
            return Gesture::Dragging { element, offset };
        }

        scene.select_element(None);
        Gesture::Panning
    }

    fn pointer_move(&mut self, position: Point, movement: Option<Vec2>, scene: &mut Scene) {
        let world = scene.camera().screen_to_world(position);
        let previous = self.last_position.replace(position);

        match &self.gesture {
            Gesture::Idle => {}
            Gesture::Panning => {
                let delta = movement.unwrap_or_else(|| position - previous.unwrap_or(position));
                scene.camera_mut().pan(delta);
            }
            Gesture::Dragging { element, offset } => {
                let origin = world - *offset;
                edit_element(scene, element, |e| e.set_origin(origin));
            }
            Gesture::Resizing { element, handle } => {
                let config = &self.config;
                edit_element(scene, element, |e| apply_resize(e, *handle, world, config));
            }
            Gesture::Drawing { element } => {
                edit_element(scene, element, |e| e.stretch_to(world));
            }
            Gesture::LaserDrawing => self.laser.extend(world),
        }
    }

    fn pointer_up(&mut self, scene: &Scene) -> Option<Effect> {
        let gesture = std::mem::take(&mut self.gesture);
        self.last_position = None;
        self.last_pinch_distance = None;

        if gesture.mutates_scene() {
            return Some(Effect::Broadcast);
        }
        if scene.tool() == ToolKind::Laser && !self.laser.is_empty() {
            self.laser.start_fade(self.config.laser_fade_step);
            return Some(Effect::LaserFadeStarted);
        }
        None
    }

    fn pinch(&mut self, first: Point, second: Point, scene: &mut Scene) {
        scene.camera_mut().pinch(first, second, self.last_pinch_distance);
        self.last_pinch_distance = Some(first.distance(second));
    }

    /// Commit the open text entry as a text element.
    ///
    /// Empty text, or no open entry, just closes it.
    pub fn commit_text(&mut self, text: &str, scene: &mut Scene, history: &mut History) -> Option<Effect> {
        let position = self.pending_text.take()?;
        if text.is_empty() {
            return None;
        }
        history.save_snapshot(scene);
        let block = TextBlock {
            text: text.to_string(),
            font_size: self.config.default_font_size,
            size: BoxSize::new(text.chars().count() as f64 * TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT),
        };
        let element = Element::new(ElementKind::Text(block), position.x, position.y, scene.stroke_color());
        scene.add_element(element);
        Some(Effect::Broadcast)
    }

    /// Close the text entry without adding anything.
    pub fn cancel_text(&mut self) {
        self.pending_text = None;
    }

    /// Drop a library icon centered under a screen point.
    ///
    /// Only the selection tool accepts drops.
    pub fn drop_icon(&mut self, icon: IconKind, position: Point, scene: &mut Scene, history: &mut History) -> Option<Effect> {
        if scene.tool() != ToolKind::Selection {
            log::debug!("Ignoring {} drop while {} tool is active", icon, scene.tool().label());
            return None;
        }
        let world = scene.camera().screen_to_world(position);
        let size = self.config.icon_size;
        history.save_snapshot(scene);
        let element = Element::new(
            ElementKind::Icon(icon, BoxSize::new(size, size)),
            world.x - size / 2.0,
            world.y - size / 2.0,
            scene.stroke_color(),
        );
        scene.add_element(element);
        Some(Effect::Broadcast)
    }

    /// Advance the laser fade by one animation frame.
    pub fn tick_laser(&mut self) -> FrameTick {
        self.laser.tick()
    }

    /// Stop scheduled work before the view goes away.
    pub fn teardown(&mut self) {
        self.laser.cancel_fade();
        self.gesture = Gesture::Idle;
        self.pending_text = None;
    }
}

/// Replace the element with `id` by an edited copy.
///
/// The element is addressed by id, so a list replaced mid-gesture (undo, a
/// remote sync) turns the edit into a no-op instead of touching another
/// element.
fn edit_element(scene: &mut Scene, id: &ElementId, edit: impl FnOnce(&mut Element)) {
    let Some(index) = scene.index_of(id) else {
        return;
    };
    let mut element = scene.elements()[index].clone();
    edit(&mut element);
    scene.update_element(index, element);
}
