//! Scene store: the authoritative in-memory state of one client.

use crate::camera::Camera;
use crate::elements::{DEFAULT_STROKE, Element, ElementId};
use crate::tools::ToolKind;
use kurbo::Point;

/// Elements in paint order plus the client-local view state.
///
/// The element list order is both the z-order (later paints on top) and the
/// hit-test priority (topmost wins). Camera, tool, selection and stroke
/// color never leave this client.
#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element>,
    camera: Camera,
    tool: ToolKind,
    selection: Option<ElementId>,
    stroke_color: String,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_camera(Camera::new())
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            elements: Vec::new(),
            camera,
            tool: ToolKind::default(),
            selection: None,
            stroke_color: DEFAULT_STROKE.to_string(),
        }
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Append an element on top. Ids are not checked for uniqueness.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Replace the element at `index`.
    ///
    /// Returns `false` and leaves the scene untouched when `index` is out
    /// of range.
    pub fn update_element(&mut self, index: usize, element: Element) -> bool {
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = element;
                true
            }
            None => {
                log::debug!("Ignoring update of element index {index}, scene has {}", self.elements.len());
                false
            }
        }
    }

    /// Replace the whole element list.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Take the element list out, leaving the scene empty.
    pub fn take_elements(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.elements)
    }

    /// Remove an element by id.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Topmost element under a world point.
    pub fn element_at(&self, point: Point, line_tolerance: f64) -> Option<&Element> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.hit_test(point, line_tolerance))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. The elements are not touched.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    /// The selected element, if the selection still points at one.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }

    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.selection = id;
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.as_ref() == Some(id)
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.stroke_color = color.into();
    }
}
