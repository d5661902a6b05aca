//! Selection handles and resize geometry.
//!
//! The renderer draws the handles returned here and the interaction
//! controller hit-tests the same geometry, so both agree on where a resize
//! can start.

use crate::config::EngineConfig;
use crate::elements::{Element, ElementKind};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Which corner of the selection box a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    BottomRight,
    TopRight,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a world point falls inside this handle's circular region.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= radius * radius
    }
}

/// Resize handles for an element, placed on its normalized bounds.
///
/// Lines and arrows have none. Text only resizes from the bottom-right.
pub fn handles_for(element: &Element) -> Vec<Handle> {
    if element.is_segment() {
        return Vec::new();
    }
    let bounds: Rect = element.bounds();
    let bottom_right = Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::BottomRight);
    match element.kind {
        ElementKind::Text(_) => vec![bottom_right],
        _ => vec![
            bottom_right,
            Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::TopRight),
        ],
    }
}

/// First handle of `element` under a world point.
pub fn handle_at(element: &Element, point: Point, radius: f64) -> Option<HandleKind> {
    handles_for(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, radius))
        .map(|handle| handle.kind)
}

/// Resize `element` so the dragged handle follows `pointer`.
///
/// Bottom-right: `size = pointer - origin`. Top-right: the width follows the
/// pointer while the top edge moves to the pointer and the bottom edge stays
/// put. Text rescales its font to the new height, never below the
/// configured minimum.
pub fn apply_resize(element: &mut Element, handle: HandleKind, pointer: Point, config: &EngineConfig) {
    let origin = element.origin();
    let is_text = matches!(element.kind, ElementKind::Text(_));
    if is_text && handle != HandleKind::BottomRight {
        return;
    }
    let mut new_y = None;
    {
        let Some(size) = element.size_mut() else {
            return;
        };
        match handle {
            HandleKind::BottomRight => {
                size.width = pointer.x - origin.x;
                size.height = pointer.y - origin.y;
            }
            HandleKind::TopRight => {
                size.width = pointer.x - origin.x;
                size.height += origin.y - pointer.y;
                new_y = Some(pointer.y);
            }
        }
    }
    if let Some(y) = new_y {
        element.y = y;
    }
    if let ElementKind::Text(block) = &mut element.kind {
        block.font_size = (block.size.height.abs() * config.font_size_ratio).max(config.min_font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, DEFAULT_STROKE, Segment, TextBlock};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(ElementKind::Rectangle(BoxSize::new(w, h)), x, y, DEFAULT_STROKE)
    }

    #[test]
    fn test_handles_sit_on_normalized_corners() {
        let element = rect(100.0, 100.0, -40.0, -30.0);
        let handles = handles_for(&element);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].position, Point::new(100.0, 100.0));
        assert_eq!(handles[1].position, Point::new(100.0, 70.0));
    }

    #[test]
    fn test_segments_have_no_handles() {
        let line = Element::new(ElementKind::Line(Segment::collapsed()), 0.0, 0.0, DEFAULT_STROKE);
        assert!(handles_for(&line).is_empty());
    }

    #[test]
    fn test_handle_hit_radius() {
        let element = rect(0.0, 0.0, 100.0, 80.0);
        assert_eq!(handle_at(&element, Point::new(103.0, 84.0), 5.0), Some(HandleKind::BottomRight));
        assert_eq!(handle_at(&element, Point::new(100.0, 1.0), 5.0), Some(HandleKind::TopRight));
        assert_eq!(handle_at(&element, Point::new(110.0, 90.0), 5.0), None);
    }

    #[test]
    fn test_bottom_right_resize() {
        let mut element = rect(10.0, 10.0, 50.0, 50.0);
        apply_resize(&mut element, HandleKind::BottomRight, Point::new(110.0, 40.0), &EngineConfig::default());
        assert_eq!(element.size(), Some(BoxSize::new(100.0, 30.0)));
        assert!((element.x - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_right_resize_keeps_bottom_edge() {
        let mut element = rect(0.0, 100.0, 50.0, 50.0);
        apply_resize(&mut element, HandleKind::TopRight, Point::new(80.0, 60.0), &EngineConfig::default());
        assert!((element.y - 60.0).abs() < f64::EPSILON);
        let size = element.size().unwrap();
        assert!((size.width - 80.0).abs() < f64::EPSILON);
        assert!((size.height - 90.0).abs() < f64::EPSILON);
        // Bottom edge unchanged at 150.
        assert!((element.bounds().y1 - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_resize_scales_font_with_floor() {
        let config = EngineConfig::default();
        let mut element = Element::new(
            ElementKind::Text(TextBlock {
                text: "hi".into(),
                font_size: 24.0,
                size: BoxSize::new(30.0, 30.0),
            }),
            0.0,
            0.0,
            DEFAULT_STROKE,
        );

        apply_resize(&mut element, HandleKind::BottomRight, Point::new(60.0, 50.0), &config);
        let ElementKind::Text(block) = &element.kind else { unreachable!() };
        assert!((block.font_size - 40.0).abs() < 1e-10);

        apply_resize(&mut element, HandleKind::BottomRight, Point::new(60.0, 5.0), &config);
        let ElementKind::Text(block) = &element.kind else { unreachable!() };
        assert!((block.font_size - config.min_font_size).abs() < f64::EPSILON);
    }
}
