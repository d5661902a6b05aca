//! Element definitions for the whiteboard.

mod icon;
mod record;

pub use icon::{ICON_TYPE_PREFIX, IconKind};
pub use record::{DEFAULT_FONT_SIZE, DEFAULT_STROKE};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque element identifier, unique within a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when a record cannot become an [`Element`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("unknown element type: {0}")]
    UnknownType(String),
    #[error("{0} element is missing its points")]
    MissingPoints(String),
    #[error("{kind} element needs 4 point coordinates, found {found}")]
    InvalidPoints { kind: String, found: usize },
    #[error("text element is missing its text")]
    MissingText,
}

/// Width and height of a box-like element. Either may be negative, which
/// flips the box around its origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Two points `[x1, y1, x2, y2]` relative to the element origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub points: [f64; 4],
}

impl Segment {
    /// A zero-length segment pinned at the origin.
    pub fn collapsed() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Point {
        Point::new(self.points[0], self.points[1])
    }

    pub fn end(&self) -> Point {
        Point::new(self.points[2], self.points[3])
    }
}

/// Text content laid out in a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub font_size: f64,
    pub size: BoxSize,
}

/// Variant-specific part of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Rectangle(BoxSize),
    Circle(BoxSize),
    Triangle(BoxSize),
    Line(Segment),
    Arrow(Segment),
    Text(TextBlock),
    Icon(IconKind, BoxSize),
}

/// A drawable primitive.
///
/// Serialized as the flat record `{id, type, x, y, width, height, points?,
/// stroke, text?, fontSize?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "record::ElementRecord", into = "record::ElementRecord")]
pub struct Element {
    pub id: ElementId,
    /// World-space origin.
    pub x: f64,
    pub y: f64,
    pub stroke: String,
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(kind: ElementKind, x: f64, y: f64, stroke: impl Into<String>) -> Self {
        Self::with_id(ElementId::new(), kind, x, y, stroke)
    }

    /// Create an element with a known id (tests, imports).
    pub fn with_id(id: ElementId, kind: ElementKind, x: f64, y: f64, stroke: impl Into<String>) -> Self {
        Self {
            id,
            x,
            y,
            stroke: stroke.into(),
            kind,
        }
    }

    /// Wire `type` string.
    pub fn type_name(&self) -> String {
        match &self.kind {
            ElementKind::Rectangle(_) => "rectangle".to_string(),
            ElementKind::Circle(_) => "circle".to_string(),
            ElementKind::Triangle(_) => "triangle".to_string(),
            ElementKind::Line(_) => "line".to_string(),
            ElementKind::Arrow(_) => "arrow".to_string(),
            ElementKind::Text(_) => "text".to_string(),
            ElementKind::Icon(icon, _) => icon.type_name(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Whether the element is a line or arrow.
    pub fn is_segment(&self) -> bool {
        matches!(self.kind, ElementKind::Line(_) | ElementKind::Arrow(_))
    }

    /// Box size of box-like elements (everything except lines and arrows).
    pub fn size(&self) -> Option<BoxSize> {
        match &self.kind {
            ElementKind::Rectangle(size)
            | ElementKind::Circle(size)
            | ElementKind::Triangle(size)
            | ElementKind::Icon(_, size) => Some(*size),
            ElementKind::Text(block) => Some(block.size),
            ElementKind::Line(_) | ElementKind::Arrow(_) => None,
        }
    }

    /// Mutable box size of box-like elements.
    pub fn size_mut(&mut self) -> Option<&mut BoxSize> {
        match &mut self.kind {
            ElementKind::Rectangle(size)
            | ElementKind::Circle(size)
            | ElementKind::Triangle(size)
            | ElementKind::Icon(_, size) => Some(size),
            ElementKind::Text(block) => Some(&mut block.size),
            ElementKind::Line(_) | ElementKind::Arrow(_) => None,
        }
    }

    /// Segment of lines and arrows.
    pub fn segment(&self) -> Option<Segment> {
        match &self.kind {
            ElementKind::Line(segment) | ElementKind::Arrow(segment) => Some(*segment),
            _ => None,
        }
    }

    /// Axis-aligned bounds in world space.
    ///
    /// Box elements are normalized for negative width/height; segments use
    /// the box spanned by their two endpoints.
    pub fn bounds(&self) -> Rect {
        if let Some(segment) = self.segment() {
            let origin = self.origin().to_vec2();
            return Rect::from_points(segment.start() + origin, segment.end() + origin);
        }
        let size = self.size().unwrap_or_default();
        normalized_box(self.x, self.y, size.width, size.height)
    }

    /// Test whether a world point hits this element.
    ///
    /// Boxes use their normalized bounds with inclusive edges. Segments use
    /// their endpoint box grown by `line_tolerance` on every side.
    pub fn hit_test(&self, point: Point, line_tolerance: f64) -> bool {
        let bounds = if self.is_segment() {
            self.bounds().inflate(line_tolerance, line_tolerance)
        } else {
            self.bounds()
        };
        point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
    }

    /// Stretch a freshly drawn element so its far corner follows `pointer`.
    ///
    /// Boxes get `size = pointer - origin`; segments keep their first point
    /// pinned at the origin and move the second to `pointer - origin`. Text
    /// is left alone.
    pub fn stretch_to(&mut self, pointer: Point) {
        let dx = pointer.x - self.x;
        let dy = pointer.y - self.y;
        match &mut self.kind {
            ElementKind::Line(segment) | ElementKind::Arrow(segment) => {
                segment.points = [0.0, 0.0, dx, dy];
            }
            ElementKind::Text(_) => {}
            ElementKind::Rectangle(size)
            | ElementKind::Circle(size)
            | ElementKind::Triangle(size)
            | ElementKind::Icon(_, size) => {
                size.width = dx;
                size.height = dy;
            }
        }
    }
}

/// Normalize a possibly flipped box into a rectangle with positive extent.
pub fn normalized_box(x: f64, y: f64, width: f64, height: f64) -> Rect {
    let abs_x = if width < 0.0 { x + width } else { x };
    let abs_y = if height < 0.0 { y + height } else { y };
    Rect::new(abs_x, abs_y, abs_x + width.abs(), abs_y + height.abs())
}
