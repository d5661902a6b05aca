//! Tool system for the whiteboard.

use crate::elements::{BoxSize, ElementKind, Segment};
use serde::{Deserialize, Serialize};

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Selection,
    Rectangle,
    Circle,
    Triangle,
    Arrow,
    Line,
    Text,
    Laser,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Selection,
        ToolKind::Rectangle,
        ToolKind::Triangle,
        ToolKind::Circle,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Text,
        ToolKind::Laser,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Selection => "Selection",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Triangle => "Triangle",
            ToolKind::Arrow => "Arrow",
            ToolKind::Line => "Line",
            ToolKind::Text => "Text",
            ToolKind::Laser => "Laser",
        }
    }

    /// Zero-size element kind this tool starts drawing, if it draws by
    /// dragging.
    pub fn draws(self) -> Option<ElementKind> {
        let empty = BoxSize::default();
        match self {
            ToolKind::Rectangle => Some(ElementKind::Rectangle(empty)),
            ToolKind::Circle => Some(ElementKind::Circle(empty)),
            ToolKind::Triangle => Some(ElementKind::Triangle(empty)),
            ToolKind::Line => Some(ElementKind::Line(Segment::collapsed())),
            ToolKind::Arrow => Some(ElementKind::Arrow(Segment::collapsed())),
            ToolKind::Selection | ToolKind::Text | ToolKind::Laser => None,
        }
    }
}
