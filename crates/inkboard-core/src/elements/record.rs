//! Wire representation of elements.
//!
//! Elements travel as flat JSON records keyed by `type`. Conversion into
//! the typed [`Element`] is where variant-specific fields are checked.

use super::{BoxSize, Element, ElementError, ElementId, ElementKind, IconKind, Segment, TextBlock};
use serde::{Deserialize, Serialize};

/// Stroke used when a record carries none.
pub const DEFAULT_STROKE: &str = "#000000";
/// Font size used when a text record carries none.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

fn default_stroke() -> String {
    DEFAULT_STROKE.to_string()
}

/// Flat element record as stored and broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ElementRecord {
    id: ElementId,
    #[serde(rename = "type")]
    kind: String,
    x: f64,
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<f64>>,
    #[serde(default = "default_stroke")]
    stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
}

fn segment_from(kind: &str, points: Option<Vec<f64>>) -> Result<Segment, ElementError> {
    let points = points.ok_or_else(|| ElementError::MissingPoints(kind.to_string()))?;
    let points: [f64; 4] = points
        .as_slice()
        .try_into()
        .map_err(|_| ElementError::InvalidPoints {
            kind: kind.to_string(),
            found: points.len(),
        })?;
    Ok(Segment { points })
}

impl TryFrom<ElementRecord> for Element {
    type Error = ElementError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let size = BoxSize::new(record.width, record.height);
        let kind = match record.kind.as_str() {
            "rectangle" => ElementKind::Rectangle(size),
            "circle" => ElementKind::Circle(size),
            "triangle" => ElementKind::Triangle(size),
            "line" => ElementKind::Line(segment_from("line", record.points)?),
            "arrow" => ElementKind::Arrow(segment_from("arrow", record.points)?),
            "text" => ElementKind::Text(TextBlock {
                text: record.text.ok_or(ElementError::MissingText)?,
                font_size: record.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                size,
            }),
            other => match IconKind::from_type_name(other) {
                Some(icon) => ElementKind::Icon(icon, size),
                None => return Err(ElementError::UnknownType(other.to_string())),
            },
        };

        Ok(Element {
            id: record.id,
            x: record.x,
            y: record.y,
            stroke: record.stroke,
            kind,
        })
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        let kind = element.type_name();
        let (size, points, text, font_size) = match element.kind {
            ElementKind::Rectangle(size)
            | ElementKind::Circle(size)
            | ElementKind::Triangle(size)
            | ElementKind::Icon(_, size) => (size, None, None, None),
            // Segments keep the zero box of the record layout.
            ElementKind::Line(segment) | ElementKind::Arrow(segment) => {
                (BoxSize::default(), Some(segment.points.to_vec()), None, None)
            }
            ElementKind::Text(block) => (block.size, None, Some(block.text), Some(block.font_size)),
        };

        Self {
            id: element.id,
            kind,
            x: element.x,
            y: element.y,
            width: size.width,
            height: size.height,
            points,
            stroke: element.stroke,
            text,
            font_size,
        }
    }
}
