//! Portable document format: a JSON array of elements.

use crate::elements::Element;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

/// Extension used for exported drawings.
pub const FILE_EXTENSION: &str = "inkboard";

/// Media type accepted in place of the extension.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Import failures. The scene is left untouched when any of these occur.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),
    #[error("Empty file")]
    Empty,
    #[error("Could not parse file: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid file format")]
    NotAnArray,
    #[error("Invalid element: {0}")]
    InvalidElement(#[source] serde_json::Error),
    #[error("Could not encode drawing: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Suggested file name for an export taken at `at`, down to the minute.
pub fn suggested_file_name(at: OffsetDateTime) -> String {
    format!(
        "drawing-{:04}-{:02}-{:02}T{:02}-{:02}.{FILE_EXTENSION}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute()
    )
}

/// Whether a picked file looks like a drawing we can open.
pub fn accepts_file(name: &str, media_type: Option<&str>) -> bool {
    let has_extension = name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(FILE_EXTENSION));
    has_extension || media_type == Some(JSON_MEDIA_TYPE)
}

/// Serialize elements as a pretty-printed JSON array.
pub fn export_elements(elements: &[Element]) -> DocumentResult<String> {
    serde_json::to_string_pretty(elements).map_err(DocumentError::Encode)
}

/// Parse a document body. The payload must be a JSON array of valid elements.
pub fn import_elements(contents: &str) -> DocumentResult<Vec<Element>> {
    if contents.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    let value: Value = serde_json::from_str(contents).map_err(DocumentError::Parse)?;
    if !value.is_array() {
        return Err(DocumentError::NotAnArray);
    }
    serde_json::from_value(value).map_err(DocumentError::InvalidElement)
}

/// Check the file then parse it.
pub fn import_file(name: &str, media_type: Option<&str>, contents: &str) -> DocumentResult<Vec<Element>> {
    if !accepts_file(name, media_type) {
        return Err(DocumentError::UnsupportedFile(name.to_string()));
    }
    import_elements(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{DEFAULT_STROKE, ElementKind, Segment};

    #[test]
    fn test_suggested_file_name_is_timestamped() {
        let at = OffsetDateTime::from_unix_timestamp(1_709_629_662).unwrap();
        let name = suggested_file_name(at);
        assert_eq!(name, "drawing-2024-03-05T09-07.inkboard");
        assert!(accepts_file(&name, None));

        let later = OffsetDateTime::from_unix_timestamp(1_709_629_662 + 60).unwrap();
        assert_ne!(suggested_file_name(later), name);
    }

    #[test]
    fn test_accepts_file() {
        assert!(accepts_file("board.inkboard", None));
        assert!(accepts_file("BOARD.INKBOARD", None));
        assert!(accepts_file("notes.txt", Some("application/json")));
        assert!(!accepts_file("notes.txt", Some("text/plain")));
        assert!(!accepts_file("inkboard", None));
    }

    #[test]
    fn test_export_then_import_preserves_list() {
        let line = Element::new(
            ElementKind::Line(Segment { points: [0.0, 0.0, 30.0, 40.0] }),
            5.0,
            5.0,
            DEFAULT_STROKE,
        );
        let json = export_elements(std::slice::from_ref(&line)).unwrap();
        assert!(json.contains('\n'));

        let imported = import_elements(&json).unwrap();
        assert_eq!(imported, vec![line]);
    }

    #[test]
    fn test_import_rejections() {
        assert!(matches!(import_elements("   "), Err(DocumentError::Empty)));
        assert!(matches!(import_elements("{oops"), Err(DocumentError::Parse(_))));
        assert!(matches!(import_elements(r#"{"elements":[]}"#), Err(DocumentError::NotAnArray)));
        assert_eq!(DocumentError::NotAnArray.to_string(), "Invalid file format");
        assert!(matches!(
            import_elements(r#"[{"id":"a","type":"line","x":0,"y":0}]"#),
            Err(DocumentError::InvalidElement(_))
        ));
        assert!(matches!(
            import_file("photo.png", Some("image/png"), "[]"),
            Err(DocumentError::UnsupportedFile(_))
        ));
        assert!(import_file("a.inkboard", None, "[]").unwrap().is_empty());
    }
}
