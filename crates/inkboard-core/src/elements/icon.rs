//! Clean icon variants from the shape library.

use std::fmt;

/// Prefix every icon element type carries on the wire (`clean_cloud`, ...).
pub const ICON_TYPE_PREFIX: &str = "clean_";

/// A named icon drawn inside an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Square,
    Circle,
    Triangle,
    Diamond,
    Parallelogram,
    RoundedRect,
    Cylinder,
    Cloud,
    Star,
    Heart,
    Hexagon,
    Octagon,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Message,
    File,
    Folder,
    User,
    Lock,
    Unlock,
    Calendar,
    Clock,
    Check,
    Cross,
    Alert,
    Info,
    Plus,
    Minus,
}

impl IconKind {
    /// Every icon, in shape-library order.
    pub const ALL: [IconKind; 30] = [
        IconKind::Square,
        IconKind::Circle,
        IconKind::Triangle,
        IconKind::Diamond,
        IconKind::Parallelogram,
        IconKind::RoundedRect,
        IconKind::Cylinder,
        IconKind::Cloud,
        IconKind::Star,
        IconKind::Heart,
        IconKind::Hexagon,
        IconKind::Octagon,
        IconKind::ArrowRight,
        IconKind::ArrowLeft,
        IconKind::ArrowUp,
        IconKind::ArrowDown,
        IconKind::Message,
        IconKind::File,
        IconKind::Folder,
        IconKind::User,
        IconKind::Lock,
        IconKind::Unlock,
        IconKind::Calendar,
        IconKind::Clock,
        IconKind::Check,
        IconKind::Cross,
        IconKind::Alert,
        IconKind::Info,
        IconKind::Plus,
        IconKind::Minus,
    ];

    /// Short snake_case name (`arrow_right`).
    pub fn name(self) -> &'static str {
        match self {
            IconKind::Square => "square",
            IconKind::Circle => "circle",
            IconKind::Triangle => "triangle",
            IconKind::Diamond => "diamond",
            IconKind::Parallelogram => "parallelogram",
            IconKind::RoundedRect => "rounded_rect",
            IconKind::Cylinder => "cylinder",
            IconKind::Cloud => "cloud",
            IconKind::Star => "star",
            IconKind::Heart => "heart",
            IconKind::Hexagon => "hexagon",
            IconKind::Octagon => "octagon",
            IconKind::ArrowRight => "arrow_right",
            IconKind::ArrowLeft => "arrow_left",
            IconKind::ArrowUp => "arrow_up",
            IconKind::ArrowDown => "arrow_down",
            IconKind::Message => "message",
            IconKind::File => "file",
            IconKind::Folder => "folder",
            IconKind::User => "user",
            IconKind::Lock => "lock",
            IconKind::Unlock => "unlock",
            IconKind::Calendar => "calendar",
            IconKind::Clock => "clock",
            IconKind::Check => "check",
            IconKind::Cross => "cross",
            IconKind::Alert => "alert",
            IconKind::Info => "info",
            IconKind::Plus => "plus",
            IconKind::Minus => "minus",
        }
    }

    /// Element `type` string for this icon (`clean_arrow_right`).
    pub fn type_name(self) -> String {
        format!("{ICON_TYPE_PREFIX}{}", self.name())
    }

    /// Look up an icon by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.name() == name)
    }

    /// Look up an icon by element `type` string.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        type_name
            .strip_prefix(ICON_TYPE_PREFIX)
            .and_then(Self::from_name)
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
