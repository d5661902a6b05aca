//! Inkboard Core Library
//!
//! Interaction and synchronization engine for the Inkboard collaborative
//! whiteboard: the element model, viewport camera, scene store, undo
//! history, pointer gesture state machine and the full-state sync client.
//! Rendering and UI chrome live outside this crate.

pub mod camera;
pub mod canvas;
pub mod collaboration;
pub mod config;
pub mod document;
pub mod elements;
pub mod history;
pub mod input;
pub mod interaction;
pub mod laser;
pub mod scene;
pub mod selection;
pub mod storage;
pub mod sync;
pub mod tools;

pub use camera::Camera;
pub use canvas::Canvas;
pub use collaboration::SyncClient;
pub use config::{ConfigError, EngineConfig};
pub use document::DocumentError;
pub use elements::{BoxSize, Element, ElementError, ElementId, ElementKind, IconKind, Segment, TextBlock};
pub use history::History;
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Effect, Gesture, InteractionController};
pub use laser::{CancelToken, FrameTick, LaserTrail};
pub use scene::Scene;
pub use selection::{Handle, HandleKind};
pub use storage::{AutoSave, Storage, StorageError};
pub use sync::{ConnectionState, PlatformWebSocket, SyncEvent, SyncMessage, Transport, TransportError};
pub use tools::ToolKind;
