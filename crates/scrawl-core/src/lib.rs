//! Scrawl Core Library
//!
//! Platform-agnostic shape model, geometry kernel, and interaction engine
//! for the Scrawl sketch canvas.

pub mod canvas;
pub mod clipboard;
pub mod document;
pub mod engine;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod tools;
pub mod viewport;

pub use canvas::CanvasState;
pub use clipboard::{duplicate_shapes, Clipboard, PASTE_OFFSET_STEP};
pub use document::{CanvasDocument, DocumentError, DOCUMENT_VERSION};
pub use engine::CanvasEngine;
pub use history::{History, HistoryEntry, MAX_HISTORY};
pub use input::{ClickTracker, Modifiers, MouseButton, MoveThrottle};
pub use selection::{handle_at, resize_shape, Handle, HandleKind, HANDLE_SIZE, MIN_SHAPE_SIZE};
pub use shapes::{Shape, ShapeId, ShapeStyle};
pub use snap::{snap_angle, snap_line_endpoint, snap_to_grid, GRID_SIZE};
pub use tools::Tool;
pub use viewport::Viewport;
