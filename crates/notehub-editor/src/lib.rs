//! # notehub-editor
//!
//! The in-process rich-text buffer that holds the live editable document.
//! It emits content-change and selection-change notifications tagged with
//! their origin, and can apply remote deltas without re-triggering its own
//! local-change notifications — the mechanism that prevents echo loops in
//! the sync path.

pub mod buffer;
pub mod cursors;
pub mod events;

pub use buffer::EditorBuffer;
pub use cursors::{CursorMarker, CursorModule, CursorOverlay};
pub use events::{ContentChange, SelectionChange, Source};
