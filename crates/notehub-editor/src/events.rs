//! Editor event types.

use serde::{Deserialize, Serialize};

use notehub_delta::{Delta, Range};

/// Origin of a buffer mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Local human input.
    User,
    /// Programmatic, e.g. a remote delta applied by the sync path.
    Api,
}

/// Emitted after the buffer's content changed.
#[derive(Debug, Clone)]
pub struct ContentChange {
    /// The change delta that was applied.
    pub delta: Delta,
    /// Where the change came from.
    pub source: Source,
}

/// Emitted after the buffer's selection changed.
#[derive(Debug, Clone)]
pub struct SelectionChange {
    /// The new selection (`None` when the editor lost focus).
    pub range: Option<Range>,
    /// The previous selection.
    pub old_range: Option<Range>,
    /// Where the change came from.
    pub source: Source,
}
