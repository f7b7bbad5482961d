//! The per-document save-state machine.

use serde::{Deserialize, Serialize};

/// Persistence state of one open document, mirrored by the visible
/// saving/saved badge.
///
/// Transitions: `Idle → Dirty` on a local edit, `Dirty → Saving` when the
/// debounce timer fires, then `Saving → Idle` on success or
/// `Saving → Failed` when the record layer rejects the write. A failed
/// save leaves the local buffer authoritative; the badge must not claim
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveState {
    /// Nothing pending.
    Idle,
    /// A local edit awaits its debounce window.
    Dirty,
    /// The snapshot is being written to the record layer.
    Saving,
    /// The last write was rejected; local state is ahead of the record.
    Failed,
}

impl SaveState {
    /// Whether the badge should read "saving".
    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Dirty | Self::Saving)
    }
}
