//! Pluggable collaborator-cursor rendering.

use dashmap::DashMap;

use notehub_delta::Range;

/// Capability set for rendering labeled collaborator cursors, keyed by a
/// stable per-user string key.
pub trait CursorModule: Send + Sync {
    /// Create (or re-create) a cursor marker.
    fn create_cursor(&self, key: &str, label: &str, color: &str);

    /// Move an existing marker. Returns `false` when no marker with this
    /// key exists — callers drop the event silently in that case.
    fn move_cursor(&self, key: &str, range: Range) -> bool;

    /// Remove a marker. Removing an unknown key is a no-op.
    fn remove_cursor(&self, key: &str);
}

/// A rendered cursor marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMarker {
    /// Label shown next to the caret (a collaborator's display name).
    pub label: String,
    /// `#rrggbb` caret color.
    pub color: String,
    /// Last known selection, `None` until the first move.
    pub range: Option<Range>,
}

/// In-memory [`CursorModule`] implementation: a marker map with no
/// rendering attached. Used by tests and headless embeddings; a UI layer
/// supplies its own module.
#[derive(Debug, Default)]
pub struct CursorOverlay {
    markers: DashMap<String, CursorMarker>,
}

impl CursorOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a marker by key.
    pub fn marker(&self, key: &str) -> Option<CursorMarker> {
        self.markers.get(key).map(|m| m.value().clone())
    }

    /// Number of active markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl CursorModule for CursorOverlay {
    fn create_cursor(&self, key: &str, label: &str, color: &str) {
        self.markers.insert(
            key.to_string(),
            CursorMarker {
                label: label.to_string(),
                color: color.to_string(),
                range: None,
            },
        );
    }

    fn move_cursor(&self, key: &str, range: Range) -> bool {
        match self.markers.get_mut(key) {
            Some(mut marker) => {
                marker.range = Some(range);
                true
            }
            None => false,
        }
    }

    fn remove_cursor(&self, key: &str) {
        self.markers.remove(key);
    }
}
