//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::id::{FolderId, WorkspaceId};

/// A folder inside a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier. Immutable after creation.
    pub id: FolderId,
    /// The workspace containing this folder.
    pub workspace_id: WorkspaceId,
    /// Display title.
    pub title: String,
    /// Short icon/emoji identifier.
    pub icon_id: String,
    /// Serialized content-operation sequence (`None` until first edit).
    pub data: Option<String>,
    /// `None`, or a non-empty reason string marking soft-deletion.
    ///
    /// Independent of the contained files' flags: trashing a folder does
    /// not cascade. Trash is a display filter, not a structural removal.
    pub in_trash: Option<String>,
    /// When the folder was created. Immutable; the sole sibling sort key.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Whether the folder is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.in_trash.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Partial update for a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New title.
    pub title: Option<String>,
    /// New icon.
    pub icon_id: Option<String>,
    /// New serialized content.
    pub data: Option<Option<String>>,
    /// New trash state (`Some(None)` restores).
    pub in_trash: Option<Option<String>>,
}

impl UpdateFolder {
    /// Apply this partial update to a folder, leaving `None` fields alone.
    pub fn apply_to(&self, folder: &mut Folder) {
        if let Some(title) = &self.title {
            folder.title = title.clone();
        }
        if let Some(icon_id) = &self.icon_id {
            folder.icon_id = icon_id.clone();
        }
        if let Some(data) = &self.data {
            folder.data = data.clone();
        }
        if let Some(in_trash) = &self.in_trash {
            folder.in_trash = in_trash.clone();
        }
    }

    /// A partial update that only replaces the serialized content.
    pub fn data(data: String) -> Self {
        Self {
            data: Some(Some(data)),
            ..Self::default()
        }
    }

    /// A partial update that clears the trash flag.
    pub fn restore() -> Self {
        Self {
            in_trash: Some(None),
            ..Self::default()
        }
    }

    /// A partial update that marks the folder as trashed.
    pub fn trash(reason: impl Into<String>) -> Self {
        Self {
            in_trash: Some(Some(reason.into())),
            ..Self::default()
        }
    }
}
