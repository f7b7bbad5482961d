//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::id::{FileId, FolderId, WorkspaceId};

/// A file inside a folder. The leaf of the document hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier. Immutable after creation.
    pub id: FileId,
    /// The workspace this file ultimately belongs to.
    pub workspace_id: WorkspaceId,
    /// The folder containing this file.
    pub folder_id: FolderId,
    /// Display title.
    pub title: String,
    /// Short icon/emoji identifier.
    pub icon_id: String,
    /// Serialized content-operation sequence (`None` until first edit).
    pub data: Option<String>,
    /// `None`, or a non-empty reason string marking soft-deletion.
    pub in_trash: Option<String>,
    /// When the file was created. Immutable; the sole sibling sort key.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Whether the file is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.in_trash.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Partial update for a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFile {
    /// New title.
    pub title: Option<String>,
    /// New icon.
    pub icon_id: Option<String>,
    /// New serialized content.
    pub data: Option<Option<String>>,
    /// New trash state (`Some(None)` restores).
    pub in_trash: Option<Option<String>>,
}

impl UpdateFile {
    /// Apply this partial update to a file, leaving `None` fields alone.
    pub fn apply_to(&self, file: &mut File) {
        if let Some(title) = &self.title {
            file.title = title.clone();
        }
        if let Some(icon_id) = &self.icon_id {
            file.icon_id = icon_id.clone();
        }
        if let Some(data) = &self.data {
            file.data = data.clone();
        }
        if let Some(in_trash) = &self.in_trash {
            file.in_trash = in_trash.clone();
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

    /// A partial update that marks the file as trashed.
    pub fn trash(reason: impl Into<String>) -> Self {
        Self {
            in_trash: Some(Some(reason.into())),
            ..Self::default()
        }
    }
}
