//! Workspace entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notehub_core::types::id::{UserId, WorkspaceId};

/// A top-level workspace. Owns folders, which in turn own files.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Unique workspace identifier. Immutable after creation.
    pub id: WorkspaceId,
    /// The user who owns this workspace.
    pub owner_id: UserId,
    /// Display title.
    pub title: String,
    /// Short icon/emoji identifier.
    pub icon_id: String,
    /// Serialized content-operation sequence. `None` until the workspace
    /// page receives its first edit; opaque outside the delta codec.
    pub data: Option<String>,
    /// `None`, or a non-empty reason string marking soft-deletion.
    pub in_trash: Option<String>,
    /// Uploaded logo reference, if any.
    pub logo: Option<String>,
    /// When the workspace was created. Immutable; the sole sibling sort key.
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    /// Whether the workspace is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.in_trash.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Partial update for a workspace. `None` fields are left unchanged;
/// the nullable columns use a nested `Option` so "set to null" is
/// expressible (e.g. restoring from trash).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkspace {
    /// New title.
    pub title: Option<String>,
    /// New icon.
    pub icon_id: Option<String>,
    /// New serialized content.
    pub data: Option<Option<String>>,
    /// New trash state (`Some(None)` restores).
    pub in_trash: Option<Option<String>>,
    /// New logo reference.
    pub logo: Option<Option<String>>,
}

impl UpdateWorkspace {
    /// Apply this partial update to a workspace, leaving `None` fields
    /// alone.
    pub fn apply_to(&self, workspace: &mut Workspace) {
        if let Some(title) = &self.title {
            workspace.title = title.clone();
        }
        if let Some(icon_id) = &self.icon_id {
            workspace.icon_id = icon_id.clone();
        }
        if let Some(data) = &self.data {
            workspace.data = data.clone();
        }
        if let Some(in_trash) = &self.in_trash {
            workspace.in_trash = in_trash.clone();
        }
        if let Some(logo) = &self.logo {
            workspace.logo = logo.clone();
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

    /// A partial update that marks the workspace as trashed.
    pub fn trash(reason: impl Into<String>) -> Self {
        Self {
            in_trash: Some(Some(reason.into())),
            ..Self::default()
        }
    }
}
