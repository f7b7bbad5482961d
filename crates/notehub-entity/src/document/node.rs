//! The tagged document union and addressing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::File;
use super::folder::Folder;
use super::workspace::Workspace;

/// Which level of the hierarchy a document node sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A workspace page.
    Workspace,
    /// A folder page.
    Folder,
    /// A file page.
    File,
}

impl DocumentKind {
    /// Lowercase name, used in log lines and display strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

/// Addresses any document node regardless of kind.
///
/// A handle also keys the realtime room for the node: one room per
/// workspace/folder/file being actively viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// The hierarchy level.
    pub kind: DocumentKind,
    /// The node's id, untyped because the kind carries the discrimination.
    pub id: Uuid,
}

impl DocumentHandle {
    /// Create a handle.
    pub fn new(kind: DocumentKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

/// A document node of any kind, with uniform access to the shared fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentNode {
    /// A workspace page.
    Workspace(Workspace),
    /// A folder page.
    Folder(Folder),
    /// A file page.
    File(File),
}

impl DocumentNode {
    /// The node's kind tag.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Workspace(_) => DocumentKind::Workspace,
            Self::Folder(_) => DocumentKind::Folder,
            Self::File(_) => DocumentKind::File,
        }
    }

    /// The node's raw id.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Workspace(w) => w.id.into_uuid(),
            Self::Folder(f) => f.id.into_uuid(),
            Self::File(f) => f.id.into_uuid(),
        }
    }

    /// The handle addressing this node.
    pub fn handle(&self) -> DocumentHandle {
        DocumentHandle::new(self.kind(), self.id())
    }

    /// Display title.
    pub fn title(&self) -> &str {
        match self {
            Self::Workspace(w) => &w.title,
            Self::Folder(f) => &f.title,
            Self::File(f) => &f.title,
        }
    }

    /// Serialized content, if the node has been edited at least once.
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::Workspace(w) => w.data.as_deref(),
            Self::Folder(f) => f.data.as_deref(),
            Self::File(f) => f.data.as_deref(),
        }
    }

    /// Trash reason, if soft-deleted.
    pub fn in_trash(&self) -> Option<&str> {
        match self {
            Self::Workspace(w) => w.in_trash.as_deref(),
            Self::Folder(f) => f.in_trash.as_deref(),
            Self::File(f) => f.in_trash.as_deref(),
        }
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Workspace(w) => w.created_at,
            Self::Folder(f) => f.created_at,
            Self::File(f) => f.created_at,
        }
    }
}
