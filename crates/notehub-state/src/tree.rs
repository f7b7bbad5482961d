//! The in-memory workspace tree.

use serde::{Deserialize, Serialize};

use notehub_core::types::id::{FileId, FolderId, WorkspaceId};
use notehub_entity::{File, Folder, Workspace};

/// A folder together with its (created_at-ordered) files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder itself.
    pub folder: Folder,
    /// The folder's files, sorted ascending by `created_at`.
    pub files: Vec<File>,
}

impl FolderNode {
    /// A folder with no files loaded yet.
    pub fn new(folder: Folder) -> Self {
        Self {
            folder,
            files: Vec::new(),
        }
    }
}

/// A workspace together with its (created_at-ordered) folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceNode {
    /// The workspace itself.
    pub workspace: Workspace,
    /// The workspace's folders, sorted ascending by `created_at`.
    pub folders: Vec<FolderNode>,
}

impl WorkspaceNode {
    /// A workspace with no folders loaded yet.
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            folders: Vec::new(),
        }
    }
}

/// The whole shared application state: a forest of workspaces.
///
/// The single source of truth for all currently rendered documents.
/// Initialized empty at session start, populated by bulk-set actions
/// once the record layer answers the initial queries, kept live by the
/// sync coordinator and the database change feed thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    /// All loaded workspaces.
    pub workspaces: Vec<WorkspaceNode>,
}

impl AppState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a workspace node.
    pub fn workspace(&self, workspace_id: WorkspaceId) -> Option<&WorkspaceNode> {
        self.workspaces
            .iter()
            .find(|node| node.workspace.id == workspace_id)
    }

    /// Look up a folder node inside a workspace.
    pub fn folder(&self, workspace_id: WorkspaceId, folder_id: FolderId) -> Option<&FolderNode> {
        self.workspace(workspace_id)?
            .folders
            .iter()
            .find(|node| node.folder.id == folder_id)
    }

    /// Look up a file inside a folder.
    pub fn file(
        &self,
        workspace_id: WorkspaceId,
        folder_id: FolderId,
        file_id: FileId,
    ) -> Option<&File> {
        self.folder(workspace_id, folder_id)?
            .files
            .iter()
            .find(|file| file.id == file_id)
    }

    /// Find which workspace/folder a file lives under, searching the
    /// whole forest. Used by the change feed, which only knows the row.
    pub fn locate_file(&self, file_id: FileId) -> Option<(WorkspaceId, FolderId)> {
        for workspace in &self.workspaces {
            for folder in &workspace.folders {
                if folder.files.iter().any(|file| file.id == file_id) {
                    return Some((workspace.workspace.id, folder.folder.id));
                }
            }
        }
        None
    }
}
