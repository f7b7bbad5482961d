//! The fixed action set that mutates the shared state tree.

use notehub_core::types::id::{FileId, FolderId, WorkspaceId};
use notehub_entity::{File, UpdateFile, UpdateFolder, UpdateWorkspace};

use crate::tree::{FolderNode, WorkspaceNode};

/// All mutations the store accepts. Anything not expressible here cannot
/// touch the tree.
#[derive(Debug, Clone)]
pub enum Action {
    /// Append a workspace.
    AddWorkspace {
        /// The workspace subtree to add.
        workspace: WorkspaceNode,
    },
    /// Remove a workspace and everything under it.
    DeleteWorkspace {
        /// The workspace to remove.
        workspace_id: WorkspaceId,
    },
    /// Patch a workspace's fields.
    UpdateWorkspace {
        /// The workspace to patch.
        workspace_id: WorkspaceId,
        /// The fields to change.
        update: UpdateWorkspace,
    },
    /// Replace the whole forest (initial load).
    SetWorkspaces {
        /// The new forest.
        workspaces: Vec<WorkspaceNode>,
    },
    /// Replace a workspace's folder list (initial load of one workspace).
    SetFolders {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The new folder list.
        folders: Vec<FolderNode>,
    },
    /// Append a folder to its workspace.
    AddFolder {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The folder subtree to add.
        folder: FolderNode,
    },
    /// Patch a folder's fields.
    UpdateFolder {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The folder to patch.
        folder_id: FolderId,
        /// The fields to change.
        update: UpdateFolder,
    },
    /// Remove a folder and its files.
    DeleteFolder {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The folder to remove.
        folder_id: FolderId,
    },
    /// Replace a folder's file list (initial load of one folder).
    SetFiles {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The owning folder.
        folder_id: FolderId,
        /// The new file list, already ordered by the record layer.
        files: Vec<File>,
    },
    /// Append a file to its folder.
    AddFile {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The owning folder.
        folder_id: FolderId,
        /// The file to add.
        file: File,
    },
    /// Patch a file's fields.
    UpdateFile {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The owning folder.
        folder_id: FolderId,
        /// The file to patch.
        file_id: FileId,
        /// The fields to change.
        update: UpdateFile,
    },
    /// Remove a file.
    DeleteFile {
        /// The owning workspace.
        workspace_id: WorkspaceId,
        /// The owning folder.
        folder_id: FolderId,
        /// The file to remove.
        file_id: FileId,
    },
    /// Explicitly do nothing. Unknown/unhandled mutations map here and
    /// must leave the state unchanged — never reset it.
    Noop,
}
