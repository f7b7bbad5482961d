//! The record-access seam.

use async_trait::async_trait;

use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_entity::{
    File, Folder, UpdateFile, UpdateFolder, UpdateWorkspace, User, Workspace,
};

/// Keyed create/read/update/delete operations on workspace, folder, and
/// file records — the sync coordinator's only persistence surface.
///
/// `*_details` returns zero-or-one row; an empty result is a valid
/// non-error outcome signaling "not found". The `*_in_*` listings come
/// back ordered ascending by `created_at`, the ordering the state tree
/// trusts. Callers validate id shape *before* reaching this trait;
/// everything here takes already-typed ids.
#[async_trait]
pub trait DocumentRecords: Send + Sync {
    /// Fetch one workspace by id.
    async fn workspace_details(&self, id: WorkspaceId) -> AppResult<Option<Workspace>>;

    /// Fetch one folder by id.
    async fn folder_details(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Fetch one file by id.
    async fn file_details(&self, id: FileId) -> AppResult<Option<File>>;

    /// Insert a workspace.
    async fn create_workspace(&self, workspace: &Workspace) -> AppResult<()>;

    /// Insert a folder.
    async fn create_folder(&self, folder: &Folder) -> AppResult<()>;

    /// Insert a file.
    async fn create_file(&self, file: &File) -> AppResult<()>;

    /// Apply a partial update to a workspace by id.
    async fn update_workspace(&self, update: &UpdateWorkspace, id: WorkspaceId) -> AppResult<()>;

    /// Apply a partial update to a folder by id.
    async fn update_folder(&self, update: &UpdateFolder, id: FolderId) -> AppResult<()>;

    /// Apply a partial update to a file by id.
    async fn update_file(&self, update: &UpdateFile, id: FileId) -> AppResult<()>;

    /// Delete a workspace by id.
    async fn delete_workspace(&self, id: WorkspaceId) -> AppResult<()>;

    /// Delete a folder by id.
    async fn delete_folder(&self, id: FolderId) -> AppResult<()>;

    /// Delete a file by id.
    async fn delete_file(&self, id: FileId) -> AppResult<()>;

    /// All folders of a workspace, ordered ascending by `created_at`.
    async fn folders_in_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<Folder>>;

    /// All files of a folder, ordered ascending by `created_at`.
    async fn files_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>>;

    /// Look up a user account (presence identity derivation).
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;
}
