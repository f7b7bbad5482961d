//! PostgreSQL-backed [`DocumentRecords`] implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId, UserId, WorkspaceId};
use notehub_entity::{
    File, Folder, UpdateFile, UpdateFolder, UpdateWorkspace, User, Workspace,
};

use crate::records::DocumentRecords;
use crate::repositories::{FileRepository, FolderRepository, UserRepository, WorkspaceRepository};

/// The production record store: per-entity repositories over one shared
/// connection pool.
///
/// The row-level change feed reaches clients through the database's own
/// notification channel (an external collaborator), not through this
/// type.
#[derive(Debug, Clone)]
pub struct PgRecords {
    workspaces: WorkspaceRepository,
    folders: FolderRepository,
    files: FileRepository,
    users: UserRepository,
}

impl PgRecords {
    /// Build the record store on top of a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            workspaces: WorkspaceRepository::new(pool.clone()),
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }
}

#[async_trait]
impl DocumentRecords for PgRecords {
    async fn workspace_details(&self, id: WorkspaceId) -> AppResult<Option<Workspace>> {
        self.workspaces.find_by_id(id).await
    }

    async fn folder_details(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn file_details(&self, id: FileId) -> AppResult<Option<File>> {
        self.files.find_by_id(id).await
    }

    async fn create_workspace(&self, workspace: &Workspace) -> AppResult<()> {
        self.workspaces.create(workspace).await
    }

    async fn create_folder(&self, folder: &Folder) -> AppResult<()> {
        self.folders.create(folder).await
    }

    async fn create_file(&self, file: &File) -> AppResult<()> {
        self.files.create(file).await
    }

    async fn update_workspace(&self, update: &UpdateWorkspace, id: WorkspaceId) -> AppResult<()> {
        self.workspaces.update(update, id).await
    }

    async fn update_folder(&self, update: &UpdateFolder, id: FolderId) -> AppResult<()> {
        self.folders.update(update, id).await
    }

    async fn update_file(&self, update: &UpdateFile, id: FileId) -> AppResult<()> {
        self.files.update(update, id).await
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> AppResult<()> {
        self.workspaces.delete(id).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<()> {
        self.folders.delete(id).await
    }

    async fn delete_file(&self, id: FileId) -> AppResult<()> {
        self.files.delete(id).await
    }

    async fn folders_in_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<Folder>> {
        self.folders.find_by_workspace(workspace_id).await
    }

    async fn files_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        self.files.find_by_folder(folder_id).await
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }
}
