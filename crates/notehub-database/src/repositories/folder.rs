//! Folder repository implementation.

use sqlx::PgPool;

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::id::{FolderId, WorkspaceId};
use notehub_entity::{Folder, UpdateFolder};

/// Repository for folder CRUD and listing operations.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID. Zero rows is a valid "not found" outcome.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List a workspace's folders, ordered ascending by creation time —
    /// the ordering the state tree trusts.
    pub async fn find_by_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE workspace_id = $1 ORDER BY created_at ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Insert a folder record.
    pub async fn create(&self, folder: &Folder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folders (id, workspace_id, title, icon_id, data, in_trash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(folder.id)
        .bind(folder.workspace_id)
        .bind(&folder.title)
        .bind(&folder.icon_id)
        .bind(&folder.data)
        .bind(&folder.in_trash)
        .bind(folder.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))?;
        Ok(())
    }

    /// Apply a partial update by ID.
    pub async fn update(&self, update: &UpdateFolder, id: FolderId) -> AppResult<()> {
        let mut folder = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        update.apply_to(&mut folder);

        sqlx::query(
            "UPDATE folders SET title = $2, icon_id = $3, data = $4, in_trash = $5 WHERE id = $1",
        )
        .bind(folder.id)
        .bind(&folder.title)
        .bind(&folder.icon_id)
        .bind(&folder.data)
        .bind(&folder.in_trash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?;
        Ok(())
    }

    /// Delete a folder record by ID.
    pub async fn delete(&self, id: FolderId) -> AppResult<()> {
        sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
        Ok(())
    }
}
