//! File repository implementation.

use sqlx::PgPool;

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::id::{FileId, FolderId};
use notehub_entity::{File, UpdateFile};

/// Repository for file CRUD and listing operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID. Zero rows is a valid "not found" outcome.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List a folder's files, ordered ascending by creation time — the
    /// ordering the state tree trusts.
    pub async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = $1 ORDER BY created_at ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Insert a file record.
    pub async fn create(&self, file: &File) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO files (id, workspace_id, folder_id, title, icon_id, data, in_trash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(file.id)
        .bind(file.workspace_id)
        .bind(file.folder_id)
        .bind(&file.title)
        .bind(&file.icon_id)
        .bind(&file.data)
        .bind(&file.in_trash)
        .bind(file.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))?;
        Ok(())
    }

    /// Apply a partial update by ID.
    pub async fn update(&self, update: &UpdateFile, id: FileId) -> AppResult<()> {
        let mut file = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        update.apply_to(&mut file);

        sqlx::query(
            "UPDATE files SET title = $2, icon_id = $3, data = $4, in_trash = $5 WHERE id = $1",
        )
        .bind(file.id)
        .bind(&file.title)
        .bind(&file.icon_id)
        .bind(&file.data)
        .bind(&file.in_trash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?;
        Ok(())
    }

    /// Delete a file record by ID.
    pub async fn delete(&self, id: FileId) -> AppResult<()> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(())
    }
}
