//! Workspace repository implementation.

use sqlx::PgPool;

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::id::WorkspaceId;
use notehub_entity::{UpdateWorkspace, Workspace};

/// Repository for workspace CRUD operations.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    /// Create a new workspace repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a workspace by ID. Zero rows is a valid "not found" outcome.
    pub async fn find_by_id(&self, id: WorkspaceId) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find workspace", e))
    }

    /// Insert a workspace record.
    pub async fn create(&self, workspace: &Workspace) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO workspaces (id, owner_id, title, icon_id, data, in_trash, logo, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(workspace.id)
        .bind(workspace.owner_id)
        .bind(&workspace.title)
        .bind(&workspace.icon_id)
        .bind(&workspace.data)
        .bind(&workspace.in_trash)
        .bind(&workspace.logo)
        .bind(workspace.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create workspace", e))?;
        Ok(())
    }

    /// Apply a partial update by ID.
    pub async fn update(&self, update: &UpdateWorkspace, id: WorkspaceId) -> AppResult<()> {
        let mut workspace = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workspace {id} not found")))?;
        update.apply_to(&mut workspace);

        sqlx::query(
            "UPDATE workspaces SET title = $2, icon_id = $3, data = $4, in_trash = $5, logo = $6 \
             WHERE id = $1",
        )
        .bind(workspace.id)
        .bind(&workspace.title)
        .bind(&workspace.icon_id)
        .bind(&workspace.data)
        .bind(&workspace.in_trash)
        .bind(&workspace.logo)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update workspace", e))?;
        Ok(())
    }

    /// Delete a workspace record by ID.
    pub async fn delete(&self, id: WorkspaceId) -> AppResult<()> {
        sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete workspace", e)
            })?;
        Ok(())
    }
}
