//! User repository implementation.

use sqlx::PgPool;

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::id::UserId;
use notehub_entity::User;

/// Read-only repository over the identity provider's user table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, email, avatar_url FROM users WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }
}
