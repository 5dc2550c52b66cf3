use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::RefreshTokenStore;

/// Single-slot refresh token table keyed by user id.
pub struct PostgresRefreshTokenStore {
    pool: PgPool,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    async fn upsert(&self, user_id: UserId, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET token = EXCLUDED.token, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Failure(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT token
            FROM refresh_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Failure(e.to_string()))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        // Zero affected rows is not an error
        sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Failure(e.to_string()))?;

        Ok(())
    }
}
