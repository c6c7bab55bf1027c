use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{IdentityRepository, StorageError};
use quiz_core::model::UserKey;

use super::SqliteRepository;

#[async_trait]
impl IdentityRepository for SqliteRepository {
    async fn get_user_key(&self) -> Result<Option<UserKey>, StorageError> {
        let row = sqlx::query("SELECT user_key FROM identity WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("user_key")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        UserKey::parse(raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_user_key(&self, key: &UserKey) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO identity (id, user_key, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                user_key = excluded.user_key
            ",
        )
        .bind(1_i64)
        .bind(key.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
