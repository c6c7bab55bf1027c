use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::QuestionId;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{EventLogRepository, EventRecord, EventRow, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_event_row(row: &sqlx::sqlite::SqliteRow) -> Result<EventRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let name: String = row.try_get("name").map_err(ser)?;
    let question_id: i64 = row.try_get("question_id").map_err(ser)?;
    let question_id = u64::try_from(question_id)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid question_id: {question_id}")))?;
    let payload: String = row.try_get("payload").map_err(ser)?;
    let payload = serde_json::from_str(&payload).map_err(ser)?;
    let occurred_at: DateTime<Utc> = row.try_get("occurred_at").map_err(ser)?;

    Ok(EventRow {
        id,
        record: EventRecord {
            name,
            question_id,
            payload,
            occurred_at,
        },
    })
}

#[async_trait]
impl EventLogRepository for SqliteRepository {
    async fn append_event(&self, record: &EventRecord) -> Result<i64, StorageError> {
        let question_id = i64::try_from(record.question_id.value())
            .map_err(|_| StorageError::Serialization("question_id overflow".into()))?;
        let payload = serde_json::to_string(&record.payload).map_err(ser)?;

        let res = sqlx::query(
            r"
                INSERT INTO engagement_events (name, question_id, payload, occurred_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(&record.name)
        .bind(question_id)
        .bind(payload)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_recent_events(&self, limit: u32) -> Result<Vec<EventRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, name, question_id, payload, occurred_at
                FROM engagement_events
                ORDER BY id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_event_row).collect()
    }
}
