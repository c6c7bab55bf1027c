use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{EngagementEvent, QuestionId, UserKey};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for an engagement event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub name: String,
    pub question_id: QuestionId,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventRecord {
    #[must_use]
    pub fn from_event(event: &EngagementEvent, occurred_at: DateTime<Utc>) -> Self {
        Self {
            name: event.name().to_string(),
            question_id: event.question_id(),
            payload: event.payload(),
            occurred_at,
        }
    }
}

/// An event record together with its storage id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: i64,
    pub record: EventRecord,
}

/// Repository contract for the per-install stable identifier.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be read or is corrupt.
    async fn get_user_key(&self) -> Result<Option<UserKey>, StorageError>;

    /// Persist the key, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be stored.
    async fn save_user_key(&self, key: &UserKey) -> Result<(), StorageError>;
}

/// Append-only local log of engagement events.
#[async_trait]
pub trait EventLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the event cannot be stored.
    async fn append_event(&self, record: &EventRecord) -> Result<i64, StorageError>;

    /// Most recent events first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    async fn list_recent_events(&self, limit: u32) -> Result<Vec<EventRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    user_key: Arc<Mutex<Option<UserKey>>>,
    events: Arc<Mutex<Vec<EventRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryRepository {
    async fn get_user_key(&self) -> Result<Option<UserKey>, StorageError> {
        let guard = self
            .user_key
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_user_key(&self, key: &UserKey) -> Result<(), StorageError> {
        let mut guard = self
            .user_key
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(key.clone());
        Ok(())
    }
}

#[async_trait]
impl EventLogRepository for InMemoryRepository {
    async fn append_event(&self, record: &EventRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("event id overflow".into()))?
            + 1;
        guard.push(EventRow {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn list_recent_events(&self, limit: u32) -> Result<Vec<EventRow>, StorageError> {
        let guard = self
            .events
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Aggregates repository implementations behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub identity: Arc<dyn IdentityRepository>,
    pub events: Arc<dyn EventLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let identity: Arc<dyn IdentityRepository> = Arc::new(repo.clone());
        let events: Arc<dyn EventLogRepository> = Arc::new(repo);
        Self { identity, events }
    }
}
