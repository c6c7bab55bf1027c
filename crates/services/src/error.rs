//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionBankError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while fetching the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Bank(#[from] QuestionBankError),
}

/// Errors emitted by event reporters. Never surfaced past `EventSink`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("event collector responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by experiment assignment providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssignmentError {
    #[error("decision service responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
