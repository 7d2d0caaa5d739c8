//! Typed outcomes for store and repository operations.
//!
//! The repository and store never swallow failures; they return these types
//! and the HTTP handler is the only place they are translated into responses.

use thiserror::Error;

/// The backing persistence medium failed (unreachable, throttled, rejected
/// the request for a reason other than a condition check).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Outcome of a conditional put.
#[derive(Debug, Error)]
pub enum PutError {
    /// A record with this key is already present; nothing was written.
    #[error("record already exists")]
    AlreadyExists,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a keyed delete.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// No record with this key was present.
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures a task creation can surface to the client.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The candidate task failed validation.
    #[error("{0}")]
    Validation(String),

    /// A task with the supplied id already exists.
    #[error("task {0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
