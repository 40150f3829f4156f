//! Shared error type for the CRUD stores.

use thiserror::Error;

/// Failure talking to a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into its domain type.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
