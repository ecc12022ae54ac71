use thiserror::Error;

/// Failure from the persistence layer.
///
/// Stores never retry; callers log the error, surface a generic message
/// where a user is waiting, and move on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),
}
