use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("key already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the record lifecycle manager.
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The identifier (short key or secret key) did not resolve to a record.
    #[error("no record found for '{0}'")]
    NotFound(String),
    #[error("could not allocate a unique key after {attempts} attempts")]
    KeySpaceExhausted { attempts: usize },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
