/// Errors from storage and persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key cannot be used by this backend.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A stored entry could not be decoded.
    #[error("corrupt entry {key:?}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Serialization failure on write.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
