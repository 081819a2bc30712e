/// Errors from ledger and store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No reading is stored under the key (absent or empty value).
    #[error("reading not found: {0:?}")]
    RecordNotFound(String),

    /// The id is not listed in the ID index.
    #[error("specified key {0:?} not found in index")]
    NotIndexed(String),

    /// The id is already listed in the ID index.
    #[error("specified key {0:?} is already indexed")]
    AlreadyIndexed(String),

    /// Stored bytes at a record key do not decode as a valid reading.
    #[error("corrupt reading record at {key:?}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// The ID index entry does not decode.
    #[error("corrupt ID index at {key:?}: {reason}")]
    CorruptIndex { key: String, reason: String },

    /// A key read by the invocation changed before it committed.
    #[error("commit conflict: key {key:?} changed since it was read")]
    Conflict { key: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unusable (e.g. a poisoned lock).
    #[error("ledger backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
