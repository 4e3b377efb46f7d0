use scorebook_types::MatchId;

/// Errors from snapshot store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Checksum mismatch on read (data corruption).
    #[error("checksum mismatch for {id}: expected {expected}, computed {computed}")]
    HashMismatch {
        id: MatchId,
        expected: String,
        computed: String,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data cannot be decoded.
    #[error("corrupt snapshot {id}: {reason}")]
    Corrupt { id: MatchId, reason: String },

    /// The snapshot stored under one id holds a different match.
    #[error("snapshot stored as {stored} holds match {found}")]
    IdMismatch { stored: MatchId, found: MatchId },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
