use scorebook_types::TypeError;

/// Errors produced by ledger operations.
///
/// A failed operation never leaves the ledger partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The innings is in a state where the operation does not apply.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Caller-supplied data violates a documented constraint.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("integrity violation at ball {seq}: {reason}")]
    IntegrityViolation { seq: u64, reason: String },
}

impl From<TypeError> for LedgerError {
    fn from(err: TypeError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
