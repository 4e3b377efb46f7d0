use scorebook_ledger::LedgerError;

/// Errors produced by match session operations.
///
/// Ledger errors keep their kind: an invalid ledger state is an invalid
/// match state, and a rejected ball is a rejected argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("integrity violation at ball {seq}: {reason}")]
    Integrity { seq: u64, reason: String },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshot { found: u32, expected: u32 },
}

impl MatchError {
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<LedgerError> for MatchError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidState(reason) => Self::InvalidState(reason),
            LedgerError::InvalidArgument(reason) => Self::InvalidArgument(reason),
            LedgerError::IntegrityViolation { seq, reason } => Self::Integrity { seq, reason },
        }
    }
}
