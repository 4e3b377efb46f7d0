use scorebook_types::MatchId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("match error: {0}")]
    Match(#[from] scorebook_match::MatchError),

    #[error("store error: {0}")]
    Store(#[from] scorebook_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] scorebook_ledger::LedgerError),
}

impl SdkError {
    /// The operation was refused because of the match phase or role state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::Match(e) if e.is_invalid_state())
    }

    /// The operation was refused because of its inputs.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Match(e) if e.is_invalid_argument())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
