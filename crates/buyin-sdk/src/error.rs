use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] buyin_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] buyin_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
