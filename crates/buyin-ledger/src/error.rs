/// Errors produced by ledger operations.
///
/// Every variant describes a rejected operation. A rejected operation never
/// mutates the ledger or the transaction log.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("malformed number: {0:?}")]
    MalformedNumber(String),

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: f64, reason: &'static str },

    #[error("no player at index {0}")]
    UnknownPlayer(usize),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("duplicate player name: {0}")]
    DuplicatePlayer(String),

    #[error("no player names given")]
    NoPlayerNames,

    #[error("cannot transfer from {0} to themselves")]
    SelfTransfer(String),

    #[error("no transfer in progress")]
    NoPendingTransfer,
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
