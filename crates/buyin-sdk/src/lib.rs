//! High-level API for the BuyIn tracker.
//!
//! [`BuyIn`] is the single owner of the game state. It is constructed over a
//! [`buyin_store::Persistence`] implementation, restores state from it on
//! open, and writes both collections back after every mutation.

pub mod error;
pub mod game;

pub use error::{SdkError, SdkResult};
pub use game::BuyIn;

pub use buyin_ledger::{
    input, Amount, FinalChips, LedgerError, Outcome, Player, PlayerLedger, Settlement,
    SettlementEntry, Transaction, TransferState,
};
pub use buyin_store::{
    CorruptDataPolicy, FileKeyValueStore, InMemoryKeyValueStore, JsonPersistence, KeyValueStore,
    Persistence, StoreError,
};
