//! Accounting core for the BuyIn tracker.
//!
//! This crate holds the in-memory game state and the rules that govern it:
//! - [`PlayerLedger`]: player name to balance, in first-seen order
//! - [`TransactionLog`]: append-only record of applied transfers
//! - [`TransferEngine`]: two-step transfer state machine (select source,
//!   then confirm destination and amount)
//! - [`settle`]: pure end-of-game profit/loss report
//! - [`input`]: parsing of raw name lists and amounts
//!
//! # Invariants
//!
//! 1. Player names are unique within a ledger.
//! 2. Transfers move a strictly positive amount and are zero-sum.
//! 3. Log order is application order.
//! 4. Rejected operations mutate nothing.

pub mod error;
pub mod input;
pub mod ledger;
pub mod records;
pub mod settlement;
pub mod transfer;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{PlayerLedger, TransactionLog};
pub use records::{Amount, Player, Transaction};
pub use settlement::{settle, FinalChips, Outcome, Settlement, SettlementEntry};
pub use transfer::{TransferEngine, TransferState};
