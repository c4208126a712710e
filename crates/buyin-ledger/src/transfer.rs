//! Two-step chip transfer between players.
//!
//! A transfer starts by selecting a source player ([`TransferEngine::begin`]),
//! which moves the engine from [`TransferState::Idle`] to
//! [`TransferState::SelectingDestination`]. Confirming with a destination and
//! an amount applies the transfer and returns to `Idle`; cancelling returns to
//! `Idle` without touching any balance.

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::input::ensure_finite;
use crate::ledger::{PlayerLedger, TransactionLog};
use crate::records::{Amount, Transaction};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransferState {
    #[default]
    Idle,
    SelectingDestination { source: usize, source_name: String },
}

#[derive(Clone, Debug, Default)]
pub struct TransferEngine {
    state: TransferState,
}

impl TransferEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransferState::Idle
    }

    /// Index of the pending source player, if a transfer is in progress.
    pub fn pending_source(&self) -> Option<usize> {
        match &self.state {
            TransferState::Idle => None,
            TransferState::SelectingDestination { source, .. } => Some(*source),
        }
    }

    /// Select the source player. Selecting again replaces the pending source.
    pub fn begin(&mut self, ledger: &PlayerLedger, source: usize) -> LedgerResult<()> {
        let player = ledger.player(source)?;
        debug!(source = %player.name, "transfer started");
        self.state = TransferState::SelectingDestination {
            source,
            source_name: player.name.clone(),
        };
        Ok(())
    }

    /// Players that may receive the pending transfer: everyone but the source.
    pub fn destination_choices(&self, ledger: &PlayerLedger) -> Vec<usize> {
        let source = self.pending_source();
        (0..ledger.len()).filter(|i| Some(*i) != source).collect()
    }

    /// Apply the pending transfer.
    ///
    /// On success the source balance drops by `amount`, the destination
    /// balance rises by `amount`, the transfer is appended to `log`, and the
    /// engine returns to `Idle`. On any error nothing is mutated and the
    /// pending source is kept. Balances are allowed to go negative.
    pub fn confirm(
        &mut self,
        ledger: &mut PlayerLedger,
        log: &mut TransactionLog,
        destination: usize,
        amount: Amount,
    ) -> LedgerResult<Transaction> {
        let (source, source_name) = match &self.state {
            TransferState::Idle => return Err(LedgerError::NoPendingTransfer),
            TransferState::SelectingDestination {
                source,
                source_name,
            } => (*source, source_name.as_str()),
        };

        ensure_finite(amount)?;
        if amount <= 0.0 {
            return Err(LedgerError::InvalidAmount {
                amount,
                reason: "transfer amount must be positive",
            });
        }

        // The source is remembered by identity; its slot must still hold it.
        match ledger.get(source) {
            Some(player) if player.name == source_name => {}
            _ => return Err(LedgerError::PlayerNotFound(source_name.to_string())),
        }
        let destination_name = ledger.player(destination)?.name.clone();
        if destination == source {
            return Err(LedgerError::SelfTransfer(destination_name));
        }

        ledger.shift(source, destination, amount)?;
        let transaction = Transaction::new(source_name, destination_name, amount);
        log.append(transaction.clone());
        debug!(
            from = %transaction.from,
            to = %transaction.to,
            amount,
            "transfer applied"
        );
        self.state = TransferState::Idle;
        Ok(transaction)
    }

    /// Abandon the pending transfer. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = !self.is_idle();
        self.state = TransferState::Idle;
        was_pending
    }
}
