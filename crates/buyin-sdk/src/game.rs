use buyin_ledger::input::{parse_amount, parse_names};
use buyin_ledger::{
    settle, Amount, FinalChips, LedgerError, Player, PlayerLedger, Settlement, Transaction,
    TransactionLog, TransferEngine, TransferState,
};
use buyin_store::Persistence;
use tracing::{debug, info};

use crate::error::SdkResult;

/// High-level BuyIn game API.
///
/// Owns the player ledger, the transaction log, and the pending transfer.
/// Every successful mutation is written through to the injected
/// [`Persistence`] before returning.
pub struct BuyIn<P> {
    ledger: PlayerLedger,
    log: TransactionLog,
    transfer: TransferEngine,
    persistence: P,
}

impl<P: Persistence> BuyIn<P> {
    /// Restore the game from `persistence`.
    pub fn open(persistence: P) -> SdkResult<Self> {
        let snapshot = persistence.load()?;
        debug!(
            players = snapshot.ledger.len(),
            transactions = snapshot.log.len(),
            "game opened"
        );
        Ok(Self {
            ledger: snapshot.ledger,
            log: snapshot.log,
            transfer: TransferEngine::new(),
            persistence,
        })
    }

    // ---- Queries ----

    pub fn players(&self) -> &[Player] {
        self.ledger.players()
    }

    pub fn ledger(&self) -> &PlayerLedger {
        &self.ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.log.entries()
    }

    /// Chips currently in play: the sum of all balances.
    pub fn active_chips(&self) -> Amount {
        self.ledger.total_balance()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    // ---- Players ----

    /// Add or top up every name in a comma- or newline-separated list with
    /// the same buy-in. Both inputs are parsed before anything is mutated.
    pub fn add_players(&mut self, names: &str, amount: &str) -> SdkResult<Vec<usize>> {
        let amount = parse_amount(amount)?;
        let names = parse_names(names);
        self.add_batch(&names, amount)
    }

    pub fn add_batch<S: AsRef<str>>(&mut self, names: &[S], amount: Amount) -> SdkResult<Vec<usize>> {
        let indices = self.ledger.add_batch(names, amount)?;
        self.sync()?;
        Ok(indices)
    }

    pub fn add_or_top_up(&mut self, name: &str, amount: Amount) -> SdkResult<usize> {
        let index = self.ledger.add_or_top_up(name, amount)?;
        self.sync()?;
        Ok(index)
    }

    // ---- Transfers ----

    pub fn transfer_state(&self) -> &TransferState {
        self.transfer.state()
    }

    pub fn begin_transfer(&mut self, source: usize) -> SdkResult<()> {
        self.transfer.begin(&self.ledger, source)?;
        Ok(())
    }

    /// Indices of players that may receive the pending transfer.
    pub fn destination_choices(&self) -> Vec<usize> {
        self.transfer.destination_choices(&self.ledger)
    }

    pub fn confirm_transfer(&mut self, destination: usize, amount: Amount) -> SdkResult<Transaction> {
        let transaction = self
            .transfer
            .confirm(&mut self.ledger, &mut self.log, destination, amount)?;
        self.sync()?;
        Ok(transaction)
    }

    pub fn cancel_transfer(&mut self) -> bool {
        self.transfer.cancel()
    }

    /// Begin and confirm a transfer between two named players.
    ///
    /// A rejected transfer leaves no pending selection behind.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> SdkResult<Transaction> {
        let source = self.index_of(from)?;
        let destination = self.index_of(to)?;
        self.begin_transfer(source)?;
        let result = self.confirm_transfer(destination, amount);
        if result.is_err() {
            self.transfer.cancel();
        }
        result
    }

    fn index_of(&self, name: &str) -> SdkResult<usize> {
        let name = name.trim();
        self.ledger
            .index_of(name)
            .ok_or_else(|| LedgerError::PlayerNotFound(name.to_string()).into())
    }

    // ---- End of game ----

    /// Compute the end-of-game report from current balances. Nothing is
    /// mutated or persisted.
    pub fn end_game(&self, final_chips: &FinalChips) -> SdkResult<Settlement> {
        let settlement = settle(&self.ledger, final_chips)?;
        info!(
            players = settlement.entries.len(),
            net = settlement.net(),
            "game settled"
        );
        Ok(settlement)
    }

    /// Clear all players and transactions, in memory and in storage.
    ///
    /// `confirm` is asked first; when it declines nothing happens and
    /// `Ok(false)` is returned.
    pub fn reset_all(&mut self, confirm: impl FnOnce() -> bool) -> SdkResult<bool> {
        if !confirm() {
            debug!("reset declined");
            return Ok(false);
        }
        self.ledger.clear();
        self.log.clear();
        self.transfer.cancel();
        self.persistence.clear()?;
        info!("game reset");
        Ok(true)
    }

    fn sync(&self) -> SdkResult<()> {
        self.persistence.save(&self.ledger, &self.log)?;
        Ok(())
    }
}
