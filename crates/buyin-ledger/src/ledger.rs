use std::collections::HashSet;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::input::ensure_finite;
use crate::records::{Amount, Player, Transaction};

/// Ordered mapping of player name to balance.
///
/// Iteration order is the order in which players first appeared. Names are
/// unique and matched exactly (case-sensitive).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerLedger {
    players: Vec<Player>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a stored player list, rejecting duplicate names.
    pub fn from_players(players: Vec<Player>) -> LedgerResult<Self> {
        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(player.name.as_str()) {
                return Err(LedgerError::DuplicatePlayer(player.name.clone()));
            }
        }
        Ok(Self { players })
    }

    /// Add `amount` to the named player's balance, creating the player if
    /// absent. Returns the player's index.
    pub fn add_or_top_up(&mut self, name: &str, amount: Amount) -> LedgerResult<usize> {
        let indices = self.add_batch(&[name], amount)?;
        Ok(indices[0])
    }

    /// Apply one buy-in amount to every name in the batch.
    ///
    /// The batch is applied to a working copy and committed only if every
    /// resulting balance is finite, so a rejected batch leaves the ledger
    /// unchanged.
    pub fn add_batch<S: AsRef<str>>(
        &mut self,
        names: &[S],
        amount: Amount,
    ) -> LedgerResult<Vec<usize>> {
        validate_buy_in(amount)?;
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(LedgerError::NoPlayerNames);
        }

        let mut next = self.players.clone();
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            indices.push(credit(&mut next, name, amount)?);
        }
        self.players = next;

        for &index in &indices {
            let player = &self.players[index];
            debug!(player = %player.name, amount, balance = player.balance, "buy-in applied");
        }
        Ok(indices)
    }

    /// Move `amount` from one player to another. Both resulting balances are
    /// checked before either is written. Callers validate the amount.
    pub(crate) fn shift(&mut self, from: usize, to: usize, amount: Amount) -> LedgerResult<()> {
        let from_balance = self.players[from].balance - amount;
        let to_balance = self.players[to].balance + amount;
        ensure_balance(from_balance, amount)?;
        ensure_balance(to_balance, amount)?;
        self.players[from].balance = from_balance;
        self.players[to].balance = to_balance;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn player(&self, index: usize) -> LedgerResult<&Player> {
        self.get(index).ok_or(LedgerError::UnknownPlayer(index))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn balance_of(&self, name: &str) -> Option<Amount> {
        self.index_of(name).map(|i| self.players[i].balance)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sum of all balances: the chips currently in play.
    pub fn total_balance(&self) -> Amount {
        self.players.iter().map(|p| p.balance).sum()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

impl<'a> IntoIterator for &'a PlayerLedger {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn credit(players: &mut Vec<Player>, name: &str, amount: Amount) -> LedgerResult<usize> {
    match players.iter().position(|p| p.name == name) {
        Some(index) => {
            let balance = players[index].balance + amount;
            ensure_balance(balance, amount)?;
            players[index].balance = balance;
            Ok(index)
        }
        None => {
            players.push(Player::new(name, amount));
            Ok(players.len() - 1)
        }
    }
}

fn ensure_balance(balance: Amount, amount: Amount) -> LedgerResult<()> {
    if balance.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount {
            amount,
            reason: "resulting balance is out of range",
        })
    }
}

fn validate_buy_in(amount: Amount) -> LedgerResult<()> {
    ensure_finite(amount)?;
    if amount < 0.0 {
        return Err(LedgerError::InvalidAmount {
            amount,
            reason: "buy-in must not be negative",
        });
    }
    Ok(())
}

/// Append-only record of applied transfers, in application order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
