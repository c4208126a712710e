use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LedgerResult;
use crate::input::ensure_finite;
use crate::ledger::PlayerLedger;
use crate::records::Amount;

/// Final chip counts keyed by player name.
pub type FinalChips = HashMap<String, Amount>;

/// One player's end-of-game result.
///
/// `profit_loss` is balance minus final chips: positive is a loss to the
/// player, negative is a profit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub name: String,
    #[serde(rename = "profitLoss")]
    pub profit_loss: Amount,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Loss(Amount),
    Profit(Amount),
}

impl SettlementEntry {
    pub fn outcome(&self) -> Outcome {
        if self.profit_loss > 0.0 {
            Outcome::Loss(self.profit_loss)
        } else {
            // Subtracting from +0.0 keeps break-even at +0.0, never -0.0.
            Outcome::Profit(0.0 - self.profit_loss)
        }
    }
}

impl fmt::Display for SettlementEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome() {
            Outcome::Loss(x) => write!(f, "{} Loss: {}", self.name, x),
            Outcome::Profit(x) => write!(f, "{} Profit: {}", self.name, x),
        }
    }
}

/// Snapshot report produced at the end of a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// One entry per player, in ledger order.
    pub entries: Vec<SettlementEntry>,
    /// Players with no final chip count, settled as if they hold zero.
    pub defaulted: Vec<String>,
}

impl Settlement {
    /// Net of all entries. Zero when the final chips account for every
    /// chip in play.
    pub fn net(&self) -> Amount {
        self.entries.iter().map(|e| e.profit_loss).sum()
    }

    pub fn entry(&self, name: &str) -> Option<&SettlementEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Compute each player's profit or loss from their current balance.
///
/// Players absent from `final_chips` are settled with zero chips and listed
/// in [`Settlement::defaulted`]. Entries for names not in the ledger are
/// ignored. The ledger is not modified.
pub fn settle(ledger: &PlayerLedger, final_chips: &FinalChips) -> LedgerResult<Settlement> {
    for chips in final_chips.values() {
        ensure_finite(*chips)?;
    }

    let mut settlement = Settlement::default();
    for player in ledger {
        let chips = match final_chips.get(&player.name) {
            Some(chips) => *chips,
            None => {
                settlement.defaulted.push(player.name.clone());
                0.0
            }
        };
        settlement.entries.push(SettlementEntry {
            name: player.name.clone(),
            profit_loss: player.balance - chips,
        });
    }

    if !settlement.defaulted.is_empty() {
        warn!(players = ?settlement.defaulted, "final chips missing, settled as zero");
    }
    Ok(settlement)
}
