use std::fmt;

use serde::{Deserialize, Serialize};

/// Chip quantity. Balances are signed; transfer amounts are strictly positive.
pub type Amount = f64;

/// A player and the net amount they owe the pot.
///
/// A positive balance means the player has bought in. A negative balance
/// means the player has received more chips than they put in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub balance: Amount,
}

impl Player {
    pub fn new(name: impl Into<String>, balance: Amount) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    /// Returns `true` when the player is net up against the pot.
    pub fn is_in_profit(&self) -> bool {
        self.balance < 0.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - BuyIn: {}", self.name, self.balance)?;
        if self.is_in_profit() {
            write!(f, " (Profit)")?;
        }
        Ok(())
    }
}

/// An applied chip transfer between two players. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: Amount,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Amount) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} transferred {} to {}", self.from, self.amount, self.to)
    }
}
