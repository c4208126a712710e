//! Mirroring of the game state into a [`KeyValueStore`].
//!
//! Two entries are kept:
//! - `players`: JSON array of `{"name": string, "balance": number}`
//! - `transactions`: JSON array of `{"from": string, "to": string, "amount": number}`

use buyin_ledger::{Player, PlayerLedger, Transaction, TransactionLog};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

pub const PLAYERS_KEY: &str = "players";
pub const TRANSACTIONS_KEY: &str = "transactions";

/// What to do when a stored entry cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptDataPolicy {
    /// Log a warning and continue with an empty collection for that entry.
    #[default]
    #[serde(alias = "empty")]
    TreatAsEmpty,
    /// Return [`StoreError::Corrupt`].
    Fail,
}

/// The restored game state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameSnapshot {
    pub ledger: PlayerLedger,
    pub log: TransactionLog,
}

/// Load/save boundary between the game state and durable storage.
pub trait Persistence {
    /// Restore the game state. Absent entries yield empty collections.
    fn load(&self) -> StoreResult<GameSnapshot>;

    /// Write both entries, unconditionally.
    fn save(&self, ledger: &PlayerLedger, log: &TransactionLog) -> StoreResult<()>;

    /// Remove both entries.
    fn clear(&self) -> StoreResult<()>;
}

/// [`Persistence`] over any [`KeyValueStore`], encoding entries as JSON.
#[derive(Debug)]
pub struct JsonPersistence<S> {
    store: S,
    policy: CorruptDataPolicy,
}

impl<S: KeyValueStore> JsonPersistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, CorruptDataPolicy::default())
    }

    pub fn with_policy(store: S, policy: CorruptDataPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> CorruptDataPolicy {
        self.policy
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => self.corrupt(key, e.to_string()),
        }
    }

    fn corrupt<T>(&self, key: &str, reason: String) -> StoreResult<Vec<T>> {
        match self.policy {
            CorruptDataPolicy::TreatAsEmpty => {
                warn!(key, %reason, "discarding corrupt stored entry");
                Ok(Vec::new())
            }
            CorruptDataPolicy::Fail => Err(StoreError::Corrupt {
                key: key.to_string(),
                reason,
            }),
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json =
            serde_json::to_string(items).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(key, &json)
    }
}

impl<S: KeyValueStore> Persistence for JsonPersistence<S> {
    fn load(&self) -> StoreResult<GameSnapshot> {
        let players: Vec<Player> = self.read_entry(PLAYERS_KEY)?;
        let ledger = match PlayerLedger::from_players(players) {
            Ok(ledger) => ledger,
            Err(e) => {
                self.corrupt::<Player>(PLAYERS_KEY, e.to_string())?;
                PlayerLedger::new()
            }
        };
        let transactions: Vec<Transaction> = self.read_entry(TRANSACTIONS_KEY)?;
        let log = match transactions
            .iter()
            .try_for_each(|t| check_transaction(&ledger, t))
        {
            Ok(()) => TransactionLog::from_entries(transactions),
            Err(reason) => {
                self.corrupt::<Transaction>(TRANSACTIONS_KEY, reason)?;
                TransactionLog::new()
            }
        };
        debug!(players = ledger.len(), transactions = log.len(), "state loaded");
        Ok(GameSnapshot { ledger, log })
    }

    fn save(&self, ledger: &PlayerLedger, log: &TransactionLog) -> StoreResult<()> {
        self.write_entry(PLAYERS_KEY, ledger.players())?;
        self.write_entry(TRANSACTIONS_KEY, log.entries())?;
        debug!(players = ledger.len(), transactions = log.len(), "state saved");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.store.remove(PLAYERS_KEY)?;
        self.store.remove(TRANSACTIONS_KEY)?;
        Ok(())
    }
}

/// A stored transfer must be one the transfer engine could have applied to
/// the stored roster.
fn check_transaction(ledger: &PlayerLedger, t: &Transaction) -> Result<(), String> {
    if !t.amount.is_finite() || t.amount <= 0.0 {
        return Err(format!("transfer amount {} must be positive", t.amount));
    }
    for name in [&t.from, &t.to] {
        if ledger.index_of(name).is_none() {
            return Err(format!("transfer names unknown player {name:?}"));
        }
    }
    if t.from == t.to {
        return Err(format!("transfer from {:?} to itself", t.from));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKeyValueStore;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn sample() -> (PlayerLedger, TransactionLog) {
        let ledger = PlayerLedger::from_players(vec![
            Player::new("Alice", 70.0),
            Player::new("Bob", 130.0),
        ])
        .unwrap();
        let log = TransactionLog::from_entries(vec![Transaction::new("Alice", "Bob", 30.0)]);
        (ledger, log)
    }

    #[test]
    fn empty_store_loads_empty() {
        let persistence = JsonPersistence::new(InMemoryKeyValueStore::new());
        assert_eq!(persistence.load().unwrap(), GameSnapshot::default());
    }

    #[test]
    fn save_then_load() {
        let persistence = JsonPersistence::new(InMemoryKeyValueStore::new());
        let (ledger, log) = sample();
        persistence.save(&ledger, &log).unwrap();
        let snapshot = persistence.load().unwrap();
        assert_eq!(snapshot.ledger, ledger);
        assert_eq!(snapshot.log, log);
    }

    #[test]
    fn save_writes_both_keys_even_when_empty() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = JsonPersistence::new(Arc::clone(&store));
        persistence
            .save(&PlayerLedger::new(), &TransactionLog::new())
            .unwrap();
        assert_eq!(store.get(PLAYERS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn reads_integer_json_numbers() {
        let store = InMemoryKeyValueStore::new();
        store
            .set(PLAYERS_KEY, r#"[{"name":"Alice","balance":100},{"name":"Bob","balance":-5}]"#)
            .unwrap();
        store
            .set(TRANSACTIONS_KEY, r#"[{"from":"Alice","to":"Bob","amount":30}]"#)
            .unwrap();
        let snapshot = JsonPersistence::new(store).load().unwrap();
        assert_eq!(snapshot.ledger.balance_of("Alice"), Some(100.0));
        assert_eq!(snapshot.ledger.balance_of("Bob"), Some(-5.0));
        assert_eq!(snapshot.log.entries()[0], Transaction::new("Alice", "Bob", 30.0));
    }

    #[test]
    fn clear_removes_both_keys() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = JsonPersistence::new(Arc::clone(&store));
        let (ledger, log) = sample();
        persistence.save(&ledger, &log).unwrap();
        persistence.clear().unwrap();
        assert!(store.is_empty().unwrap());
        persistence.clear().unwrap();
    }

    #[test]
    fn corrupt_entry_treated_as_empty_by_default() {
        let store = InMemoryKeyValueStore::new();
        store
            .set(PLAYERS_KEY, r#"[{"name":"A","balance":1},{"name":"B","balance":2}]"#)
            .unwrap();
        store.set(TRANSACTIONS_KEY, "{not json").unwrap();
        let snapshot = JsonPersistence::new(store).load().unwrap();
        assert_eq!(snapshot.ledger.len(), 2);
        assert!(snapshot.log.is_empty());
    }

    #[test]
    fn history_against_discarded_roster_is_discarded() {
        let store = InMemoryKeyValueStore::new();
        store.set(PLAYERS_KEY, "{not json").unwrap();
        store
            .set(TRANSACTIONS_KEY, r#"[{"from":"A","to":"B","amount":1}]"#)
            .unwrap();
        let snapshot = JsonPersistence::new(store).load().unwrap();
        assert!(snapshot.ledger.is_empty());
        assert!(snapshot.log.is_empty());
    }

    #[test]
    fn impossible_transfers_are_corrupt() {
        let players = r#"[{"name":"Alice","balance":70},{"name":"Bob","balance":130}]"#;
        let cases = [
            r#"[{"from":"Alice","to":"Bob","amount":-5}]"#,
            r#"[{"from":"Alice","to":"Bob","amount":0}]"#,
            r#"[{"from":"Alice","to":"Zed","amount":5}]"#,
            r#"[{"from":"Ghost","to":"Bob","amount":5}]"#,
            r#"[{"from":"Bob","to":"Bob","amount":5}]"#,
            r#"[{"from":"Alice","to":"Bob","amount":5},{"from":"Alice","to":"Bob","amount":-1}]"#,
        ];
        for raw in cases {
            let store = InMemoryKeyValueStore::new();
            store.set(PLAYERS_KEY, players).unwrap();
            store.set(TRANSACTIONS_KEY, raw).unwrap();

            let strict = JsonPersistence::with_policy(store, CorruptDataPolicy::Fail);
            let err = strict.load().unwrap_err();
            assert!(
                matches!(err, StoreError::Corrupt { ref key, .. } if key == TRANSACTIONS_KEY),
                "{raw}"
            );

            let snapshot = JsonPersistence::new(strict.store).load().unwrap();
            assert_eq!(snapshot.ledger.len(), 2, "{raw}");
            assert!(snapshot.log.is_empty(), "{raw}");
        }
    }

    #[test]
    fn corrupt_entry_fails_under_strict_policy() {
        let store = InMemoryKeyValueStore::new();
        store.set(TRANSACTIONS_KEY, r#"[{"from":"A"}]"#).unwrap();
        let persistence = JsonPersistence::with_policy(store, CorruptDataPolicy::Fail);
        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == TRANSACTIONS_KEY));
    }

    #[test]
    fn duplicate_stored_names_are_corrupt() {
        let store = InMemoryKeyValueStore::new();
        store
            .set(PLAYERS_KEY, r#"[{"name":"A","balance":1},{"name":"A","balance":2}]"#)
            .unwrap();
        let strict = JsonPersistence::with_policy(store, CorruptDataPolicy::Fail);
        assert!(matches!(strict.load(), Err(StoreError::Corrupt { .. })));

        let lenient = JsonPersistence::new(strict.store);
        assert!(lenient.load().unwrap().ledger.is_empty());
    }

    #[test]
    fn policy_parses_from_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            on_corrupt: CorruptDataPolicy,
        }
        let w: Wrapper = serde_json::from_str(r#"{"on_corrupt":"empty"}"#).unwrap();
        assert_eq!(w.on_corrupt, CorruptDataPolicy::TreatAsEmpty);
        let w: Wrapper = serde_json::from_str(r#"{"on_corrupt":"fail"}"#).unwrap();
        assert_eq!(w.on_corrupt, CorruptDataPolicy::Fail);
    }

    fn player_strategy() -> impl Strategy<Value = Vec<Player>> {
        prop::collection::btree_map("[A-Za-z]{1,8}", -10_000i32..10_000, 0..6).prop_map(|m| {
            m.into_iter()
                .map(|(name, balance)| Player::new(name, f64::from(balance)))
                .collect()
        })
    }

    /// Players plus transfers between distinct players of that roster.
    fn game_strategy() -> impl Strategy<Value = (Vec<Player>, Vec<Transaction>)> {
        player_strategy()
            .prop_filter("transfers need two players", |p| p.len() >= 2)
            .prop_flat_map(|players| {
                let n = players.len();
                let transfers =
                    prop::collection::vec((0..n, 1..n, 1u32..1_000), 0..6).prop_map(
                        move |picks| {
                            picks
                                .into_iter()
                                .map(|(from, offset, amount)| (from, (from + offset) % n, amount))
                                .collect::<Vec<_>>()
                        },
                    );
                (Just(players), transfers)
            })
            .prop_map(|(players, picks)| {
                let transactions = picks
                    .into_iter()
                    .map(|(from, to, amount)| {
                        Transaction::new(
                            players[from].name.clone(),
                            players[to].name.clone(),
                            f64::from(amount),
                        )
                    })
                    .collect();
                (players, transactions)
            })
    }

    proptest! {
        #[test]
        fn load_after_save_round_trips((players, transactions) in game_strategy()) {
            let persistence = JsonPersistence::new(InMemoryKeyValueStore::new());
            let ledger = PlayerLedger::from_players(players).unwrap();
            let log = TransactionLog::from_entries(transactions);
            persistence.save(&ledger, &log).unwrap();
            let snapshot = persistence.load().unwrap();
            prop_assert_eq!(snapshot.ledger, ledger);
            prop_assert_eq!(snapshot.log, log);
        }
    }
}
