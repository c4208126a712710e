//! Durable storage for the BuyIn tracker.
//!
//! The game state is mirrored into a string-keyed [`KeyValueStore`] after
//! every mutation and restored from it on startup.
//!
//! # Storage Backends
//!
//! - [`InMemoryKeyValueStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileKeyValueStore`] -- one JSON file per key in a data directory
//!
//! # Persistence
//!
//! [`JsonPersistence`] implements the [`Persistence`] port over any backend,
//! using the `players` and `transactions` keys. Undecodable entries are
//! handled according to a [`CorruptDataPolicy`].

pub mod error;
pub mod file;
pub mod memory;
pub mod persistence;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use persistence::{
    CorruptDataPolicy, GameSnapshot, JsonPersistence, Persistence, PLAYERS_KEY, TRANSACTIONS_KEY,
};
pub use traits::KeyValueStore;
