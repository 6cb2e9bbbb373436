//! Key-value store port - durable named slots
//!
//! Every write is synchronous: when `put` or `remove` returns `Ok`, the
//! change is durable. Services rely on this for write-through persistence.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;

/// Durable string slots addressed by key
pub trait KeyValueStore: Send + Sync {
    /// Short backend name (e.g., "duckdb", "file", "memory")
    fn backend(&self) -> &str;

    /// Read a slot, `None` if it was never written or has been removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a slot
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read a slot and deserialize it as JSON
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize a value as JSON and write it to a slot
pub fn store_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}
