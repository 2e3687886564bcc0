//! # Storage Traits
//!
//! The durable key-value seam underneath the storage engine. Abstracting it
//! keeps the engine and the reminder dedup marker testable against in-memory
//! and failure-injecting stores.

use anyhow::Result;

/// Durable string-keyed storage.
///
/// Implementations must persist each key independently; the engine writes the
/// whole blob under a single key, so per-key atomicity is the only atomicity
/// required.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
