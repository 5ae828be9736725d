//! The ordered key-value store trait.

use crate::StoreError;
use std::collections::BTreeMap;

/// Buffered mutations: `Some(value)` is a put, `None` a delete.
pub type Writes = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Trait for an ordered byte-keyed store.
///
/// Keys are compared bytewise, so module prefixes followed by `/`-separated
/// segments give deterministic iteration order on every replica.
pub trait KvStore {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Apply a batch of buffered writes.
    fn apply(&mut self, writes: Writes) -> Result<(), StoreError> {
        for (key, value) in writes {
            match value {
                Some(v) => self.set(&key, v)?,
                None => self.delete(&key)?,
            }
        }
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
