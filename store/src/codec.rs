//! Typed access on top of [`KvStore`] using bincode.

use crate::{KvStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Read and decode a value; `Ok(None)` if the key is absent.
pub fn get_typed<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &[u8],
) -> Result<Option<T>, StoreError> {
    store.get(key)?.map(|bytes| decode(&bytes)).transpose()
}

/// Encode and write a value.
pub fn set_typed<T: Serialize>(
    store: &mut dyn KvStore,
    key: &[u8],
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, encode(value)?)
}
