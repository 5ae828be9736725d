//! Key-value storage for the restake ledger.
//!
//! Every module keeps its state in one ordered byte-keyed store. The rest of
//! the codebase depends only on the [`KvStore`] trait:
//!
//! - [`MemStore`] is the committed in-memory backend.
//! - [`CacheStore`] is a buffered write branch over any parent store. Its
//!   writes reach the parent only through [`KvStore::apply`]; dropping the
//!   branch discards them. This is the rollback boundary for transactions.

pub mod cache;
pub mod codec;
pub mod error;
pub mod kv;
pub mod memory;

pub use cache::CacheStore;
pub use codec::{decode, encode, get_typed, set_typed};
pub use error::StoreError;
pub use kv::{KvStore, Writes};
pub use memory::MemStore;
