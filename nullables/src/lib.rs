//! Nullable ledger collaborators for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The restaking engine only talks to balances, staking and rewards through
//! the traits in `restake-ledger`. This crate provides small, complete
//! implementations of those traits that:
//! - keep all of their state in the context's [`KvStore`](restake_store::KvStore),
//!   so transaction branches roll them back like any other module
//! - emit the same event kinds and attributes a production runtime would
//! - can be seeded programmatically (validators, balances, rewards)
//!
//! Usage: wire them into a `RestakeKeeper` in tests, benches and the
//! simulation daemon.

pub mod bank;
pub mod distribution;
pub mod staking;

pub use bank::NullBank;
pub use distribution::NullDistribution;
pub use staking::{NullStaking, DEFAULT_UNBONDING_SECS};
