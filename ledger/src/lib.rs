//! Ledger runtime contracts consumed by the restaking engine.
//!
//! The ledger runtime sequences blocks and transactions; account balances,
//! validator and delegation records, and reward accounting are owned by
//! independent modules. This crate specifies only the interfaces those
//! modules expose:
//!
//! - [`Context`]: block header, the state store and the ordered event log a
//!   message executes against, with [`Context::branch`] as the all-or-nothing
//!   boundary.
//! - [`Bank`], [`Staking`], [`Distribution`]: the collaborator operations.
//! - [`Event`]: string-attributed events, the message bus between modules.

pub mod bank;
pub mod context;
pub mod distribution;
pub mod error;
pub mod event;
pub mod staking;

pub use bank::{Bank, PoolId};
pub use context::Context;
pub use distribution::Distribution;
pub use error::LedgerError;
pub use event::{Attribute, Event};
pub use staking::{BondStatus, Delegation, Staking, UnbondingEntry, Validator};
