//! Fundamental types for the restake ledger.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: account and validator addresses, denominations, single and
//! multi-denomination coin amounts, the fixed-point decimal used for ratios
//! and delegation shares, and block headers.

pub mod address;
pub mod block;
pub mod coin;
pub mod dec;
pub mod error;
pub mod time;

pub use address::{AccountAddress, ValidatorAddress};
pub use block::BlockHeader;
pub use coin::{Coin, Coins, Denom};
pub use dec::Dec;
pub use error::TypesError;
pub use time::Timestamp;
