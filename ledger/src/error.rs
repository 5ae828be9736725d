//! Errors reported by ledger collaborators.

use restake_store::StoreError;
use restake_types::{Dec, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds in {holder}: need {needed}, have {available}")]
    InsufficientFunds {
        holder: String,
        needed: String,
        available: String,
    },

    #[error("validator {0} not found")]
    ValidatorNotFound(String),

    #[error("no delegation from {delegator} to {validator}")]
    DelegationNotFound { delegator: String, validator: String },

    #[error("insufficient delegation shares: have {have}, need {need}")]
    InsufficientShares { have: Dec, need: Dec },

    #[error("no distribution info for delegator {delegator} and validator {validator}")]
    NoRewardsAvailable { delegator: String, validator: String },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("validator {0} is jailed")]
    ValidatorJailed(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("type error: {0}")]
    Types(#[from] TypesError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
