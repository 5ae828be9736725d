//! Restaking engine errors.

use restake_ledger::LedgerError;
use restake_store::StoreError;
use restake_types::{Dec, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestakeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("validator {0} not found")]
    ValidatorNotFound(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("no rewards available for delegator {delegator} on validator {validator}")]
    NoRewardsAvailable { delegator: String, validator: String },

    #[error("auto restake ratio must be between 0 and 1, got {0}")]
    InvalidRatio(Dec),

    #[error("unauthorized: expected authority {expected}, got {got}")]
    Unauthorized { expected: String, got: String },

    #[error("undelegate failed: {0}")]
    UndelegateFailed(#[source] LedgerError),

    #[error("failed to withdraw rewards: {0}")]
    RewardWithdrawFailed(#[source] LedgerError),

    #[error("collaborator failure: {0}")]
    Collaborator(#[source] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Collaborator errors that have a direct counterpart in the engine's
/// taxonomy are surfaced as that variant; everything else is wrapped
/// verbatim.
impl From<LedgerError> for RestakeError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ValidatorNotFound(v) => RestakeError::ValidatorNotFound(v),
            e @ LedgerError::InsufficientFunds { .. } => RestakeError::InsufficientFunds(e.to_string()),
            LedgerError::NoRewardsAvailable {
                delegator,
                validator,
            } => RestakeError::NoRewardsAvailable {
                delegator,
                validator,
            },
            LedgerError::Store(s) => RestakeError::Store(s),
            other => RestakeError::Collaborator(other),
        }
    }
}

impl From<TypesError> for RestakeError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidAddress(a) => RestakeError::InvalidAddress(a),
            TypesError::Overflow => RestakeError::InvalidAmount("amount overflows".into()),
            other => RestakeError::InvalidAmount(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_onto_taxonomy() {
        let e: RestakeError = LedgerError::ValidatorNotFound("rskvaloper1missing0".into()).into();
        assert!(matches!(e, RestakeError::ValidatorNotFound(_)));

        let e: RestakeError = LedgerError::InsufficientFunds {
            holder: "rsk1delegator".into(),
            needed: "10ulbt".into(),
            available: "".into(),
        }
        .into();
        assert!(matches!(e, RestakeError::InsufficientFunds(ref m) if m.contains("10ulbt")));

        let e: RestakeError = LedgerError::ValidatorJailed("v".into()).into();
        assert!(matches!(e, RestakeError::Collaborator(LedgerError::ValidatorJailed(_))));
    }

    #[test]
    fn invalid_ratio_message_names_value() {
        let e = RestakeError::InvalidRatio("1.01".parse().unwrap());
        assert_eq!(e.to_string(), "auto restake ratio must be between 0 and 1, got 1.01");
    }
}
