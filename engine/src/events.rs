//! Domain events emitted by the restaking engine.

use restake_ledger::Event;
use restake_types::{AccountAddress, Coin, Dec, ValidatorAddress};
use serde::{Deserialize, Serialize};

pub mod kinds {
    pub const CLAIM_AND_RESTAKE: &str = "claim_and_restake";
    pub const AUTO_RESTAKE_RATIO_UPDATED: &str = "auto_restake_ratio_updated";
}

pub mod keys {
    pub use restake_ledger::event::keys::{AMOUNT, DELEGATOR, VALIDATOR};
    pub const AUTHORITY: &str = "authority";
    pub const RATIO: &str = "ratio";
}

/// A successful claim-and-restake. Part of the block's event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAndRestakeExecuted {
    pub delegator: AccountAddress,
    pub validator: ValidatorAddress,
    pub amount: u128,
}

impl From<ClaimAndRestakeExecuted> for Event {
    fn from(e: ClaimAndRestakeExecuted) -> Self {
        Event::new(kinds::CLAIM_AND_RESTAKE)
            .with_attribute(keys::DELEGATOR, e.delegator)
            .with_attribute(keys::VALIDATOR, e.validator)
            .with_attribute(keys::AMOUNT, e.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioUpdated {
    pub authority: String,
    pub ratio: Dec,
}

impl From<RatioUpdated> for Event {
    fn from(e: RatioUpdated) -> Self {
        Event::new(kinds::AUTO_RESTAKE_RATIO_UPDATED)
            .with_attribute(keys::AUTHORITY, e.authority)
            .with_attribute(keys::RATIO, e.ratio)
    }
}

/// Observability record of one auto-restake performed by the harvester.
///
/// Advisory only: it never enters consensus state or the block event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoRestakeExecuted {
    pub delegator: AccountAddress,
    pub validator: ValidatorAddress,
    pub amount: Coin,
    pub height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_event_carries_plain_amount() {
        let event: Event = ClaimAndRestakeExecuted {
            delegator: AccountAddress::parse("rsk1delegator01").unwrap(),
            validator: ValidatorAddress::parse("rskvaloper1validator01").unwrap(),
            amount: 100_000,
        }
        .into();
        assert!(event.is(kinds::CLAIM_AND_RESTAKE));
        assert_eq!(event.attribute(keys::AMOUNT), Some("100000"));
        assert_eq!(event.attribute(keys::DELEGATOR), Some("rsk1delegator01"));
    }
}
