//! Validator registry and bonding collaborator.

use crate::context::Context;
use crate::error::LedgerError;
use restake_types::dec::mul_div_floor;
use restake_types::{AccountAddress, Dec, Denom, Timestamp, ValidatorAddress};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// A validator as seen by delegators: its bonded tokens and the shares
/// issued against them. The ratio between the two is the exchange rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator: ValidatorAddress,
    pub status: BondStatus,
    pub tokens: u128,
    pub delegator_shares: Dec,
    pub jailed: bool,
}

impl Validator {
    pub fn new(operator: ValidatorAddress) -> Self {
        Self {
            operator,
            status: BondStatus::Bonded,
            tokens: 0,
            delegator_shares: Dec::ZERO,
            jailed: false,
        }
    }

    /// Shares issued for `amount` tokens at the current exchange rate.
    ///
    /// A validator with no tokens issues shares 1:1.
    pub fn shares_from_tokens(&self, amount: u128) -> Option<Dec> {
        if self.tokens == 0 || !self.delegator_shares.is_positive() {
            return Dec::from_int(amount);
        }
        let raw = mul_div_floor(self.delegator_shares.raw() as u128, amount, self.tokens)?;
        i128::try_from(raw).ok().map(Dec::from_raw)
    }

    /// Tokens redeemable for `shares`, truncated.
    pub fn tokens_from_shares(&self, shares: Dec) -> Option<u128> {
        if shares.is_negative() || !self.delegator_shares.is_positive() {
            return None;
        }
        mul_div_floor(
            shares.raw() as u128,
            self.tokens,
            self.delegator_shares.raw() as u128,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: AccountAddress,
    pub validator: ValidatorAddress,
    pub shares: Dec,
}

/// Tokens on their way back to a delegator after an undelegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingEntry {
    pub delegator: AccountAddress,
    pub validator: ValidatorAddress,
    pub completion_time: Timestamp,
    pub amount: u128,
}

pub trait Staking {
    /// The single denomination eligible for staking.
    fn bond_denom(&self, ctx: &Context<'_>) -> Result<Denom, LedgerError>;

    /// Fails with [`LedgerError::ValidatorNotFound`] when absent.
    fn validator(
        &self,
        ctx: &Context<'_>,
        operator: &ValidatorAddress,
    ) -> Result<Validator, LedgerError>;

    fn delegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Option<Delegation>, LedgerError>;

    /// Create or increase a delegation by `amount` bond-denomination tokens
    /// and return the shares issued.
    ///
    /// With `subtract_from_account` set, the tokens are debited from the
    /// delegator's account. When cleared the caller has already moved them
    /// into the bonded pool and the account must not be debited again.
    fn delegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        amount: u128,
        token_source: BondStatus,
        validator: &Validator,
        subtract_from_account: bool,
    ) -> Result<Dec, LedgerError>;

    /// Burn `shares` of a delegation and enqueue the redeemed tokens for
    /// release to the delegator. Returns the completion time and the token
    /// amount.
    fn undelegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
        shares: Dec,
    ) -> Result<(Timestamp, u128), LedgerError>;

    /// Shares corresponding to `amount` tokens at the validator's live
    /// exchange rate.
    fn shares_from_tokens(
        &self,
        ctx: &Context<'_>,
        validator: &ValidatorAddress,
        amount: u128,
    ) -> Result<Dec, LedgerError> {
        self.validator(ctx, validator)?
            .shares_from_tokens(amount)
            .ok_or(LedgerError::Overflow)
    }

    /// Release every unbonding entry whose completion time has passed.
    fn complete_matured_unbondings(
        &self,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<UnbondingEntry>, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(tokens: u128, shares: &str) -> Validator {
        Validator {
            tokens,
            delegator_shares: shares.parse().unwrap(),
            ..Validator::new(ValidatorAddress::parse("rskvaloper1validator01").unwrap())
        }
    }

    #[test]
    fn empty_validator_issues_shares_one_to_one() {
        let v = validator(0, "0");
        assert_eq!(v.shares_from_tokens(500), Dec::from_int(500));
    }

    #[test]
    fn slashed_validator_issues_more_shares_per_token() {
        // 800 tokens backing 1000 shares: 1 token buys 1.25 shares.
        let v = validator(800, "1000");
        assert_eq!(v.shares_from_tokens(100).unwrap().to_string(), "125");
        assert_eq!(v.tokens_from_shares("125".parse().unwrap()), Some(100));
    }

    #[test]
    fn tokens_from_shares_truncates() {
        let v = validator(1000, "3");
        assert_eq!(v.tokens_from_shares("1".parse().unwrap()), Some(333));
    }
}
