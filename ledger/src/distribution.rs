//! Reward accounting collaborator.

use crate::context::Context;
use crate::error::LedgerError;
use restake_types::{AccountAddress, Coins, ValidatorAddress};

pub trait Distribution {
    /// Pay out every pending reward of `delegator` on `validator` to the
    /// delegator's account and emit a `withdraw_rewards` event carrying the
    /// `delegator`, `validator` and `amount` attributes.
    ///
    /// Fails with [`LedgerError::NoRewardsAvailable`] when no distribution
    /// record exists for the pair.
    fn withdraw_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Coins, LedgerError>;
}
