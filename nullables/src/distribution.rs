//! Nullable distribution: per-delegation outstanding rewards.

use crate::bank::NullBank;
use restake_ledger::event::{keys, kinds};
use restake_ledger::{Bank, Context, Distribution, Event, LedgerError, PoolId};
use restake_store::{get_typed, set_typed};
use restake_types::{AccountAddress, Coins, ValidatorAddress};

fn rewards_key(delegator: &AccountAddress, validator: &ValidatorAddress) -> Vec<u8> {
    format!("distribution/rewards/{delegator}/{validator}").into_bytes()
}

/// [`Distribution`] over the context store.
///
/// A (delegator, validator) pair has a reward record once rewards were
/// allocated to it. Withdrawing empties the record but keeps it, so a second
/// withdrawal succeeds with nothing; a pair that never had a record fails
/// with [`LedgerError::NoRewardsAvailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDistribution {
    bank: NullBank,
}

impl NullDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into the distribution pool and owe it to the pair.
    pub fn allocate_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        self.bank.mint(ctx, PoolId::DISTRIBUTION, amount)?;
        let key = rewards_key(delegator, validator);
        let owed = self
            .outstanding(ctx, delegator, validator)?
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        set_typed(ctx.store_mut(), &key, &owed)?;
        Ok(())
    }

    /// Rewards owed to the pair; `None` when the pair has no record.
    pub fn outstanding(
        &self,
        ctx: &Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Option<Coins>, LedgerError> {
        Ok(get_typed(ctx.store(), &rewards_key(delegator, validator))?)
    }
}

impl Distribution for NullDistribution {
    fn withdraw_rewards(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Coins, LedgerError> {
        let rewards = self.outstanding(ctx, delegator, validator)?.ok_or_else(|| {
            LedgerError::NoRewardsAvailable {
                delegator: delegator.to_string(),
                validator: validator.to_string(),
            }
        })?;
        self.bank
            .send_from_pool(ctx, PoolId::DISTRIBUTION, delegator, &rewards)?;
        set_typed(ctx.store_mut(), &rewards_key(delegator, validator), &Coins::new())?;
        ctx.emit(
            Event::new(kinds::WITHDRAW_REWARDS)
                .with_attribute(keys::DELEGATOR, delegator)
                .with_attribute(keys::VALIDATOR, validator)
                .with_attribute(keys::AMOUNT, &rewards),
        );
        Ok(rewards)
    }
}
