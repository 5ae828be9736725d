//! Nullable staking: validators, delegations and the unbonding queue.

use crate::bank::NullBank;
use restake_ledger::event::{keys, kinds};
use restake_ledger::{
    Bank, BondStatus, Context, Delegation, Event, LedgerError, PoolId, Staking, UnbondingEntry,
    Validator,
};
use restake_store::{decode, get_typed, set_typed};
use restake_types::{AccountAddress, Coin, Coins, Dec, Denom, Timestamp, ValidatorAddress};

const UNBONDING_PREFIX: &str = "staking/unbonding/";

/// Three weeks.
pub const DEFAULT_UNBONDING_SECS: u64 = 21 * 24 * 60 * 60;

fn validator_key(operator: &ValidatorAddress) -> Vec<u8> {
    format!("staking/validators/{operator}").into_bytes()
}

fn delegation_key(delegator: &AccountAddress, validator: &ValidatorAddress) -> Vec<u8> {
    format!("staking/delegations/{delegator}/{validator}").into_bytes()
}

// Zero-padded so the queue scans in completion order.
fn unbonding_key(
    completion: Timestamp,
    delegator: &AccountAddress,
    validator: &ValidatorAddress,
) -> Vec<u8> {
    format!(
        "{UNBONDING_PREFIX}{:020}/{delegator}/{validator}",
        completion.as_secs()
    )
    .into_bytes()
}

fn pool_for(status: BondStatus) -> PoolId {
    match status {
        BondStatus::Bonded => PoolId::BONDED,
        BondStatus::Unbonding | BondStatus::Unbonded => PoolId::NOT_BONDED,
    }
}

/// [`Staking`] over the context store, moving tokens through a [`NullBank`].
#[derive(Clone, Debug)]
pub struct NullStaking {
    bond_denom: Denom,
    unbonding_secs: u64,
    bank: NullBank,
}

impl NullStaking {
    pub fn new(bond_denom: Denom) -> Self {
        Self::with_unbonding_time(bond_denom, DEFAULT_UNBONDING_SECS)
    }

    pub fn with_unbonding_time(bond_denom: Denom, unbonding_secs: u64) -> Self {
        Self {
            bond_denom,
            unbonding_secs,
            bank: NullBank::new(),
        }
    }

    pub fn unbonding_secs(&self) -> u64 {
        self.unbonding_secs
    }

    /// Insert or replace a validator record.
    pub fn set_validator(
        &self,
        ctx: &mut Context<'_>,
        validator: &Validator,
    ) -> Result<(), LedgerError> {
        set_typed(ctx.store_mut(), &validator_key(&validator.operator), validator)?;
        Ok(())
    }

    /// Tokens currently backing a delegation at the live exchange rate.
    pub fn delegated_tokens(
        &self,
        ctx: &Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<u128, LedgerError> {
        let Some(delegation) = self.delegation(ctx, delegator, validator)? else {
            return Ok(0);
        };
        self.validator(ctx, validator)?
            .tokens_from_shares(delegation.shares)
            .ok_or(LedgerError::Overflow)
    }

    /// All queued unbondings, earliest completion first.
    pub fn unbonding_queue(&self, ctx: &Context<'_>) -> Result<Vec<UnbondingEntry>, LedgerError> {
        ctx.store()
            .prefix_scan(UNBONDING_PREFIX.as_bytes())?
            .into_iter()
            .map(|(_, bytes)| decode_entry(&bytes))
            .collect()
    }

    fn bond_coins(&self, amount: u128) -> Coins {
        Coins::single(Coin::new(self.bond_denom.clone(), amount))
    }
}

fn decode_entry(bytes: &[u8]) -> Result<UnbondingEntry, LedgerError> {
    Ok(decode(bytes)?)
}

impl Staking for NullStaking {
    fn bond_denom(&self, _ctx: &Context<'_>) -> Result<Denom, LedgerError> {
        Ok(self.bond_denom.clone())
    }

    fn validator(
        &self,
        ctx: &Context<'_>,
        operator: &ValidatorAddress,
    ) -> Result<Validator, LedgerError> {
        get_typed(ctx.store(), &validator_key(operator))?
            .ok_or_else(|| LedgerError::ValidatorNotFound(operator.to_string()))
    }

    fn delegation(
        &self,
        ctx: &Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Option<Delegation>, LedgerError> {
        Ok(get_typed(ctx.store(), &delegation_key(delegator, validator))?)
    }

    fn delegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        amount: u128,
        token_source: BondStatus,
        validator: &Validator,
        subtract_from_account: bool,
    ) -> Result<Dec, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount("delegation amount must be positive".into()));
        }
        // The caller's copy may be stale; the stored record is authoritative.
        let mut validator = self.validator(ctx, &validator.operator)?;
        if validator.jailed {
            return Err(LedgerError::ValidatorJailed(validator.operator.to_string()));
        }

        let coins = self.bond_coins(amount);
        let target = pool_for(validator.status);
        if subtract_from_account {
            self.bank.send_to_pool(ctx, delegator, target, &coins)?;
        } else {
            self.bank
                .move_between_pools(ctx, pool_for(token_source), target, &coins)?;
        }

        let shares = validator
            .shares_from_tokens(amount)
            .ok_or(LedgerError::Overflow)?;
        validator.tokens = validator
            .tokens
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        validator.delegator_shares = validator
            .delegator_shares
            .checked_add(shares)
            .ok_or(LedgerError::Overflow)?;
        self.set_validator(ctx, &validator)?;

        let key = delegation_key(delegator, &validator.operator);
        let mut delegation = get_typed::<Delegation>(ctx.store(), &key)?.unwrap_or(Delegation {
            delegator: delegator.clone(),
            validator: validator.operator.clone(),
            shares: Dec::ZERO,
        });
        delegation.shares = delegation
            .shares
            .checked_add(shares)
            .ok_or(LedgerError::Overflow)?;
        set_typed(ctx.store_mut(), &key, &delegation)?;

        ctx.emit(
            Event::new(kinds::DELEGATE)
                .with_attribute(keys::DELEGATOR, delegator)
                .with_attribute(keys::VALIDATOR, &validator.operator)
                .with_attribute(keys::AMOUNT, &coins)
                .with_attribute(keys::SHARES, shares),
        );
        Ok(shares)
    }

    fn undelegate(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
        shares: Dec,
    ) -> Result<(Timestamp, u128), LedgerError> {
        if !shares.is_positive() {
            return Err(LedgerError::InvalidAmount("shares must be positive".into()));
        }
        let key = delegation_key(delegator, validator);
        let mut delegation = get_typed::<Delegation>(ctx.store(), &key)?.ok_or_else(|| {
            LedgerError::DelegationNotFound {
                delegator: delegator.to_string(),
                validator: validator.to_string(),
            }
        })?;
        if shares > delegation.shares {
            return Err(LedgerError::InsufficientShares {
                have: delegation.shares,
                need: shares,
            });
        }

        let mut record = self.validator(ctx, validator)?;
        let amount = record
            .tokens_from_shares(shares)
            .ok_or(LedgerError::Overflow)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(format!(
                "{shares} shares redeem for zero tokens"
            )));
        }
        record.tokens = record.tokens.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        record.delegator_shares = record
            .delegator_shares
            .checked_sub(shares)
            .ok_or(LedgerError::Overflow)?;
        self.set_validator(ctx, &record)?;

        delegation.shares = delegation
            .shares
            .checked_sub(shares)
            .ok_or(LedgerError::Overflow)?;
        if delegation.shares.is_zero() {
            ctx.store_mut().delete(&key)?;
        } else {
            set_typed(ctx.store_mut(), &key, &delegation)?;
        }

        let coins = self.bond_coins(amount);
        self.bank
            .move_between_pools(ctx, pool_for(record.status), PoolId::NOT_BONDED, &coins)?;

        let completion_time = ctx.time().plus_secs(self.unbonding_secs);
        let entry_key = unbonding_key(completion_time, delegator, validator);
        let mut entry = get_typed::<UnbondingEntry>(ctx.store(), &entry_key)?.unwrap_or(
            UnbondingEntry {
                delegator: delegator.clone(),
                validator: validator.clone(),
                completion_time,
                amount: 0,
            },
        );
        entry.amount = entry.amount.checked_add(amount).ok_or(LedgerError::Overflow)?;
        set_typed(ctx.store_mut(), &entry_key, &entry)?;

        ctx.emit(
            Event::new(kinds::UNBOND)
                .with_attribute(keys::DELEGATOR, delegator)
                .with_attribute(keys::VALIDATOR, validator)
                .with_attribute(keys::AMOUNT, &coins)
                .with_attribute(keys::COMPLETION_TIME, completion_time.as_secs()),
        );
        Ok((completion_time, amount))
    }

    fn complete_matured_unbondings(
        &self,
        ctx: &mut Context<'_>,
    ) -> Result<Vec<UnbondingEntry>, LedgerError> {
        let now = ctx.time();
        let mut released = Vec::new();
        let queue = ctx.store().prefix_scan(UNBONDING_PREFIX.as_bytes())?;
        for (key, bytes) in queue {
            let entry = decode_entry(&bytes)?;
            if entry.completion_time > now {
                break;
            }
            let coins = self.bond_coins(entry.amount);
            self.bank
                .send_from_pool(ctx, PoolId::NOT_BONDED, &entry.delegator, &coins)?;
            ctx.store_mut().delete(&key)?;
            ctx.emit(
                Event::new(kinds::COMPLETE_UNBONDING)
                    .with_attribute(keys::DELEGATOR, &entry.delegator)
                    .with_attribute(keys::VALIDATOR, &entry.validator)
                    .with_attribute(keys::AMOUNT, &coins),
            );
            released.push(entry);
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restake_store::MemStore;
    use restake_types::BlockHeader;

    fn ulbt() -> Denom {
        "ulbt".parse().unwrap()
    }

    fn alice() -> AccountAddress {
        AccountAddress::parse("rsk1alice0001").unwrap()
    }

    fn val() -> ValidatorAddress {
        ValidatorAddress::parse("rskvaloper1validator01").unwrap()
    }

    fn setup(ctx: &mut Context<'_>, staking: &NullStaking) -> Validator {
        let validator = Validator::new(val());
        staking.set_validator(ctx, &validator).unwrap();
        NullBank::new()
            .fund_account(ctx, &alice(), &"1000ulbt".parse().unwrap())
            .unwrap();
        validator
    }

    #[test]
    fn delegate_debits_account_when_asked() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(100)), &mut store);
        let staking = NullStaking::new(ulbt());
        let validator = setup(&mut ctx, &staking);

        let shares = staking
            .delegate(&mut ctx, &alice(), 400, BondStatus::Unbonded, &validator, true)
            .unwrap();
        assert_eq!(shares, Dec::from_int(400).unwrap());
        assert_eq!(NullBank::new().balance(&ctx, &alice(), &ulbt()).unwrap(), 600);
        assert_eq!(
            NullBank::new().pool_balance(&ctx, PoolId::BONDED).unwrap(),
            "400ulbt".parse::<Coins>().unwrap()
        );
        assert_eq!(staking.delegated_tokens(&ctx, &alice(), &val()).unwrap(), 400);
    }

    #[test]
    fn delegate_without_debit_requires_funded_pool() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(100)), &mut store);
        let staking = NullStaking::new(ulbt());
        let validator = setup(&mut ctx, &staking);

        NullBank::new()
            .send_to_pool(&mut ctx, &alice(), PoolId::BONDED, &"300ulbt".parse().unwrap())
            .unwrap();
        staking
            .delegate(&mut ctx, &alice(), 300, BondStatus::Bonded, &validator, false)
            .unwrap();
        assert_eq!(NullBank::new().balance(&ctx, &alice(), &ulbt()).unwrap(), 700);
        assert_eq!(staking.delegated_tokens(&ctx, &alice(), &val()).unwrap(), 300);
    }

    #[test]
    fn undelegation_matures_after_unbonding_time() {
        let mut store = MemStore::new();
        let staking = NullStaking::with_unbonding_time(ulbt(), 50);
        {
            let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(100)), &mut store);
            let validator = setup(&mut ctx, &staking);
            staking
                .delegate(&mut ctx, &alice(), 1000, BondStatus::Unbonded, &validator, true)
                .unwrap();
            let (done, amount) = staking
                .undelegate(&mut ctx, &alice(), &val(), Dec::from_int(250).unwrap())
                .unwrap();
            assert_eq!((done, amount), (Timestamp::new(150), 250));
            assert!(staking.complete_matured_unbondings(&mut ctx).unwrap().is_empty());
        }
        let mut ctx = Context::new(BlockHeader::new(2, Timestamp::new(150)), &mut store);
        let released = staking.complete_matured_unbondings(&mut ctx).unwrap();
        assert_eq!(released.len(), 1);
        assert_eq!(NullBank::new().balance(&ctx, &alice(), &ulbt()).unwrap(), 250);
        assert!(staking.unbonding_queue(&ctx).unwrap().is_empty());
    }

    #[test]
    fn undelegate_more_than_delegated_fails() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(100)), &mut store);
        let staking = NullStaking::new(ulbt());
        let validator = setup(&mut ctx, &staking);
        staking
            .delegate(&mut ctx, &alice(), 10, BondStatus::Unbonded, &validator, true)
            .unwrap();
        let err = staking
            .undelegate(&mut ctx, &alice(), &val(), Dec::from_int(11).unwrap())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientShares { .. }));
    }

    #[test]
    fn unknown_validator_is_reported() {
        let mut store = MemStore::new();
        let ctx = Context::new(BlockHeader::new(1, Timestamp::new(0)), &mut store);
        let err = NullStaking::new(ulbt()).validator(&ctx, &val()).unwrap_err();
        assert!(matches!(err, LedgerError::ValidatorNotFound(_)));
    }
}
