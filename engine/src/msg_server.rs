//! Handlers for the user-facing restaking messages.
//!
//! Every handler validates its input before touching any collaborator and
//! runs inside a [`Context::branch`], so a failure at any step leaves the
//! ledger exactly as it was.

use crate::error::RestakeError;
use crate::events::{ClaimAndRestakeExecuted, RatioUpdated};
use crate::keeper::RestakeKeeper;
use crate::msgs::{
    MsgClaimAndRestake, MsgClaimAndRestakeResponse, MsgDelegate, MsgDelegateResponse,
    MsgUndelegate, MsgUndelegateResponse, MsgUpdateAutoRestakeRatio,
    MsgUpdateAutoRestakeRatioResponse,
};
use restake_ledger::{BondStatus, Context, LedgerError, PoolId};
use restake_types::{AccountAddress, Coin, Coins, ValidatorAddress};
use tracing::{debug, info};

pub struct MsgServer<'k> {
    keeper: &'k RestakeKeeper,
}

fn parse_pair(
    delegator: &str,
    validator: &str,
) -> Result<(AccountAddress, ValidatorAddress), RestakeError> {
    let delegator = AccountAddress::parse(delegator)
        .map_err(|e| RestakeError::InvalidAddress(format!("invalid delegator address: {e}")))?;
    let validator = ValidatorAddress::parse(validator)
        .map_err(|e| RestakeError::InvalidAddress(format!("invalid validator address: {e}")))?;
    Ok((delegator, validator))
}

fn positive(amount: u128) -> Result<u128, RestakeError> {
    if amount == 0 {
        return Err(RestakeError::InvalidAmount("amount must be positive".into()));
    }
    Ok(amount)
}

impl<'k> MsgServer<'k> {
    pub fn new(keeper: &'k RestakeKeeper) -> Self {
        Self { keeper }
    }

    /// Move `amount` of the bond denomination from the delegator into the
    /// bonded pool and delegate it.
    pub fn delegate(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgDelegate,
    ) -> Result<MsgDelegateResponse, RestakeError> {
        let (delegator, validator_addr) = parse_pair(&msg.delegator, &msg.validator)?;
        let amount = positive(msg.amount)?;
        let staking = self.keeper.staking();

        ctx.branch(|ctx| {
            let validator = staking.validator(ctx, &validator_addr)?;
            let bond_denom = staking.bond_denom(ctx)?;
            let coins = Coins::single(Coin::new(bond_denom, amount));
            self.keeper
                .bank()
                .send_to_pool(ctx, &delegator, PoolId::BONDED, &coins)?;
            // Funds are already in the pool; staking must not debit again.
            let shares =
                staking.delegate(ctx, &delegator, amount, BondStatus::Bonded, &validator, false)?;
            debug!(%delegator, validator = %validator_addr, amount, %shares, "delegated");
            Ok(MsgDelegateResponse {})
        })
    }

    /// Undelegate `amount` tokens, converted to shares at the validator's
    /// current exchange rate.
    pub fn undelegate(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgUndelegate,
    ) -> Result<MsgUndelegateResponse, RestakeError> {
        let (delegator, validator) = parse_pair(&msg.delegator, &msg.validator)?;
        let amount = positive(msg.amount)?;
        let staking = self.keeper.staking();

        ctx.branch(|ctx| {
            let shares = staking
                .shares_from_tokens(ctx, &validator, amount)
                .map_err(RestakeError::UndelegateFailed)?;
            let (completion_time, amount) = staking
                .undelegate(ctx, &delegator, &validator, shares)
                .map_err(RestakeError::UndelegateFailed)?;
            debug!(%delegator, %validator, %shares, amount, %completion_time, "undelegated");
            Ok(MsgUndelegateResponse {
                completion_time,
                amount,
            })
        })
    }

    /// Withdraw all pending rewards on `validator` and delegate their
    /// bond-denomination part back to it.
    pub fn claim_and_restake(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgClaimAndRestake,
    ) -> Result<MsgClaimAndRestakeResponse, RestakeError> {
        let (delegator, validator_addr) = parse_pair(&msg.delegator, &msg.validator)?;
        let staking = self.keeper.staking();

        ctx.branch(|ctx| {
            let validator = staking.validator(ctx, &validator_addr)?;

            let rewards = self
                .keeper
                .distribution()
                .withdraw_rewards(ctx, &delegator, &validator_addr)
                .map_err(|e| match e {
                    e @ LedgerError::NoRewardsAvailable { .. } => RestakeError::from(e),
                    other => RestakeError::RewardWithdrawFailed(other),
                })?;

            let bond_denom = staking.bond_denom(ctx)?;
            let amount = rewards.amount_of(&bond_denom);
            if amount == 0 {
                return Err(RestakeError::InsufficientFunds(format!(
                    "no {bond_denom} rewards available to restake"
                )));
            }

            let coin = Coin::new(bond_denom, amount);
            self.keeper.bank().send_to_pool(
                ctx,
                &delegator,
                PoolId::BONDED,
                &Coins::single(coin.clone()),
            )?;
            staking.delegate(ctx, &delegator, amount, BondStatus::Bonded, &validator, false)?;

            ctx.emit(
                ClaimAndRestakeExecuted {
                    delegator: delegator.clone(),
                    validator: validator_addr.clone(),
                    amount,
                }
                .into(),
            );
            info!(%delegator, validator = %validator_addr, amount = %coin, "claim and restake executed");
            Ok(MsgClaimAndRestakeResponse { amount: coin })
        })
    }

    pub fn update_auto_restake_ratio(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgUpdateAutoRestakeRatio,
    ) -> Result<MsgUpdateAutoRestakeRatioResponse, RestakeError> {
        if msg.authority != self.keeper.authority() {
            return Err(RestakeError::Unauthorized {
                expected: self.keeper.authority().to_string(),
                got: msg.authority.clone(),
            });
        }
        ctx.branch(|ctx| {
            self.keeper.set_auto_restake_ratio(ctx, msg.ratio)?;
            ctx.emit(
                RatioUpdated {
                    authority: msg.authority.clone(),
                    ratio: msg.ratio,
                }
                .into(),
            );
            info!(ratio = %msg.ratio, "auto restake ratio updated");
            Ok(MsgUpdateAutoRestakeRatioResponse {})
        })
    }
}
