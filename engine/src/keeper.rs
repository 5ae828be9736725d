//! Shared handle to the restaking module's collaborators and policy.

use crate::config::RestakingConfig;
use crate::error::RestakeError;
use crate::params::PolicyStore;
use restake_ledger::{Bank, BondStatus, Context, Distribution, Staking};
use restake_types::{AccountAddress, Coin, Coins, Dec, ValidatorAddress};
use std::sync::Arc;

pub type SharedBank = Arc<dyn Bank + Send + Sync>;
pub type SharedStaking = Arc<dyn Staking + Send + Sync>;
pub type SharedDistribution = Arc<dyn Distribution + Send + Sync>;

/// The restaking keeper.
///
/// Holds no ledger state of its own. Balances, delegations and rewards are
/// reached only through the collaborator contracts, and the ratio through
/// the [`PolicyStore`], all against the store carried by the [`Context`].
#[derive(Clone)]
pub struct RestakeKeeper {
    bank: SharedBank,
    staking: SharedStaking,
    distribution: SharedDistribution,
    policy: PolicyStore,
    authority: String,
}

impl RestakeKeeper {
    pub fn new(
        config: &RestakingConfig,
        bank: SharedBank,
        staking: SharedStaking,
        distribution: SharedDistribution,
    ) -> Self {
        Self {
            bank,
            staking,
            distribution,
            policy: PolicyStore::new(config.default_auto_restake_ratio),
            authority: config.authority.clone(),
        }
    }

    pub fn bank(&self) -> &dyn Bank {
        self.bank.as_ref()
    }

    pub fn staking(&self) -> &dyn Staking {
        self.staking.as_ref()
    }

    pub fn distribution(&self) -> &dyn Distribution {
        self.distribution.as_ref()
    }

    pub fn policy(&self) -> PolicyStore {
        self.policy
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Write the default ratio at module initialization.
    pub fn initialize(&self, ctx: &mut Context<'_>) -> Result<(), RestakeError> {
        self.policy.initialize(ctx.store_mut())
    }

    pub fn auto_restake_ratio(&self, ctx: &Context<'_>) -> Dec {
        self.policy.ratio(ctx.store())
    }

    pub fn set_auto_restake_ratio(
        &self,
        ctx: &mut Context<'_>,
        ratio: Dec,
    ) -> Result<(), RestakeError> {
        self.policy.set_ratio(ctx.store_mut(), ratio)
    }

    /// Delegate the bond-denomination part of `portion` out of the
    /// delegator's account. Returns the coin delegated, or `None` when the
    /// portion holds no bond-denomination value.
    pub fn restake_portion(
        &self,
        ctx: &mut Context<'_>,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
        portion: &Coins,
    ) -> Result<Option<Coin>, RestakeError> {
        let bond_denom = self.staking.bond_denom(ctx)?;
        let amount = portion.amount_of(&bond_denom);
        if amount == 0 {
            return Ok(None);
        }
        let validator = self.staking.validator(ctx, validator)?;
        self.staking
            .delegate(ctx, delegator, amount, BondStatus::Unbonded, &validator, true)?;
        Ok(Some(Coin::new(bond_denom, amount)))
    }
}
