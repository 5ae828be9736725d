//! Account balance collaborator.

use crate::context::Context;
use crate::error::LedgerError;
use restake_types::{AccountAddress, Coins, Denom};
use std::fmt;

/// A module-owned escrow account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(&'static str);

impl PoolId {
    /// Tokens delegated to bonded validators.
    pub const BONDED: Self = Self("bonded_tokens_pool");
    /// Tokens that are unbonding or delegated to unbonded validators.
    pub const NOT_BONDED: Self = Self("not_bonded_tokens_pool");
    /// Accrued, not yet withdrawn staking rewards.
    pub const DISTRIBUTION: Self = Self("distribution");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Balance operations. Implementations must be atomic per call: a failed
/// transfer leaves both sides untouched.
pub trait Bank {
    fn balance(
        &self,
        ctx: &Context<'_>,
        account: &AccountAddress,
        denom: &Denom,
    ) -> Result<u128, LedgerError>;

    fn balances(&self, ctx: &Context<'_>, account: &AccountAddress) -> Result<Coins, LedgerError>;

    fn pool_balance(&self, ctx: &Context<'_>, pool: PoolId) -> Result<Coins, LedgerError>;

    /// Move coins from an account into a module pool.
    fn send_to_pool(
        &self,
        ctx: &mut Context<'_>,
        from: &AccountAddress,
        pool: PoolId,
        amount: &Coins,
    ) -> Result<(), LedgerError>;

    /// Move coins from a module pool to an account.
    fn send_from_pool(
        &self,
        ctx: &mut Context<'_>,
        pool: PoolId,
        to: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), LedgerError>;

    fn move_between_pools(
        &self,
        ctx: &mut Context<'_>,
        from: PoolId,
        to: PoolId,
        amount: &Coins,
    ) -> Result<(), LedgerError>;

    /// Create coins in a pool. Bootstrap and test use only.
    fn mint(&self, ctx: &mut Context<'_>, pool: PoolId, amount: &Coins) -> Result<(), LedgerError>;
}
