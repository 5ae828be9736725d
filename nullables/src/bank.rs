//! Nullable bank: account and pool balances kept in the state store.

use restake_ledger::event::{keys, kinds};
use restake_ledger::{Bank, Context, Event, LedgerError, PoolId};
use restake_store::{get_typed, set_typed};
use restake_types::{AccountAddress, Coins, Denom};

fn account_key(account: &AccountAddress) -> Vec<u8> {
    format!("bank/accounts/{account}").into_bytes()
}

fn pool_key(pool: PoolId) -> Vec<u8> {
    format!("bank/pools/{pool}").into_bytes()
}

/// Stateless [`Bank`] over the context store.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBank;

impl NullBank {
    pub fn new() -> Self {
        Self
    }

    fn load(ctx: &Context<'_>, key: &[u8]) -> Result<Coins, LedgerError> {
        Ok(get_typed::<Coins>(ctx.store(), key)?.unwrap_or_default())
    }

    fn save(ctx: &mut Context<'_>, key: &[u8], coins: &Coins) -> Result<(), LedgerError> {
        if coins.is_empty() {
            ctx.store_mut().delete(key)?;
        } else {
            set_typed(ctx.store_mut(), key, coins)?;
        }
        Ok(())
    }

    fn debit(
        ctx: &mut Context<'_>,
        key: &[u8],
        holder: &str,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        let have = Self::load(ctx, key)?;
        let left = have
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                holder: holder.to_string(),
                needed: amount.to_string(),
                available: have.to_string(),
            })?;
        Self::save(ctx, key, &left)
    }

    fn credit(ctx: &mut Context<'_>, key: &[u8], amount: &Coins) -> Result<(), LedgerError> {
        let have = Self::load(ctx, key)?;
        let sum = have.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Self::save(ctx, key, &sum)
    }

    /// Credit an account directly. Seeding only; real value enters through
    /// [`Bank::mint`] into a pool.
    pub fn fund_account(
        &self,
        ctx: &mut Context<'_>,
        account: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        Self::credit(ctx, &account_key(account), amount)
    }

    fn transfer_event(sender: &str, recipient: &str, amount: &Coins) -> Event {
        Event::new(kinds::TRANSFER)
            .with_attribute(keys::SENDER, sender)
            .with_attribute(keys::RECIPIENT, recipient)
            .with_attribute(keys::AMOUNT, amount)
    }
}

impl Bank for NullBank {
    fn balance(
        &self,
        ctx: &Context<'_>,
        account: &AccountAddress,
        denom: &Denom,
    ) -> Result<u128, LedgerError> {
        Ok(self.balances(ctx, account)?.amount_of(denom))
    }

    fn balances(&self, ctx: &Context<'_>, account: &AccountAddress) -> Result<Coins, LedgerError> {
        Self::load(ctx, &account_key(account))
    }

    fn pool_balance(&self, ctx: &Context<'_>, pool: PoolId) -> Result<Coins, LedgerError> {
        Self::load(ctx, &pool_key(pool))
    }

    fn send_to_pool(
        &self,
        ctx: &mut Context<'_>,
        from: &AccountAddress,
        pool: PoolId,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        if amount.is_empty() {
            return Ok(());
        }
        Self::debit(ctx, &account_key(from), from.as_str(), amount)?;
        Self::credit(ctx, &pool_key(pool), amount)?;
        ctx.emit(Self::transfer_event(from.as_str(), pool.as_str(), amount));
        Ok(())
    }

    fn send_from_pool(
        &self,
        ctx: &mut Context<'_>,
        pool: PoolId,
        to: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        if amount.is_empty() {
            return Ok(());
        }
        Self::debit(ctx, &pool_key(pool), pool.as_str(), amount)?;
        Self::credit(ctx, &account_key(to), amount)?;
        ctx.emit(Self::transfer_event(pool.as_str(), to.as_str(), amount));
        Ok(())
    }

    fn move_between_pools(
        &self,
        ctx: &mut Context<'_>,
        from: PoolId,
        to: PoolId,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        if amount.is_empty() || from == to {
            return Ok(());
        }
        Self::debit(ctx, &pool_key(from), from.as_str(), amount)?;
        Self::credit(ctx, &pool_key(to), amount)?;
        ctx.emit(Self::transfer_event(from.as_str(), to.as_str(), amount));
        Ok(())
    }

    fn mint(&self, ctx: &mut Context<'_>, pool: PoolId, amount: &Coins) -> Result<(), LedgerError> {
        Self::credit(ctx, &pool_key(pool), amount)?;
        ctx.emit(
            Event::new(kinds::MINT)
                .with_attribute(keys::RECIPIENT, pool)
                .with_attribute(keys::AMOUNT, amount),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restake_store::MemStore;
    use restake_types::{BlockHeader, Timestamp};

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn alice() -> AccountAddress {
        AccountAddress::parse("rsk1alice0001").unwrap()
    }

    #[test]
    fn transfers_conserve_supply() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(0)), &mut store);
        let bank = NullBank::new();

        bank.mint(&mut ctx, PoolId::DISTRIBUTION, &coins("100ulbt")).unwrap();
        bank.send_from_pool(&mut ctx, PoolId::DISTRIBUTION, &alice(), &coins("60ulbt"))
            .unwrap();
        bank.send_to_pool(&mut ctx, &alice(), PoolId::BONDED, &coins("50ulbt"))
            .unwrap();

        assert_eq!(bank.balances(&ctx, &alice()).unwrap(), coins("10ulbt"));
        assert_eq!(bank.pool_balance(&ctx, PoolId::BONDED).unwrap(), coins("50ulbt"));
        assert_eq!(
            bank.pool_balance(&ctx, PoolId::DISTRIBUTION).unwrap(),
            coins("40ulbt")
        );
        assert_eq!(ctx.events().len(), 3);
    }

    #[test]
    fn overdraft_is_rejected_without_side_effects() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(BlockHeader::new(1, Timestamp::new(0)), &mut store);
        let bank = NullBank::new();
        bank.fund_account(&mut ctx, &alice(), &coins("5ulbt")).unwrap();

        let err = bank
            .send_to_pool(&mut ctx, &alice(), PoolId::BONDED, &coins("6ulbt"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(bank.balance(&ctx, &alice(), &"ulbt".parse().unwrap()).unwrap(), 5);
        assert!(bank.pool_balance(&ctx, PoolId::BONDED).unwrap().is_empty());
        assert!(ctx.events().is_empty());
    }
}
