//! Restake portion computation.

use restake_types::{Coin, Coins, Dec};

/// The part of `rewards` to reinvest at `ratio`.
///
/// Each denomination contributes `floor(amount * ratio)`. Denominations that
/// truncate to zero are dropped, so the result is empty when `rewards` is
/// empty, when `ratio` is zero, or when every entry is too small to yield a
/// whole unit. The result never exceeds `rewards` in any denomination for a
/// ratio in `[0, 1]`.
pub fn compute_portion(rewards: &Coins, ratio: Dec) -> Coins {
    if rewards.is_empty() || !ratio.is_positive() {
        return Coins::new();
    }
    let portions = rewards.iter().filter_map(|coin| {
        ratio
            .checked_mul_int_truncate(coin.amount)
            .filter(|amount| *amount > 0)
            .map(|amount| Coin::new(coin.denom, amount))
    });
    // Denominations are already distinct, so summation cannot overflow.
    Coins::from_coins(portions).unwrap_or_default()
}
