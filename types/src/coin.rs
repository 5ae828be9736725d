//! Coin amounts: single-denomination [`Coin`] and multi-denomination [`Coins`].
//!
//! Amounts are raw integer units (u128) to avoid floating-point errors. A
//! [`Coins`] set is always sorted by denomination, holds each denomination at
//! most once and never stores a zero entry, so "empty" and "zero" coincide.
//!
//! The textual form is `100ulbt,5uatom`, the same format used for event
//! attributes.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An asset denomination, e.g. `ulbt`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Denom(String);

impl Denom {
    const MIN_LEN: usize = 3;
    const MAX_LEN: usize = 128;

    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&s.len());
        let mut bytes = s.bytes();
        let first_ok = bytes.next().is_some_and(|b| b.is_ascii_lowercase());
        let rest_ok = bytes.all(|b| {
            b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-')
        });
        if !(len_ok && first_ok && rest_ok) {
            return Err(TypesError::InvalidDenom(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Denom {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Denom {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Denom> for String {
    fn from(d: Denom) -> Self {
        d.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single-denomination amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: Denom,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: Denom, amount: u128) -> Self {
        Self { denom, amount }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl FromStr for Coin {
    type Err = TypesError;

    /// Parse `<amount><denom>`, e.g. `100ulbt`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TypesError::InvalidCoins(format!("{s:?} has no denomination")))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(TypesError::InvalidCoins(format!("{s:?} has no amount")));
        }
        let amount = amount
            .parse::<u128>()
            .map_err(|_| TypesError::InvalidCoins(format!("{s:?} amount out of range")))?;
        Ok(Self::new(Denom::parse(denom)?, amount))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A multi-denomination amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coins(BTreeMap<Denom, u128>);

impl Coins {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A set holding one coin (empty if the coin is zero).
    pub fn single(coin: Coin) -> Self {
        let mut coins = Self::new();
        if !coin.is_zero() {
            coins.0.insert(coin.denom, coin.amount);
        }
        coins
    }

    /// Build a set from coins, summing repeated denominations.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, TypesError> {
        let mut set = Self::new();
        for coin in coins {
            set.add_coin(coin)?;
        }
        Ok(set)
    }

    /// Add a coin in place.
    pub fn add_coin(&mut self, coin: Coin) -> Result<(), TypesError> {
        if coin.is_zero() {
            return Ok(());
        }
        let entry = self.0.entry(coin.denom).or_insert(0);
        *entry = entry.checked_add(coin.amount).ok_or(TypesError::Overflow)?;
        Ok(())
    }

    /// Amount held in `denom` (zero if absent).
    pub fn amount_of(&self, denom: &Denom) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().map(|(d, a)| Coin::new(d.clone(), *a))
    }

    pub fn denoms(&self) -> impl Iterator<Item = &Denom> {
        self.0.keys()
    }

    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        let mut sum = self.clone();
        for coin in other.iter() {
            sum.add_coin(coin).ok()?;
        }
        Some(sum)
    }

    /// Subtract `other`; `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut diff = self.clone();
        for (denom, amount) in &other.0 {
            let have = diff.amount_of(denom);
            let left = have.checked_sub(*amount)?;
            if left == 0 {
                diff.0.remove(denom);
            } else {
                diff.0.insert(denom.clone(), left);
            }
        }
        Some(diff)
    }

    /// Whether every denomination in `self` is covered by `other`.
    pub fn is_all_lte(&self, other: &Coins) -> bool {
        self.0.iter().all(|(d, a)| *a <= other.amount_of(d))
    }
}

impl FromStr for Coins {
    type Err = TypesError;

    /// Parse a comma-separated list; zero entries are dropped, repeated
    /// denominations are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();
        let s = s.trim();
        if s.is_empty() {
            return Ok(set);
        }
        for part in s.split(',') {
            let coin: Coin = part.parse()?;
            if set.0.contains_key(&coin.denom) {
                return Err(TypesError::InvalidCoins(format!(
                    "duplicate denomination {}",
                    coin.denom
                )));
            }
            set.add_coin(coin)?;
        }
        Ok(set)
    }
}

impl TryFrom<String> for Coins {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coins> for String {
    fn from(c: Coins) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::single(coin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denom(s: &str) -> Denom {
        Denom::parse(s).unwrap()
    }

    #[test]
    fn denom_validation() {
        assert!(Denom::parse("ulbt").is_ok());
        assert!(Denom::parse("ibc/27394fb0").is_ok());
        assert!(Denom::parse("ab").is_err());
        assert!(Denom::parse("1abc").is_err());
        assert!(Denom::parse("ULBT").is_err());
    }

    #[test]
    fn parse_and_display_are_sorted() {
        let coins: Coins = "5uatom,100ulbt".parse().unwrap();
        assert_eq!(coins.to_string(), "5uatom,100ulbt");
        let reordered: Coins = "100ulbt,5uatom".parse().unwrap();
        assert_eq!(coins, reordered);
    }

    #[test]
    fn parse_drops_zero_entries() {
        let coins: Coins = "0ulbt,7uatom".parse().unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins.amount_of(&denom("ulbt")), 0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("ulbt".parse::<Coins>().is_err());
        assert!("100".parse::<Coins>().is_err());
        assert!("100ulbt,3ulbt".parse::<Coins>().is_err());
        assert!("1x".parse::<Coins>().is_err());
        assert!("".parse::<Coins>().unwrap().is_empty());
    }

    #[test]
    fn checked_sub_underflow_returns_none() {
        let have: Coins = "10ulbt".parse().unwrap();
        let want: Coins = "11ulbt".parse().unwrap();
        assert!(have.checked_sub(&want).is_none());
        let left = want.checked_sub(&have).unwrap();
        assert_eq!(left.to_string(), "1ulbt");
    }

    #[test]
    fn checked_sub_removes_exhausted_denoms() {
        let have: Coins = "10ulbt,4uatom".parse().unwrap();
        let spend: Coins = "10ulbt".parse().unwrap();
        let left = have.checked_sub(&spend).unwrap();
        assert_eq!(left.to_string(), "4uatom");
    }

    #[test]
    fn add_coin_overflow_is_reported() {
        let mut coins = Coins::single(Coin::new(denom("ulbt"), u128::MAX));
        let err = coins.add_coin(Coin::new(denom("ulbt"), 1)).unwrap_err();
        assert_eq!(err, TypesError::Overflow);
    }
}
