use proptest::prelude::*;

use restake_types::{Coin, Coins, Dec, Denom, Timestamp};

fn denom_strategy() -> impl Strategy<Value = Denom> {
    "[a-z][a-z0-9]{2,10}".prop_map(|s| Denom::parse(s).unwrap())
}

fn coins_strategy() -> impl Strategy<Value = Coins> {
    prop::collection::vec((denom_strategy(), 0u128..1_000_000_000_000), 0..6).prop_map(|v| {
        let mut coins = Coins::new();
        for (denom, amount) in v {
            coins.add_coin(Coin::new(denom, amount)).unwrap();
        }
        coins
    })
}

proptest! {
    /// Display then parse reproduces the same coin set.
    #[test]
    fn coins_text_roundtrip(coins in coins_strategy()) {
        let text = coins.to_string();
        let parsed: Coins = text.parse().unwrap();
        prop_assert_eq!(parsed, coins);
    }

    /// A coin set never reports a zero-amount denomination.
    #[test]
    fn coins_never_hold_zero_entries(coins in coins_strategy()) {
        for coin in coins.iter() {
            prop_assert!(coin.amount > 0);
        }
    }

    /// (a + b) - b == a.
    #[test]
    fn coins_add_then_sub(a in coins_strategy(), b in coins_strategy()) {
        let sum = a.checked_add(&b).unwrap();
        prop_assert!(a.is_all_lte(&sum));
        prop_assert!(b.is_all_lte(&sum));
        prop_assert_eq!(sum.checked_sub(&b).unwrap(), a);
    }

    /// Decimal text roundtrip for values up to 18 fractional digits.
    #[test]
    fn dec_text_roundtrip(raw in -(10i128.pow(30))..10i128.pow(30)) {
        let d = Dec::from_raw(raw);
        let parsed: Dec = d.to_string().parse().unwrap();
        prop_assert_eq!(parsed, d);
    }

    /// floor(a * r) never exceeds a for r in [0, 1].
    #[test]
    fn dec_mul_conserves(a in 0u128..u128::MAX / 4, r_raw in 0i128..=10i128.pow(18)) {
        let r = Dec::from_raw(r_raw);
        let portion = r.checked_mul_int_truncate(a).unwrap();
        prop_assert!(portion <= a);
    }

    /// Matches naive arithmetic where the naive product does not overflow.
    #[test]
    fn dec_mul_matches_naive(a in 0u128..10u128.pow(18), r_raw in 0i128..=10i128.pow(18)) {
        let r = Dec::from_raw(r_raw);
        let expected = a * (r_raw as u128) / 10u128.pow(18);
        prop_assert_eq!(r.checked_mul_int_truncate(a), Some(expected));
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired_correct(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start.saturating_add(offset));
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }

    /// Coins survive a bincode roundtrip through their string form.
    #[test]
    fn coins_bincode_roundtrip(coins in coins_strategy()) {
        let encoded = bincode::serialize(&coins).unwrap();
        let decoded: Coins = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, coins);
    }
}
