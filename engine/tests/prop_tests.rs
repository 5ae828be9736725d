use proptest::prelude::*;

use restake_engine::compute_portion;
use restake_types::{Coin, Coins, Dec, Denom};

const SCALE: u128 = 1_000_000_000_000_000_000;

fn ratio() -> impl Strategy<Value = Dec> {
    (0..=SCALE).prop_map(|raw| Dec::from_raw(raw as i128))
}

fn rewards() -> impl Strategy<Value = Coins> {
    prop::collection::btree_map("[a-z]{3,8}", any::<u64>(), 0..5).prop_map(|entries| {
        Coins::from_coins(
            entries
                .into_iter()
                .map(|(d, a)| Coin::new(Denom::parse(d).unwrap(), a as u128)),
        )
        .unwrap()
    })
}

proptest! {
    /// Single-denomination portion equals floor(amount * ratio), empty at zero.
    #[test]
    fn portion_is_floor_of_amount_times_ratio(amount in any::<u64>(), r in ratio()) {
        let denom = Denom::parse("ulbt").unwrap();
        let rewards = Coins::single(Coin::new(denom.clone(), amount as u128));
        let portion = compute_portion(&rewards, r);

        let expected = amount as u128 * r.raw() as u128 / SCALE;
        if expected == 0 {
            prop_assert!(portion.is_empty());
        } else {
            prop_assert_eq!(portion.amount_of(&denom), expected);
            prop_assert_eq!(portion.len(), 1);
        }
    }

    /// Restaking never creates value in any denomination.
    #[test]
    fn portion_never_exceeds_rewards(rewards in rewards(), r in ratio()) {
        let portion = compute_portion(&rewards, r);
        prop_assert!(portion.is_all_lte(&rewards));
        for coin in portion.iter() {
            prop_assert!(coin.amount > 0);
        }
    }

    /// Every replica computes the same portion.
    #[test]
    fn portion_is_deterministic(rewards in rewards(), r in ratio()) {
        prop_assert_eq!(compute_portion(&rewards, r), compute_portion(&rewards, r));
    }

    #[test]
    fn zero_ratio_restakes_nothing(rewards in rewards()) {
        prop_assert!(compute_portion(&rewards, Dec::ZERO).is_empty());
    }
}
