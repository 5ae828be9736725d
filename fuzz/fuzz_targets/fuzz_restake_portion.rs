#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use restake_engine::compute_portion;
use restake_types::{Coin, Coins, Dec, Denom};

#[derive(Arbitrary, Debug)]
struct Input {
    amounts: Vec<(u8, u128)>,
    ratio_raw: u64,
}

fuzz_target!(|input: Input| {
    // Ratios in [0, 1].
    let ratio = Dec::from_raw(i128::from(input.ratio_raw) % (Dec::ONE.raw() + 1));
    let mut rewards = Coins::new();
    for (idx, amount) in input.amounts {
        let Ok(denom) = Denom::parse(format!("den{idx}")) else {
            return;
        };
        if rewards.add_coin(Coin::new(denom, amount)).is_err() {
            return;
        }
    }

    let portion = compute_portion(&rewards, ratio);
    assert!(portion.is_all_lte(&rewards));
    assert!(portion.iter().all(|c| !c.is_zero()));
});
