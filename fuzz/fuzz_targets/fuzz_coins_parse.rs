#![no_main]

use libfuzzer_sys::fuzz_target;
use restake_types::Coins;

fuzz_target!(|data: &str| {
    // Parsing never panics, and anything accepted formats back to a string
    // that parses to the same value.
    if let Ok(coins) = data.parse::<Coins>() {
        let text = coins.to_string();
        let again: Coins = text.parse().expect("formatted coins must parse");
        assert_eq!(again, coins);
        assert!(coins.iter().all(|c| !c.is_zero()));
    }
});
