#![no_main]

use libfuzzer_sys::fuzz_target;
use restake_types::Dec;

fuzz_target!(|data: &str| {
    if let Ok(dec) = data.parse::<Dec>() {
        let again: Dec = dec.to_string().parse().expect("formatted decimal must parse");
        assert_eq!(again, dec);
    }
});
