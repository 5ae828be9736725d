#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use restake_engine::RewardWithdrawal;
use restake_ledger::event::{keys, kinds};
use restake_ledger::Event;

#[derive(Arbitrary, Debug)]
struct Input {
    delegator: Option<String>,
    validator: Option<String>,
    amount: Option<String>,
    extra: Vec<(String, String)>,
}

// Arbitrary attribute soup must decode to a withdrawal or be rejected, never
// panic.
fuzz_target!(|input: Input| {
    let mut event = Event::new(kinds::WITHDRAW_REWARDS);
    for (key, value) in &input.extra {
        event = event.with_attribute(key.as_str(), value);
    }
    if let Some(d) = &input.delegator {
        event = event.with_attribute(keys::DELEGATOR, d);
    }
    if let Some(v) = &input.validator {
        event = event.with_attribute(keys::VALIDATOR, v);
    }
    if let Some(a) = &input.amount {
        event = event.with_attribute(keys::AMOUNT, a);
    }
    if let Some(withdrawal) = RewardWithdrawal::from_event(&event) {
        assert!(!withdrawal.rewards.is_empty());
    }
});
