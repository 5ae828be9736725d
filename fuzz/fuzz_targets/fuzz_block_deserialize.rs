#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Scenario input is untrusted JSON; decoding must never panic.
    let _ = serde_json::from_slice::<restake_node::Block>(data);
    let _ = serde_json::from_slice::<restake_node::Tx>(data);
    let _ = serde_json::from_slice::<restake_node::Genesis>(data);
});
