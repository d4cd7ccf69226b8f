#![no_main]

//! Arbitrary bytes as a stored snapshot: decoding must not panic, and a
//! decoded snapshot without `null` prices must survive encode then decode.

use libfuzzer_sys::fuzz_target;
use wishlist_core::sync::{decode_snapshot, encode_snapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(state) = decode_snapshot(raw) else {
        return;
    };

    assert_eq!(state.total_wishlist_items(), state.items().len());
    if state.items().iter().any(|item| item.price.is_nan()) {
        return;
    }

    let encoded = encode_snapshot(&state).expect("decoded snapshot must encode");
    let again = decode_snapshot(&encoded).expect("encoded snapshot must decode");
    assert_eq!(again, state);
});
