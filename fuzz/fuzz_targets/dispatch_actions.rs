#![no_main]

//! Feed newline-separated JSON actions through the parser and reducer.
//!
//! Unknown or malformed actions must be rejected without panicking, and every
//! accepted action must leave the aggregates consistent with the item list.

use libfuzzer_sys::fuzz_target;
use wishlist_core::reducer::reduce;
use wishlist_core::totals::compute_collection_total;
use wishlist_core::{Action, WishlistState};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut state = WishlistState::initial();
    for line in text.lines().take(256) {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        let Ok(action) = Action::from_json(value) else {
            continue;
        };

        let before = state.clone();
        let next = reduce(&state, action);
        assert_eq!(state, before, "reducer mutated its input");

        assert_eq!(next.total_wishlist_items(), next.items().len());
        assert_eq!(next.is_wishlist_empty(), next.items().is_empty());
        let total = compute_collection_total(next.items());
        assert!(
            next.wishlist_total().to_bits() == total.to_bits()
                || (next.wishlist_total().is_nan() && total.is_nan())
        );
        state = next;
    }
});
