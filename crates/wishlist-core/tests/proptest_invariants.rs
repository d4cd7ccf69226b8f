use proptest::prelude::*;
use std::collections::HashSet;
use wishlist_core::reducer::reduce;
use wishlist_core::totals::{compute_collection_total, derive_state};
use wishlist_core::{Action, MemoryStore, Wishlist, WishlistOptions, WishlistState};

use generators::*;

fn assert_aggregates(state: &WishlistState) -> Result<(), TestCaseError> {
    let items = state.items();
    prop_assert_eq!(state.total_wishlist_items(), items.len());
    prop_assert_eq!(state.is_wishlist_empty(), items.is_empty());
    prop_assert_eq!(
        state.wishlist_total().to_bits(),
        compute_collection_total(items).to_bits()
    );
    for item in items {
        prop_assert_eq!(item.item_total, Some(item.price));
    }
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn reducer_keeps_aggregates_consistent(
        seed in arb_unique_items(),
        actions in prop::collection::vec(arb_action(), 0..24),
    ) {
        let mut state = derive_state(&WishlistState::initial(), seed);
        assert_aggregates(&state)?;
        for action in actions {
            state = reduce(&state, action);
            assert_aggregates(&state)?;
        }
    }

    #[test]
    fn reducer_never_touches_its_input(
        seed in arb_unique_items(),
        action in arb_action(),
    ) {
        let before = derive_state(&WishlistState::initial(), seed);
        let copy = before.clone();
        let _next = reduce(&before, action);
        prop_assert_eq!(before, copy);
    }

    #[test]
    fn caller_operations_keep_ids_unique(ops in prop::collection::vec(arb_op(), 0..32)) {
        let mut wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new().id("p"));
        for op in ops {
            apply(&mut wishlist, op);
            assert_aggregates(wishlist.state())?;

            let mut seen = HashSet::new();
            for item in wishlist.state().items() {
                prop_assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
            }
        }
    }

    #[test]
    fn rejected_add_leaves_state_untouched(seed in arb_unique_items(), price in arb_price()) {
        prop_assume!(!seed.is_empty());
        let taken = seed[0].id.clone();
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new().default_items(seed),
        );
        let before = wishlist.snapshot();

        let result = wishlist.add_item(wishlist_core::Item::new(taken, price));
        prop_assert!(result.is_err());
        prop_assert_eq!(wishlist.state(), before.as_ref());
    }

    #[test]
    fn derivation_is_idempotent(seed in arb_unique_items(), metadata in arb_metadata()) {
        let mut start = derive_state(&WishlistState::initial(), seed);
        start = reduce(&start, Action::SetWishlistMeta { payload: metadata });

        let again = derive_state(&start, start.items().to_vec());
        prop_assert_eq!(&again, &start);
    }

    #[test]
    fn metadata_actions_leave_items_alone(
        seed in arb_unique_items(),
        metadata in arb_metadata(),
    ) {
        let start = derive_state(&WishlistState::initial(), seed);
        for action in [
            Action::UpdateWishlistMeta { payload: metadata.clone() },
            Action::SetWishlistMeta { payload: metadata.clone() },
            Action::ClearWishlistMeta,
        ] {
            let next = reduce(&start, action);
            prop_assert_eq!(next.items(), start.items());
            prop_assert_eq!(next.wishlist_total().to_bits(), start.wishlist_total().to_bits());
        }
    }

    #[test]
    fn update_metadata_lets_incoming_keys_win(
        first in arb_metadata(),
        second in arb_metadata(),
    ) {
        let start = reduce(&WishlistState::initial(), Action::SetWishlistMeta { payload: first.clone() });
        let merged = reduce(&start, Action::UpdateWishlistMeta { payload: second.clone() });

        for (key, value) in &second {
            prop_assert_eq!(merged.metadata().get(key), Some(value));
        }
        for (key, value) in &first {
            if !second.contains_key(key) {
                prop_assert_eq!(merged.metadata().get(key), Some(value));
            }
        }
    }
}
