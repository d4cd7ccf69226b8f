//! Aggregate calculator.
//!
//! Pure derivations from an item list: per-item totals, the collection
//! total, and the full state snapshot built from both. Every transition that
//! touches `items` goes through [`derive_state_with`], so there is exactly
//! one place where the aggregates are computed.

use crate::model::{Item, Metadata, WishlistState};

/// Set `item_total = price` on every item. Order and length are preserved.
///
/// Reserved keys in an item's `extra` map are dropped here, so a derived
/// snapshot always serializes without duplicate keys.
#[must_use]
pub fn compute_item_totals(items: Vec<Item>) -> Vec<Item> {
    items
        .into_iter()
        .map(|mut item| {
            item.strip_reserved_fields();
            item.item_total = Some(item.price);
            item
        })
        .collect()
}

/// Sum of `price` over all items; `0.0` for an empty slice.
#[must_use]
pub fn compute_collection_total(items: &[Item]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

/// Fields of the previous snapshot that a derivation should replace instead
/// of carrying forward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateOverrides {
    pub id: Option<String>,
    pub metadata: Option<Metadata>,
}

/// Build the next snapshot from `previous` and a new item list, keeping
/// `previous`'s id and metadata.
#[must_use]
pub fn derive_state(previous: &WishlistState, items: Vec<Item>) -> WishlistState {
    derive_state_with(previous, items, StateOverrides::default())
}

/// Build the next snapshot from `previous` and a new item list.
///
/// `overrides.id` / `overrides.metadata` replace the previous values when
/// set; otherwise they are carried over.
#[must_use]
pub fn derive_state_with(
    previous: &WishlistState,
    items: Vec<Item>,
    overrides: StateOverrides,
) -> WishlistState {
    let items = compute_item_totals(items);
    let total_wishlist_items = items.len();
    let wishlist_total = compute_collection_total(&items);

    WishlistState {
        id: overrides.id.or_else(|| previous.id.clone()),
        is_wishlist_empty: total_wishlist_items == 0,
        total_wishlist_items,
        wishlist_total,
        items,
        metadata: overrides
            .metadata
            .unwrap_or_else(|| previous.metadata.clone()),
    }
}
