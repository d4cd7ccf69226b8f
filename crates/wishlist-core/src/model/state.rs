use serde::{Deserialize, Deserializer, Serialize};

use super::item::{Item, Metadata};

/// Full wishlist snapshot.
///
/// The three aggregate fields are only ever written by
/// [`crate::totals::derive_state_with`], so they cannot drift from `items`.
/// Snapshots are never mutated after construction; every transition builds
/// a new one.
///
/// The serialized shape is the durable snapshot format:
///
/// ```json
/// {"id":"q3k9...","items":[...],"isWishlistEmpty":true,
///  "totalWishlistItems":0,"wishlistTotal":0.0,"metadata":{}}
/// ```
///
/// The aggregates are re-derived whenever a snapshot is decoded, so reading
/// them is lenient: a `null` (what an overflowed total encodes to) falls back
/// to the field default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) items: Vec<Item>,
    #[serde(default = "default_empty", deserialize_with = "empty_or_null")]
    pub(crate) is_wishlist_empty: bool,
    #[serde(default, deserialize_with = "default_if_null")]
    pub(crate) total_wishlist_items: usize,
    #[serde(default, deserialize_with = "default_if_null")]
    pub(crate) wishlist_total: f64,
    #[serde(default)]
    pub(crate) metadata: Metadata,
}

const fn default_empty() -> bool {
    true
}

fn empty_or_null<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(de)?.unwrap_or_else(default_empty))
}

fn default_if_null<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

impl WishlistState {
    /// The module-level initial state: no identifier, no items, no metadata.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            is_wishlist_empty: true,
            total_wishlist_items: 0,
            wishlist_total: 0.0,
            metadata: Metadata::new(),
        }
    }

    /// Wishlist identifier. `None` after `EMPTY_WISHLIST`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn total_wishlist_items(&self) -> usize {
        self.total_wishlist_items
    }

    #[must_use]
    pub const fn wishlist_total(&self) -> f64 {
        self.wishlist_total
    }

    #[must_use]
    pub const fn is_wishlist_empty(&self) -> bool {
        self.is_wishlist_empty
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// First item with the given id.
    #[must_use]
    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether an item with the given id is listed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}

impl Default for WishlistState {
    fn default() -> Self {
        Self::initial()
    }
}
