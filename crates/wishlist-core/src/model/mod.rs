//! Wishlist data model: items, the metadata bag, and the state snapshot.

pub mod item;
pub mod state;

pub use item::{Item, Metadata, RESERVED_ITEM_FIELDS, is_reserved_field, item_id_of};
pub use state::WishlistState;
