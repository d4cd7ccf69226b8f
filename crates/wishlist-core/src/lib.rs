//! wishlist-core library.
//!
//! A wishlist is an ordered list of priced items plus a free-form metadata
//! bag. Item count, price total and emptiness are derived from the list on
//! every transition. The state lives in an immutable [`WishlistState`]
//! snapshot; [`reducer::reduce`] maps a snapshot and an [`Action`] to the next
//! snapshot, and [`Wishlist`] runs that reducer and mirrors each new snapshot
//! into a [`Storage`] slot.
//!
//! # Conventions
//!
//! - **Errors**: library APIs return [`WishlistError`]; config loading and
//!   binaries use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`). The
//!   library never installs a subscriber.

pub mod config;
pub mod engine;
pub mod error;
pub mod id;
pub mod model;
pub mod provider;
pub mod reducer;
pub mod store;
pub mod sync;
pub mod totals;

pub use engine::{Wishlist, WishlistOptions};
pub use error::{ErrorCode, InvalidItemReason, WishlistError};
pub use id::{DEFAULT_ID_LENGTH, create_wishlist_identifier};
pub use model::{Item, Metadata, WishlistState};
pub use provider::WishlistProvider;
pub use reducer::{Action, ActionKind};
pub use store::{FileStore, MemoryStore, SqliteStore, Storage, StoreError};
