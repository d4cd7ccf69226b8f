//! Owning slot for a wishlist handle.
//!
//! Code that is handed a provider reaches the wishlist through
//! [`WishlistProvider::wishlist`] / [`WishlistProvider::wishlist_mut`], which
//! fail with [`WishlistError::MissingContext`] while nothing is mounted.

use crate::engine::{Wishlist, WishlistOptions};
use crate::error::WishlistError;
use crate::store::Storage;

#[derive(Debug)]
pub struct WishlistProvider<S: Storage> {
    mounted: Option<Wishlist<S>>,
}

impl<S: Storage> WishlistProvider<S> {
    /// An empty provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { mounted: None }
    }

    /// Open a wishlist and mount it, tearing down any previous one.
    pub fn mount(&mut self, storage: S, options: WishlistOptions) -> &mut Wishlist<S> {
        self.mounted.insert(Wishlist::open(storage, options))
    }

    /// Tear down the mounted wishlist and hand it back, if any.
    pub fn unmount(&mut self) -> Option<Wishlist<S>> {
        self.mounted.take()
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// # Errors
    ///
    /// [`WishlistError::MissingContext`] when nothing is mounted.
    pub fn wishlist(&self) -> Result<&Wishlist<S>, WishlistError> {
        self.mounted.as_ref().ok_or(WishlistError::MissingContext)
    }

    /// # Errors
    ///
    /// [`WishlistError::MissingContext`] when nothing is mounted.
    pub fn wishlist_mut(&mut self) -> Result<&mut Wishlist<S>, WishlistError> {
        self.mounted.as_mut().ok_or(WishlistError::MissingContext)
    }
}

impl<S: Storage> Default for WishlistProvider<S> {
    fn default() -> Self {
        Self::new()
    }
}
