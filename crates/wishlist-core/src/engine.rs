//! The wishlist handle: current snapshot, caller-facing operations, and the
//! persistence hook run after every transition.
//!
//! ```no_run
//! use wishlist_core::{Item, MemoryStore, Wishlist, WishlistOptions};
//!
//! let mut wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new().id("gifts"));
//! wishlist.add_item(Item::new("kettle", 39.0))?;
//! assert_eq!(wishlist.state().total_wishlist_items(), 1);
//! # Ok::<(), wishlist_core::WishlistError>(())
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{InvalidItemReason, WishlistError};
use crate::id::{DEFAULT_ID_LENGTH, create_wishlist_identifier};
use crate::model::{Item, Metadata, WishlistState, item_id_of};
use crate::reducer::{Action, reduce};
use crate::store::{DEFAULT_KEY_PREFIX, Storage, storage_key};
use crate::sync::{SnapshotOrigin, SnapshotSync};
use crate::totals::{StateOverrides, derive_state_with};

type SetItemsHook = Box<dyn FnMut(&[Item])>;
type ItemAddHook = Box<dyn FnMut(&Item)>;
type ItemRemoveHook = Box<dyn FnMut(&str)>;

/// Construction-time configuration. Everything is optional.
pub struct WishlistOptions {
    id: Option<String>,
    default_items: Vec<Item>,
    metadata: Option<Metadata>,
    key_prefix: String,
    id_length: usize,
    on_set_items: Option<SetItemsHook>,
    on_item_add: Option<ItemAddHook>,
    on_item_remove: Option<ItemRemoveHook>,
}

impl WishlistOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            default_items: Vec::new(),
            metadata: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            id_length: DEFAULT_ID_LENGTH,
            on_set_items: None,
            on_item_add: None,
            on_item_remove: None,
        }
    }

    /// Explicit wishlist id. Also namespaces the storage slot.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Items used when the storage slot is empty.
    #[must_use]
    pub fn default_items(mut self, items: Vec<Item>) -> Self {
        self.default_items = items;
        self
    }

    /// Metadata used when the storage slot is empty.
    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Prefix for storage slot keys.
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Length of generated ids when no explicit id is given.
    #[must_use]
    pub const fn id_length(mut self, len: usize) -> Self {
        self.id_length = len;
        self
    }

    #[must_use]
    pub fn on_set_items(mut self, hook: impl FnMut(&[Item]) + 'static) -> Self {
        self.on_set_items = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_item_add(mut self, hook: impl FnMut(&Item) + 'static) -> Self {
        self.on_item_add = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_item_remove(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.on_item_remove = Some(Box::new(hook));
        self
    }
}

impl Default for WishlistOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WishlistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WishlistOptions")
            .field("id", &self.id)
            .field("default_items", &self.default_items)
            .field("metadata", &self.metadata)
            .field("key_prefix", &self.key_prefix)
            .field("id_length", &self.id_length)
            .field("on_set_items", &self.on_set_items.is_some())
            .field("on_item_add", &self.on_item_add.is_some())
            .field("on_item_remove", &self.on_item_remove.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Hooks {
    on_set_items: Option<SetItemsHook>,
    on_item_add: Option<ItemAddHook>,
    on_item_remove: Option<ItemRemoveHook>,
}

/// One open wishlist bound to a storage slot.
///
/// Dispatch is synchronous: when a method returns, [`Wishlist::state`]
/// already reflects the change. The slot write happens right after and its
/// failure never undoes the in-memory transition.
pub struct Wishlist<S: Storage> {
    state: Arc<WishlistState>,
    sync: SnapshotSync<S>,
    origin: SnapshotOrigin,
    hooks: Hooks,
}

impl<S: Storage> Wishlist<S> {
    /// Open the wishlist stored in `storage`, seeding the slot from
    /// `options` when it is empty.
    pub fn open(storage: S, options: WishlistOptions) -> Self {
        let WishlistOptions {
            id: explicit_id,
            default_items,
            metadata,
            key_prefix,
            id_length,
            on_set_items,
            on_item_add,
            on_item_remove,
        } = options;

        let key = storage_key(&key_prefix, explicit_id.as_deref());
        let id = explicit_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| create_wishlist_identifier(id_length));

        let seed = derive_state_with(
            &WishlistState::initial(),
            default_items,
            StateOverrides {
                id: Some(id),
                metadata: Some(metadata.unwrap_or_default()),
            },
        );

        let mut sync = SnapshotSync::new(storage, key);
        let (state, origin) = sync.load_or_seed(seed);

        tracing::info!(
            key = sync.key(),
            ?origin,
            items = state.total_wishlist_items(),
            "wishlist opened"
        );

        Self {
            state: Arc::new(state),
            sync,
            origin,
            hooks: Hooks {
                on_set_items,
                on_item_add,
                on_item_remove,
            },
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> &WishlistState {
        &self.state
    }

    /// Shared handle to the current snapshot. It stays valid, and unchanged,
    /// after later transitions.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WishlistState> {
        Arc::clone(&self.state)
    }

    /// How the starting state was obtained.
    #[must_use]
    pub const fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    /// Storage slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.sync.key()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        self.sync.storage()
    }

    /// Whether the slot may be behind the in-memory state.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.sync.is_dirty()
    }

    /// Run `action` through the reducer, commit the result, then write the
    /// snapshot to storage.
    pub fn dispatch(&mut self, action: Action) -> Arc<WishlistState> {
        let kind = action.kind();
        let next = reduce(&self.state, action);
        self.state = Arc::new(next);

        if kind.touches_items() {
            tracing::debug!(
                action = %kind,
                items = self.state.total_wishlist_items(),
                total = self.state.wishlist_total(),
                "dispatched"
            );
        } else {
            tracing::debug!(action = %kind, "dispatched");
        }

        self.sync.commit(&self.state);
        self.snapshot()
    }

    /// Write the current snapshot now.
    ///
    /// # Errors
    ///
    /// Returns the storage or encode error.
    pub fn flush(&mut self) -> Result<(), WishlistError> {
        self.sync.flush(&self.state)
    }

    /// Replace the whole item list.
    ///
    /// # Errors
    ///
    /// [`WishlistError::InvalidItem`] if any price is not finite. State is
    /// unchanged and no callback fires.
    pub fn set_items(&mut self, items: Vec<Item>) -> Result<(), WishlistError> {
        if let Some(item) = items.iter().find(|item| !item.price.is_finite()) {
            return Err(non_finite_price(item));
        }

        let notify = self.hooks.on_set_items.is_some().then(|| items.clone());
        self.dispatch(Action::SetItems { payload: items });

        if let (Some(hook), Some(items)) = (self.hooks.on_set_items.as_mut(), notify) {
            hook(&items);
        }
        Ok(())
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// [`WishlistError::InvalidItem`] if the id is empty or already listed,
    /// or the price is not finite. State is unchanged and no callback fires.
    pub fn add_item(&mut self, item: Item) -> Result<(), WishlistError> {
        if item.id.is_empty() {
            return Err(WishlistError::InvalidItem(InvalidItemReason::MissingId));
        }
        if self.in_wishlist(&item.id) {
            return Err(WishlistError::InvalidItem(InvalidItemReason::DuplicateId(
                item.id,
            )));
        }
        if !item.price.is_finite() {
            return Err(non_finite_price(&item));
        }

        let notify = self.hooks.on_item_add.is_some().then(|| item.clone());
        self.dispatch(Action::AddItem { payload: item });

        if let (Some(hook), Some(item)) = (self.hooks.on_item_add.as_mut(), notify) {
            hook(&item);
        }
        Ok(())
    }

    /// Append an item given as an untyped JSON object.
    ///
    /// Checks run in order: id present, id not listed, price present.
    ///
    /// # Errors
    ///
    /// [`WishlistError::InvalidItem`] naming the first failed check.
    pub fn add_item_value(&mut self, value: Value) -> Result<(), WishlistError> {
        let id = item_id_of(&value).map_err(WishlistError::InvalidItem)?;
        if self.in_wishlist(id) {
            return Err(WishlistError::InvalidItem(InvalidItemReason::DuplicateId(
                id.to_string(),
            )));
        }

        let item = Item::try_from(value).map_err(WishlistError::InvalidItem)?;
        self.add_item(item)
    }

    /// Remove every item with `id`. An empty id is ignored.
    pub fn remove_item(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }

        self.dispatch(Action::RemoveItem { id: id.to_string() });

        if let Some(hook) = self.hooks.on_item_remove.as_mut() {
            hook(id);
        }
    }

    /// Reset to the initial empty state. This also drops the wishlist id.
    pub fn empty_wishlist(&mut self) {
        self.dispatch(Action::EmptyWishlist);
    }

    #[must_use]
    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.state.get_item(id)
    }

    #[must_use]
    pub fn in_wishlist(&self, id: &str) -> bool {
        self.state.contains(id)
    }

    pub fn clear_metadata(&mut self) {
        self.dispatch(Action::ClearWishlistMeta);
    }

    /// Replace metadata wholesale. `None` is ignored.
    pub fn set_metadata(&mut self, metadata: impl Into<Option<Metadata>>) {
        if let Some(payload) = metadata.into() {
            self.dispatch(Action::SetWishlistMeta { payload });
        }
    }

    /// Merge into metadata; incoming keys win. `None` is ignored.
    pub fn update_metadata(&mut self, metadata: impl Into<Option<Metadata>>) {
        if let Some(payload) = metadata.into() {
            self.dispatch(Action::UpdateWishlistMeta { payload });
        }
    }
}

fn non_finite_price(item: &Item) -> WishlistError {
    WishlistError::InvalidItem(InvalidItemReason::Malformed(format!(
        "price of '{}' must be a finite number, got {}",
        item.id, item.price
    )))
}

impl<S: Storage> Drop for Wishlist<S> {
    fn drop(&mut self) {
        if !self.sync.is_dirty() {
            return;
        }
        if let Err(e) = self.sync.flush(&self.state) {
            tracing::warn!(key = self.sync.key(), "final snapshot flush failed: {e}");
        }
    }
}

impl<S: Storage> fmt::Debug for Wishlist<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wishlist")
            .field("key", &self.sync.key())
            .field("state", &self.state)
            .field("origin", &self.origin)
            .field("dirty", &self.sync.is_dirty())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn meta(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn explicit_id_is_used_and_namespaces_the_key() {
        let wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new().id("test"));
        assert_eq!(wishlist.state().id(), Some("test"));
        assert_eq!(wishlist.key(), "wishlist-test");
    }

    #[test]
    fn generated_id_has_default_length_and_shared_key() {
        let wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new());
        assert_eq!(wishlist.state().id().map(str::len), Some(12));
        assert_eq!(wishlist.key(), "wishlist");
        assert_eq!(wishlist.origin(), SnapshotOrigin::Seeded);
    }

    #[test]
    fn default_items_get_aggregates() {
        let wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new().default_items(vec![Item::new("a", 5.0), Item::new("b", 7.0)]),
        );
        assert_eq!(wishlist.state().total_wishlist_items(), 2);
        assert!((wishlist.state().wishlist_total() - 12.0).abs() < f64::EPSILON);
        assert!(!wishlist.state().is_wishlist_empty());
    }

    #[test]
    fn default_metadata_is_seeded() {
        let metadata = meta(json!({"coupon": "abc123", "notes": "Leave on door step"}));
        let wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new().metadata(metadata.clone()),
        );
        assert_eq!(wishlist.state().metadata(), &metadata);
    }

    #[test]
    fn duplicate_add_is_rejected_without_callback() {
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new().on_item_add(move |_| *seen.borrow_mut() += 1),
        );

        wishlist.add_item(Item::new("test", 1.0)).expect("first add");
        let before = wishlist.snapshot();
        let err = wishlist
            .add_item(Item::new("test", 2.0))
            .expect_err("duplicate");
        assert!(matches!(
            err,
            WishlistError::InvalidItem(InvalidItemReason::DuplicateId(ref id)) if id == "test"
        ));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(wishlist.state(), before.as_ref());
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new());
        let err = wishlist.add_item(Item::new("", 1.0)).expect_err("no id");
        assert!(matches!(
            err,
            WishlistError::InvalidItem(InvalidItemReason::MissingId)
        ));
        assert!(wishlist.state().is_wishlist_empty());
    }

    #[test]
    fn untyped_add_checks_id_before_price() {
        let mut wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new());
        wishlist
            .add_item_value(json!({"id": "a", "price": 1}))
            .expect("valid");

        let dup = wishlist
            .add_item_value(json!({"id": "a"}))
            .expect_err("duplicate wins over missing price");
        assert!(matches!(
            dup,
            WishlistError::InvalidItem(InvalidItemReason::DuplicateId(_))
        ));

        let no_price = wishlist
            .add_item_value(json!({"id": "b"}))
            .expect_err("missing price");
        assert!(matches!(
            no_price,
            WishlistError::InvalidItem(InvalidItemReason::MissingPrice)
        ));
        assert_eq!(wishlist.state().total_wishlist_items(), 1);
    }

    #[test]
    fn remove_fires_callback_and_ignores_empty_id() {
        let removed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&removed);
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new()
                .default_items(vec![Item::new("test", 1000.0)])
                .on_item_remove(move |id| sink.borrow_mut().push(id.to_string())),
        );

        wishlist.remove_item("");
        assert!(removed.borrow().is_empty());
        assert_eq!(wishlist.state().total_wishlist_items(), 1);

        wishlist.remove_item("test");
        assert_eq!(removed.borrow().as_slice(), ["test".to_string()]);
        assert!(wishlist.state().is_wishlist_empty());
    }

    #[test]
    fn set_items_fires_callback_with_given_items() {
        let got = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&got);
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new().on_set_items(move |items| {
                sink.borrow_mut().extend(items.iter().map(|i| i.id.clone()));
            }),
        );

        wishlist
            .set_items(vec![Item::new("a", 1.0), Item::new("b", 2.0)])
            .expect("set");
        assert_eq!(got.borrow().as_slice(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        let calls = Rc::new(RefCell::new(0));
        let (on_add, on_set) = (Rc::clone(&calls), Rc::clone(&calls));
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new()
                .default_items(vec![Item::new("keep", 1.0)])
                .on_item_add(move |_| *on_add.borrow_mut() += 1)
                .on_set_items(move |_| *on_set.borrow_mut() += 1),
        );
        let before = wishlist.snapshot();

        for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = wishlist.add_item(Item::new("x", price)).expect_err("add");
            assert!(matches!(
                err,
                WishlistError::InvalidItem(InvalidItemReason::Malformed(_))
            ));
            let err = wishlist
                .set_items(vec![Item::new("a", 1.0), Item::new("x", price)])
                .expect_err("set");
            assert!(matches!(
                err,
                WishlistError::InvalidItem(InvalidItemReason::Malformed(_))
            ));
        }
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(wishlist.state(), before.as_ref());
    }

    #[test]
    fn reserved_extra_keys_never_reach_the_slot() {
        let mut store = MemoryStore::new();
        {
            let mut wishlist = Wishlist::open(&mut store, WishlistOptions::new().id("r"));
            wishlist.add_item(Item::new("keep", 1.0)).expect("add");
            let mut item = Item::new("a", 2.0);
            item.extra.insert("price".into(), json!(9));
            wishlist.add_item(item).expect("add");
            assert_eq!(wishlist.get_item("a").map(|i| i.extra.len()), Some(0));
        }

        let wishlist = Wishlist::open(&mut store, WishlistOptions::new().id("r"));
        assert_eq!(wishlist.origin(), SnapshotOrigin::Restored);
        assert!(wishlist.in_wishlist("keep"));
        assert_eq!(wishlist.get_item("a").map(|i| i.price), Some(2.0));
    }

    #[test]
    fn none_metadata_is_a_no_op() {
        let mut store = MemoryStore::new();
        let mut wishlist = Wishlist::open(&mut store, WishlistOptions::new());
        wishlist.update_metadata(meta(json!({"coupon": "abc"})));
        let before = wishlist.snapshot();

        wishlist.set_metadata(None);
        wishlist.update_metadata(None);
        assert!(Arc::ptr_eq(&before, &wishlist.snapshot()));
    }

    #[test]
    fn every_transition_is_written_to_storage() {
        let mut store = MemoryStore::new();
        {
            let mut wishlist = Wishlist::open(&mut store, WishlistOptions::new().id("w"));
            wishlist.add_item(Item::new("a", 3.0)).expect("add");
            wishlist.update_metadata(meta(json!({"k": "v"})));
        }

        let raw = store.get("wishlist-w").expect("get").expect("slot written");
        let stored: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(stored["id"], json!("w"));
        assert_eq!(stored["totalWishlistItems"], json!(1));
        assert_eq!(stored["metadata"], json!({"k": "v"}));
    }

    #[test]
    fn old_snapshots_survive_later_transitions() {
        let mut wishlist = Wishlist::open(MemoryStore::new(), WishlistOptions::new());
        wishlist.add_item(Item::new("a", 1.0)).expect("add");
        let old = wishlist.snapshot();
        wishlist.add_item(Item::new("b", 2.0)).expect("add");
        wishlist.remove_item("a");

        assert_eq!(old.total_wishlist_items(), 1);
        assert_eq!(old.items()[0].id, "a");
        assert_eq!(wishlist.state().items()[0].id, "b");
    }

    #[test]
    fn empty_wishlist_drops_id_and_metadata() {
        let mut wishlist = Wishlist::open(
            MemoryStore::new(),
            WishlistOptions::new()
                .id("keep")
                .metadata(meta(json!({"a": 1})))
                .default_items(vec![Item::new("x", 1.0)]),
        );
        wishlist.empty_wishlist();
        assert_eq!(wishlist.state(), &WishlistState::initial());
        assert_eq!(wishlist.key(), "wishlist-keep");
    }
}
