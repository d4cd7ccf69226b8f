//! Actions and the pure state-transition function.
//!
//! [`reduce`] maps a prior snapshot plus an [`Action`] to a new snapshot.
//! It never touches the prior snapshot and has no side effects; persistence
//! and callbacks live in [`crate::engine`].
//!
//! | Action | Effect |
//! |---|---|
//! | `SET_ITEMS` | replace the item list wholesale |
//! | `ADD_ITEM` | append one item |
//! | `REMOVE_ITEM` | drop every item with the id; survivors keep their order |
//! | `EMPTY_WISHLIST` | reset to [`WishlistState::initial`] (drops the id too) |
//! | `CLEAR_WISHLIST_META` | metadata becomes `{}` |
//! | `SET_WISHLIST_META` | metadata replaced wholesale |
//! | `UPDATE_WISHLIST_META` | shallow merge, new keys win |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::WishlistError;
use crate::model::{Item, Metadata, WishlistState};
use crate::totals::derive_state;

/// A state transition request.
///
/// Serializes to the `{"type": "ADD_ITEM", "payload": {...}}` wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetItems { payload: Vec<Item> },
    AddItem { payload: Item },
    RemoveItem { id: String },
    EmptyWishlist,
    ClearWishlistMeta,
    SetWishlistMeta { payload: Metadata },
    UpdateWishlistMeta { payload: Metadata },
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::SetItems { .. } => ActionKind::SetItems,
            Self::AddItem { .. } => ActionKind::AddItem,
            Self::RemoveItem { .. } => ActionKind::RemoveItem,
            Self::EmptyWishlist => ActionKind::EmptyWishlist,
            Self::ClearWishlistMeta => ActionKind::ClearWishlistMeta,
            Self::SetWishlistMeta { .. } => ActionKind::SetWishlistMeta,
            Self::UpdateWishlistMeta { .. } => ActionKind::UpdateWishlistMeta,
        }
    }

    /// Parse an action from its wire shape.
    ///
    /// # Errors
    ///
    /// [`WishlistError::InvalidAction`] when `type` is missing or unknown, or
    /// when the payload does not fit the action kind.
    pub fn from_json(value: Value) -> Result<Self, WishlistError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| WishlistError::InvalidAction("missing `type`".into()))?;
        let kind: ActionKind = kind
            .parse()
            .map_err(|e: UnknownActionKind| WishlistError::InvalidAction(e.to_string()))?;

        serde_json::from_value(value)
            .map_err(|e| WishlistError::InvalidAction(format!("bad {kind} payload: {e}")))
    }

    /// Encode this action in its wire shape.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn to_json(&self) -> Result<Value, WishlistError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The seven action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetItems,
    AddItem,
    RemoveItem,
    EmptyWishlist,
    ClearWishlistMeta,
    SetWishlistMeta,
    UpdateWishlistMeta,
}

/// Error returned when parsing an unknown action type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActionKind {
    pub raw: String,
}

impl fmt::Display for UnknownActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action type '{}'", self.raw)
    }
}

impl std::error::Error for UnknownActionKind {}

impl ActionKind {
    pub const ALL: [Self; 7] = [
        Self::SetItems,
        Self::AddItem,
        Self::RemoveItem,
        Self::EmptyWishlist,
        Self::ClearWishlistMeta,
        Self::SetWishlistMeta,
        Self::UpdateWishlistMeta,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetItems => "SET_ITEMS",
            Self::AddItem => "ADD_ITEM",
            Self::RemoveItem => "REMOVE_ITEM",
            Self::EmptyWishlist => "EMPTY_WISHLIST",
            Self::ClearWishlistMeta => "CLEAR_WISHLIST_META",
            Self::SetWishlistMeta => "SET_WISHLIST_META",
            Self::UpdateWishlistMeta => "UPDATE_WISHLIST_META",
        }
    }

    /// Whether this kind changes the item list (and so the aggregates).
    #[must_use]
    pub const fn touches_items(self) -> bool {
        matches!(
            self,
            Self::SetItems | Self::AddItem | Self::RemoveItem | Self::EmptyWishlist
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownActionKind { raw: s.to_string() })
    }
}

/// Compute the snapshot that follows `state` under `action`.
///
/// Total and pure: `state` is only read, and the returned snapshot shares no
/// mutable storage with it. Preconditions such as id uniqueness are checked
/// by the caller-facing wrappers, not here.
#[must_use]
pub fn reduce(state: &WishlistState, action: Action) -> WishlistState {
    match action {
        Action::SetItems { payload } => derive_state(state, payload),

        Action::AddItem { payload } => {
            let mut items = Vec::with_capacity(state.items.len() + 1);
            items.extend(state.items.iter().cloned());
            items.push(payload);
            derive_state(state, items)
        }

        Action::RemoveItem { id } => {
            let items = state
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect();
            derive_state(state, items)
        }

        Action::EmptyWishlist => WishlistState::initial(),

        Action::ClearWishlistMeta => WishlistState {
            metadata: Metadata::new(),
            ..state.clone()
        },

        Action::SetWishlistMeta { payload } => WishlistState {
            metadata: payload,
            ..state.clone()
        },

        Action::UpdateWishlistMeta { payload } => {
            let mut metadata = state.metadata.clone();
            metadata.extend(payload);
            WishlistState {
                metadata,
                ..state.clone()
            }
        }
    }
}
