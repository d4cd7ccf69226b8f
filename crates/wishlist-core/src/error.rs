use std::fmt;

use crate::store::StoreError;

/// Machine-readable error codes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingContext,
    ConfigParseError,
    InvalidItem,
    InvalidAction,
    ItemNotFound,
    CorruptSnapshot,
    StorageReadFailed,
    StorageWriteFailed,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [Self; 8] = [
        Self::MissingContext,
        Self::ConfigParseError,
        Self::InvalidItem,
        Self::InvalidAction,
        Self::ItemNotFound,
        Self::CorruptSnapshot,
        Self::StorageReadFailed,
        Self::StorageWriteFailed,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingContext => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidItem => "E2001",
            Self::InvalidAction => "E2002",
            Self::ItemNotFound => "E2003",
            Self::CorruptSnapshot => "E3001",
            Self::StorageReadFailed => "E5001",
            Self::StorageWriteFailed => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingContext => "No wishlist is mounted",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidItem => "Invalid wishlist item",
            Self::InvalidAction => "Invalid wishlist action",
            Self::ItemNotFound => "Item not in wishlist",
            Self::CorruptSnapshot => "Stored wishlist snapshot is unreadable",
            Self::StorageReadFailed => "Storage read failed",
            Self::StorageWriteFailed => "Storage write failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MissingContext => {
                Some("Mount a wishlist on the provider before calling wishlist operations.")
            }
            Self::ConfigParseError => Some("Fix syntax in .wishlist/config.toml and retry."),
            Self::InvalidItem => {
                Some("Items need a non-empty `id` that is not already listed, and a `price`.")
            }
            Self::InvalidAction => Some(
                "Use one of SET_ITEMS, ADD_ITEM, REMOVE_ITEM, EMPTY_WISHLIST, \
                 CLEAR_WISHLIST_META, SET_WISHLIST_META, UPDATE_WISHLIST_META.",
            ),
            Self::ItemNotFound => Some("Run `wl show` to list current items."),
            Self::CorruptSnapshot => Some("Run `wl empty` to overwrite the stored snapshot."),
            Self::StorageReadFailed => Some("Check that the storage path exists and is readable."),
            Self::StorageWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why an item was rejected by `add_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidItemReason {
    /// The item has no `id`, or an empty one.
    MissingId,
    /// An item with this `id` is already in the wishlist.
    DuplicateId(String),
    /// The item has no `price` field.
    MissingPrice,
    /// The untyped payload was not a JSON object, or a field had the wrong type.
    Malformed(String),
}

impl fmt::Display for InvalidItemReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("you must provide an `id` for items"),
            Self::DuplicateId(id) => write!(f, "item '{id}' is already in the wishlist"),
            Self::MissingPrice => f.write_str("you must pass a `price` for new items"),
            Self::Malformed(detail) => write!(f, "malformed item: {detail}"),
        }
    }
}

/// Errors surfaced by wishlist operations.
#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    /// An operation ran against a provider with nothing mounted.
    #[error("expected a mounted wishlist; the provider is empty")]
    MissingContext,

    /// `add_item` precondition failure. State is left untouched.
    #[error("invalid item: {0}")]
    InvalidItem(InvalidItemReason),

    /// An action whose `type` is missing or unknown, or whose payload does
    /// not fit its kind.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The storage collaborator failed.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl WishlistError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingContext => ErrorCode::MissingContext,
            Self::InvalidItem(_) => ErrorCode::InvalidItem,
            Self::InvalidAction(_) => ErrorCode::InvalidAction,
            Self::Storage(err) => err.code(),
            Self::Snapshot(_) => ErrorCode::CorruptSnapshot,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
